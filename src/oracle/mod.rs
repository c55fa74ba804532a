//! World oracle seam.
//!
//! The engine never generates terrain itself; it asks a [`WorldOracle`] where
//! a structure attempt lands and whether the surrounding world allows it.
//! Oracles must be deterministic: the same seed, version and coordinates give
//! the same answer on every thread and every run.

mod synthetic;

pub use synthetic::{SyntheticContext, SyntheticOracle};

use crate::catalog::{BiomeId, Dimension, McVersion, StructureType};

/// Block coordinates on the horizontal plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockPos {
    pub x: i64,
    pub z: i64,
}

impl BlockPos {
    pub const fn new(x: i64, z: i64) -> Self {
        Self { x, z }
    }

    /// Squared distance from the world origin.
    pub fn dist_sq(self) -> i128 {
        let (x, z) = (self.x as i128, self.z as i128);
        (x * x).saturating_add(z * z)
    }
}

/// Placement grid of one structure type in one version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructureConfig {
    /// Grid cell edge in chunks.
    pub region_size: u32,
    pub dimension: Dimension,
}

impl StructureConfig {
    pub fn region_blocks(&self) -> i64 {
        i64::from(self.region_size) * 16
    }
}

/// Stateless, shareable half of the oracle.
pub trait WorldOracle: Send + Sync {
    type Context: OracleContext;

    /// Fresh generation context for one worker thread.
    fn context(&self, version: McVersion) -> Self::Context;

    /// `None` when the structure does not generate in `version`.
    fn structure_config(&self, structure: StructureType, version: McVersion) -> Option<StructureConfig>;

    /// Candidate attempt position in grid cell (`region_x`, `region_z`), if the
    /// cell has one.
    fn structure_pos(
        &self,
        structure: StructureType,
        version: McVersion,
        seed: u64,
        region_x: i64,
        region_z: i64,
    ) -> Option<BlockPos>;
}

/// Per-thread generation state. Never shared between workers.
pub trait OracleContext {
    /// Re-derive the context for `seed` in `dimension`.
    fn apply_seed(&mut self, dimension: Dimension, seed: u64);

    /// Whether the attempt at `pos` actually generates.
    fn is_viable(&mut self, structure: StructureType, pos: BlockPos) -> bool;

    /// Surface biome at `pos` in the currently applied dimension.
    fn biome_at(&mut self, pos: BlockPos) -> Option<BiomeId>;
}
