//! # Synthetic World Oracle
//!
//! Deterministic stand-in for the real generation library.
//!
//! Placement follows the region-grid scheme: every `spacing`-chunk cell holds
//! at most one attempt, offset by a seed-derived roll inside the first
//! `spacing - separation` chunks. Biomes are assigned per 64-block cell from a
//! per-dimension palette filtered by version. Everything is a pure function of
//! (seed, version, coordinates), so results are reproducible across threads.

use super::{BlockPos, OracleContext, StructureConfig, WorldOracle};
use crate::catalog::biomes::*;
use crate::catalog::{self, BiomeId, Dimension, McVersion, StructureType};

// region hashing multipliers
const REGION_X_MUL: u64 = 341_873_128_712;
const REGION_Z_MUL: u64 = 132_897_987_541;

// biome cell edge, as a shift
const BIOME_CELL_SHIFT: u32 = 6;

/// splitmix64 finalizer.
#[inline]
fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Derives an independent stream from one seed.
#[inline]
fn derive(seed: u64, purpose: u64) -> u64 {
    let mut hash = seed ^ purpose;
    hash = hash.wrapping_mul(0x517c_c1b7_2722_0a95);
    hash ^ (hash >> 32)
}

#[inline]
fn cell_roll(seed: u64, x: i64, z: i64) -> u64 {
    mix64(seed ^ (x as u64).wrapping_mul(REGION_X_MUL) ^ (z as u64).wrapping_mul(REGION_Z_MUL))
}

#[derive(Debug, Clone, Copy)]
enum Gate {
    Always,
    OneIn(u64),
    // structures sharing one grid; this one owns rolls in [lo, hi) of `of`
    Share { of: u64, lo: u64, hi: u64 },
}

impl Gate {
    fn admits(self, roll: u64) -> bool {
        match self {
            Gate::Always => true,
            Gate::OneIn(n) => roll % n == 0,
            Gate::Share { of, lo, hi } => (lo..hi).contains(&(roll % of)),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Placement {
    spacing: u32,
    separation: u32,
    salt: u64,
    gate: Gate,
}

const fn placement(spacing: u32, separation: u32, salt: u64) -> Placement {
    Placement {
        spacing,
        separation,
        salt,
        gate: Gate::Always,
    }
}

fn placement_for(structure: StructureType, version: McVersion) -> Option<Placement> {
    use StructureType::*;

    if !structure.available_in(version) {
        return None;
    }
    let modern = version >= McVersion::V1_16_1;
    let p = match structure {
        Feature => placement(32, 8, 14_357_617),
        DesertPyramid => placement(32, 8, 14_357_617),
        Igloo => placement(32, 8, 14_357_618),
        JungleTemple => placement(32, 8, 14_357_619),
        SwampHut => placement(32, 8, 14_357_620),
        Village if version >= McVersion::V1_18_2 => placement(34, 8, 10_387_312),
        Village => placement(32, 8, 10_387_312),
        OceanRuin if modern => placement(20, 8, 14_357_621),
        OceanRuin => placement(16, 8, 14_357_621),
        Shipwreck if modern => placement(24, 4, 165_745_295),
        Shipwreck => placement(16, 8, 165_745_295),
        Monument => placement(32, 5, 10_387_313),
        Mansion => placement(80, 20, 10_387_319),
        Outpost => Placement {
            gate: Gate::OneIn(5),
            ..placement(32, 8, 165_745_296)
        },
        RuinedPortal => placement(40, 15, 34_222_645),
        AncientCity => placement(24, 8, 20_083_232),
        Treasure => Placement {
            gate: Gate::OneIn(100),
            ..placement(1, 0, 10_387_320)
        },
        Fortress if modern => Placement {
            gate: Gate::Share { of: 5, lo: 0, hi: 2 },
            ..placement(27, 4, 30_084_232)
        },
        Fortress => placement(16, 4, 30_084_232),
        Bastion => Placement {
            gate: Gate::Share { of: 5, lo: 2, hi: 5 },
            ..placement(27, 4, 30_084_232)
        },
        EndCity => placement(20, 11, 10_387_313),
        TrailRuins => placement(34, 8, 83_469_867),
        TrialChambers => placement(34, 12, 94_251_327),
    };
    Some(p)
}

#[derive(Debug, Clone, Copy)]
enum Viability {
    Anywhere,
    Land,
    OneOf(&'static [BiomeId]),
    NoneOf(&'static [BiomeId]),
}

const OCEANS: &[BiomeId] = &[
    OCEAN,
    DEEP_OCEAN,
    FROZEN_OCEAN,
    WARM_OCEAN,
    LUKEWARM_OCEAN,
    COLD_OCEAN,
    DEEP_LUKEWARM_OCEAN,
    DEEP_COLD_OCEAN,
    DEEP_FROZEN_OCEAN,
];

const VILLAGE_BIOMES: &[BiomeId] = &[PLAINS, SUNFLOWER_PLAINS, DESERT, SAVANNA, TAIGA, SNOWY_PLAINS, MEADOW];

fn viability(structure: StructureType) -> Viability {
    use StructureType::*;
    use Viability::*;

    match structure {
        Feature => OneOf(&[DESERT, JUNGLE, SWAMP, SNOWY_PLAINS, SNOWY_TAIGA]),
        DesertPyramid => OneOf(&[DESERT]),
        JungleTemple => OneOf(&[JUNGLE, BAMBOO_JUNGLE]),
        SwampHut => OneOf(&[SWAMP]),
        Igloo => OneOf(&[SNOWY_PLAINS, SNOWY_TAIGA, SNOWY_SLOPES]),
        Village => OneOf(VILLAGE_BIOMES),
        OceanRuin => OneOf(OCEANS),
        Shipwreck => OneOf(&[
            OCEAN,
            DEEP_OCEAN,
            FROZEN_OCEAN,
            WARM_OCEAN,
            LUKEWARM_OCEAN,
            COLD_OCEAN,
            DEEP_LUKEWARM_OCEAN,
            DEEP_COLD_OCEAN,
            DEEP_FROZEN_OCEAN,
            BEACH,
            SNOWY_BEACH,
        ]),
        Monument => OneOf(&[DEEP_OCEAN, DEEP_LUKEWARM_OCEAN, DEEP_COLD_OCEAN, DEEP_FROZEN_OCEAN]),
        Mansion => OneOf(&[DARK_FOREST]),
        Outpost => OneOf(&[
            PLAINS,
            SUNFLOWER_PLAINS,
            DESERT,
            SAVANNA,
            TAIGA,
            SNOWY_PLAINS,
            MEADOW,
            GROVE,
            SNOWY_SLOPES,
            JAGGED_PEAKS,
            FROZEN_PEAKS,
            CHERRY_GROVE,
        ]),
        RuinedPortal | Fortress => Anywhere,
        AncientCity | TrialChambers => Land,
        Treasure => OneOf(&[BEACH, SNOWY_BEACH]),
        Bastion => NoneOf(&[BASALT_DELTAS]),
        EndCity => OneOf(&[END_MIDLANDS, END_HIGHLANDS]),
        TrailRuins => OneOf(&[TAIGA, SNOWY_TAIGA, OLD_GROWTH_PINE_TAIGA, BIRCH_FOREST, JUNGLE]),
    }
}

fn dimension_index(dimension: Dimension) -> usize {
    match dimension {
        Dimension::Overworld => 0,
        Dimension::Nether => 1,
        Dimension::End => 2,
    }
}

/// Deterministic reference oracle shipped with the service.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticOracle;

impl SyntheticOracle {
    pub fn new() -> Self {
        Self
    }
}

impl WorldOracle for SyntheticOracle {
    type Context = SyntheticContext;

    fn context(&self, version: McVersion) -> SyntheticContext {
        SyntheticContext::new(version)
    }

    fn structure_config(&self, structure: StructureType, version: McVersion) -> Option<StructureConfig> {
        placement_for(structure, version).map(|p| StructureConfig {
            region_size: p.spacing,
            dimension: structure.dimension(),
        })
    }

    fn structure_pos(
        &self,
        structure: StructureType,
        version: McVersion,
        seed: u64,
        region_x: i64,
        region_z: i64,
    ) -> Option<BlockPos> {
        let p = placement_for(structure, version)?;
        let roll = cell_roll(seed ^ p.salt, region_x, region_z);
        if !p.gate.admits(roll) {
            return None;
        }

        let range = u64::from(p.spacing.saturating_sub(p.separation).max(1));
        let spacing = i64::from(p.spacing);
        let off_x = ((roll >> 16) % range) as i64;
        let off_z = ((roll >> 40) % range) as i64;

        // saturates at the far edge of the grid instead of wrapping
        let block = |region: i64, off: i64| {
            region
                .saturating_mul(spacing)
                .saturating_add(off)
                .saturating_mul(16)
        };
        Some(BlockPos::new(block(region_x, off_x), block(region_z, off_z)))
    }
}

/// Per-thread context: the applied seed plus cached biome palettes.
#[derive(Debug, Clone)]
pub struct SyntheticContext {
    version: McVersion,
    dimension: Dimension,
    seed: u64,
    palettes: [Vec<BiomeId>; 3],
}

impl SyntheticContext {
    pub fn new(version: McVersion) -> Self {
        Self {
            version,
            dimension: Dimension::Overworld,
            seed: 0,
            palettes: [
                catalog::surface_palette(Dimension::Overworld, version),
                catalog::surface_palette(Dimension::Nether, version),
                catalog::surface_palette(Dimension::End, version),
            ],
        }
    }

    pub fn version(&self) -> McVersion {
        self.version
    }

    fn biome_in(&self, dimension: Dimension, pos: BlockPos) -> Option<BiomeId> {
        let idx = dimension_index(dimension);
        let palette = &self.palettes[idx];
        if palette.is_empty() {
            return None;
        }
        let stream = derive(self.seed, idx as u64 + 1);
        let roll = cell_roll(stream, pos.x >> BIOME_CELL_SHIFT, pos.z >> BIOME_CELL_SHIFT);
        Some(palette[(roll % palette.len() as u64) as usize])
    }
}

impl OracleContext for SyntheticContext {
    fn apply_seed(&mut self, dimension: Dimension, seed: u64) {
        self.dimension = dimension;
        self.seed = seed;
    }

    fn is_viable(&mut self, structure: StructureType, pos: BlockPos) -> bool {
        // checked in the structure's own dimension whatever is applied
        let Some(biome) = self.biome_in(structure.dimension(), pos) else {
            return false;
        };
        match viability(structure) {
            Viability::Anywhere => true,
            Viability::Land => !OCEANS.contains(&biome),
            Viability::OneOf(set) => set.contains(&biome),
            Viability::NoneOf(set) => !set.contains(&biome),
        }
    }

    fn biome_at(&mut self, pos: BlockPos) -> Option<BiomeId> {
        self.biome_in(self.dimension, pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_are_deterministic_and_inside_their_cell() {
        let oracle = SyntheticOracle::new();
        let v = McVersion::V1_21;
        let config = oracle.structure_config(StructureType::Village, v).unwrap();
        let cell = config.region_blocks();

        for seed in 0..200u64 {
            for (rx, rz) in [(0, 0), (-1, 2), (3, -4)] {
                let a = oracle.structure_pos(StructureType::Village, v, seed, rx, rz).unwrap();
                let b = oracle.structure_pos(StructureType::Village, v, seed, rx, rz).unwrap();
                assert_eq!(a, b);
                assert!(a.x >= rx * cell && a.x < (rx + 1) * cell);
                assert!(a.z >= rz * cell && a.z < (rz + 1) * cell);
            }
        }
    }

    #[test]
    fn extreme_regions_saturate_instead_of_overflowing() {
        let oracle = SyntheticOracle::new();
        let v = McVersion::V1_21;
        for seed in 0..50u64 {
            let far = oracle
                .structure_pos(StructureType::RuinedPortal, v, seed, i64::MAX / 2, i64::MIN / 2)
                .unwrap();
            assert_eq!(far.x, i64::MAX);
            assert_eq!(far.z, i64::MIN);
            assert!(far.dist_sq() > i128::from(i64::MAX));
        }
    }

    #[test]
    fn unavailable_structures_have_no_config() {
        let oracle = SyntheticOracle::new();
        assert!(oracle.structure_config(StructureType::Bastion, McVersion::V1_12).is_none());
        assert!(
            oracle
                .structure_pos(StructureType::Bastion, McVersion::V1_12, 1, 0, 0)
                .is_none()
        );
        let fortress = oracle.structure_config(StructureType::Fortress, McVersion::V1_21).unwrap();
        assert_eq!(fortress.dimension, Dimension::Nether);
        assert_eq!(fortress.region_size, 27);
    }

    #[test]
    fn fortress_and_bastion_split_the_nether_grid() {
        let oracle = SyntheticOracle::new();
        let v = McVersion::V1_16_5;
        let mut fortresses = 0;
        for seed in 0..500u64 {
            let f = oracle.structure_pos(StructureType::Fortress, v, seed, 0, 0);
            let b = oracle.structure_pos(StructureType::Bastion, v, seed, 0, 0);
            assert!(f.is_some() != b.is_some(), "seed {seed} must hold exactly one");
            fortresses += usize::from(f.is_some());
        }
        // roughly two in five
        assert!((120..280).contains(&fortresses), "got {fortresses}");
    }

    #[test]
    fn viability_matches_reported_biome() {
        let oracle = SyntheticOracle::new();
        let mut ctx = oracle.context(McVersion::V1_21);
        for seed in 0..100u64 {
            ctx.apply_seed(Dimension::Overworld, seed);
            let pos = BlockPos::new(seed as i64 * 97, -(seed as i64) * 53);
            let biome = ctx.biome_at(pos).unwrap();
            assert_eq!(ctx.is_viable(StructureType::DesertPyramid, pos), biome == DESERT);
            assert!(ctx.is_viable(StructureType::RuinedPortal, pos));
        }
    }

    #[test]
    fn nether_viability_ignores_applied_dimension() {
        let oracle = SyntheticOracle::new();
        let mut ctx = oracle.context(McVersion::V1_21);
        let pos = BlockPos::new(100, 100);

        ctx.apply_seed(Dimension::Overworld, 42);
        let from_overworld = ctx.is_viable(StructureType::Bastion, pos);
        ctx.apply_seed(Dimension::Nether, 42);
        let nether_biome = ctx.biome_at(pos).unwrap();

        assert_eq!(from_overworld, nether_biome != BASALT_DELTAS);
    }

    #[test]
    fn old_versions_only_see_old_biomes() {
        let oracle = SyntheticOracle::new();
        let mut ctx = oracle.context(McVersion::V1_12);
        ctx.apply_seed(Dimension::Nether, 7);
        for i in 0..50 {
            assert_eq!(ctx.biome_at(BlockPos::new(i * 64, 0)), Some(NETHER_WASTES));
        }
    }
}
