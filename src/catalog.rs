//! Static name tables for versions, structures and biomes.
//!
//! Every table is immutable and built once on first use; lookups are plain
//! hash-map reads with no locking.

use lazy_static::lazy_static;
use std::collections::HashMap;
use std::fmt;

/// Game version a search is evaluated against. Ordered oldest to newest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum McVersion {
    V1_0,
    V1_1,
    V1_2,
    V1_3,
    V1_4,
    V1_5,
    V1_6,
    V1_7,
    V1_8,
    V1_9,
    V1_10,
    V1_11,
    V1_12,
    V1_13,
    V1_14,
    V1_15,
    V1_16_1,
    V1_16_5,
    V1_17_1,
    V1_18_2,
    V1_19_2,
    V1_19_4,
    V1_20_6,
    V1_21,
}

// (name, version) pairs; short names alias the last point release
const VERSION_NAMES: &[(&str, McVersion)] = &[
    ("1.0", McVersion::V1_0),
    ("1.1", McVersion::V1_1),
    ("1.2", McVersion::V1_2),
    ("1.3", McVersion::V1_3),
    ("1.4", McVersion::V1_4),
    ("1.5", McVersion::V1_5),
    ("1.6", McVersion::V1_6),
    ("1.7", McVersion::V1_7),
    ("1.8", McVersion::V1_8),
    ("1.9", McVersion::V1_9),
    ("1.10", McVersion::V1_10),
    ("1.11", McVersion::V1_11),
    ("1.12", McVersion::V1_12),
    ("1.13", McVersion::V1_13),
    ("1.14", McVersion::V1_14),
    ("1.15", McVersion::V1_15),
    ("1.16.1", McVersion::V1_16_1),
    ("1.16", McVersion::V1_16_5),
    ("1.16.5", McVersion::V1_16_5),
    ("1.17", McVersion::V1_17_1),
    ("1.17.1", McVersion::V1_17_1),
    ("1.18", McVersion::V1_18_2),
    ("1.18.2", McVersion::V1_18_2),
    ("1.19", McVersion::V1_19_4),
    ("1.19.2", McVersion::V1_19_2),
    ("1.19.4", McVersion::V1_19_4),
    ("1.20", McVersion::V1_20_6),
    ("1.20.6", McVersion::V1_20_6),
    ("1.21", McVersion::V1_21),
];

impl McVersion {
    pub fn from_name(name: &str) -> Option<Self> {
        VERSIONS.get(name).copied()
    }

    /// Canonical (point release) name.
    pub fn name(self) -> &'static str {
        VERSION_NAMES
            .iter()
            .rev()
            .find(|(_, v)| *v == self)
            .map(|(n, _)| *n)
            .unwrap_or("unknown")
    }
}

impl fmt::Display for McVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Overworld,
    Nether,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructureType {
    Feature,
    DesertPyramid,
    JungleTemple,
    SwampHut,
    Igloo,
    Village,
    OceanRuin,
    Shipwreck,
    Monument,
    Mansion,
    Outpost,
    RuinedPortal,
    AncientCity,
    Treasure,
    Fortress,
    Bastion,
    EndCity,
    TrailRuins,
    TrialChambers,
}

impl StructureType {
    /// Listing order for `GET /structures`.
    pub const ALL: [StructureType; 19] = [
        Self::Feature,
        Self::DesertPyramid,
        Self::JungleTemple,
        Self::SwampHut,
        Self::Igloo,
        Self::Village,
        Self::OceanRuin,
        Self::Shipwreck,
        Self::Monument,
        Self::Mansion,
        Self::Outpost,
        Self::RuinedPortal,
        Self::AncientCity,
        Self::Treasure,
        Self::Fortress,
        Self::Bastion,
        Self::EndCity,
        Self::TrailRuins,
        Self::TrialChambers,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Feature => "feature",
            Self::DesertPyramid => "desert_pyramid",
            Self::JungleTemple => "jungle_temple",
            Self::SwampHut => "swamp_hut",
            Self::Igloo => "igloo",
            Self::Village => "village",
            Self::OceanRuin => "ocean_ruin",
            Self::Shipwreck => "shipwreck",
            Self::Monument => "monument",
            Self::Mansion => "mansion",
            Self::Outpost => "outpost",
            Self::RuinedPortal => "ruined_portal",
            Self::AncientCity => "ancient_city",
            Self::Treasure => "treasure",
            Self::Fortress => "fortress",
            Self::Bastion => "bastion",
            Self::EndCity => "end_city",
            Self::TrailRuins => "trail_ruins",
            Self::TrialChambers => "trial_chambers",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        STRUCTURES.get(name).copied()
    }

    pub fn dimension(self) -> Dimension {
        match self {
            Self::Fortress | Self::Bastion => Dimension::Nether,
            Self::EndCity => Dimension::End,
            _ => Dimension::Overworld,
        }
    }

    /// Inclusive version range the structure generates in.
    pub fn versions(self) -> (McVersion, McVersion) {
        use McVersion::*;
        match self {
            Self::Feature => (V1_0, V1_12),
            Self::DesertPyramid | Self::JungleTemple => (V1_3, V1_21),
            Self::SwampHut => (V1_4, V1_21),
            Self::Igloo | Self::EndCity => (V1_9, V1_21),
            Self::Village | Self::Fortress => (V1_0, V1_21),
            Self::OceanRuin | Self::Shipwreck | Self::Treasure => (V1_13, V1_21),
            Self::Monument => (V1_8, V1_21),
            Self::Mansion => (V1_11, V1_21),
            Self::Outpost => (V1_14, V1_21),
            Self::RuinedPortal | Self::Bastion => (V1_16_1, V1_21),
            Self::AncientCity => (V1_19_2, V1_21),
            Self::TrailRuins => (V1_20_6, V1_21),
            Self::TrialChambers => (V1_21, V1_21),
        }
    }

    pub fn available_in(self, version: McVersion) -> bool {
        let (first, last) = self.versions();
        (first..=last).contains(&version)
    }
}

impl fmt::Display for StructureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Numeric biome identifier as reported by the world oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BiomeId(pub u16);

#[derive(Debug, Clone, Copy)]
pub struct BiomeInfo {
    pub name: &'static str,
    pub id: BiomeId,
    pub dimension: Dimension,
    pub since: McVersion,
    // only found below the surface
    pub cave: bool,
}

const fn biome(name: &'static str, id: u16, dimension: Dimension, since: McVersion) -> BiomeInfo {
    BiomeInfo {
        name,
        id: BiomeId(id),
        dimension,
        since,
        cave: false,
    }
}

const fn cave_biome(name: &'static str, id: u16, since: McVersion) -> BiomeInfo {
    BiomeInfo {
        name,
        id: BiomeId(id),
        dimension: Dimension::Overworld,
        since,
        cave: true,
    }
}

pub mod biomes {
    use super::BiomeId;

    pub const OCEAN: BiomeId = BiomeId(0);
    pub const PLAINS: BiomeId = BiomeId(1);
    pub const DESERT: BiomeId = BiomeId(2);
    pub const WINDSWEPT_HILLS: BiomeId = BiomeId(3);
    pub const FOREST: BiomeId = BiomeId(4);
    pub const TAIGA: BiomeId = BiomeId(5);
    pub const SWAMP: BiomeId = BiomeId(6);
    pub const RIVER: BiomeId = BiomeId(7);
    pub const NETHER_WASTES: BiomeId = BiomeId(8);
    pub const THE_END: BiomeId = BiomeId(9);
    pub const FROZEN_OCEAN: BiomeId = BiomeId(10);
    pub const FROZEN_RIVER: BiomeId = BiomeId(11);
    pub const SNOWY_PLAINS: BiomeId = BiomeId(12);
    pub const MUSHROOM_FIELDS: BiomeId = BiomeId(14);
    pub const BEACH: BiomeId = BiomeId(16);
    pub const JUNGLE: BiomeId = BiomeId(21);
    pub const SPARSE_JUNGLE: BiomeId = BiomeId(23);
    pub const DEEP_OCEAN: BiomeId = BiomeId(24);
    pub const STONY_SHORE: BiomeId = BiomeId(25);
    pub const SNOWY_BEACH: BiomeId = BiomeId(26);
    pub const BIRCH_FOREST: BiomeId = BiomeId(27);
    pub const DARK_FOREST: BiomeId = BiomeId(29);
    pub const SNOWY_TAIGA: BiomeId = BiomeId(30);
    pub const OLD_GROWTH_PINE_TAIGA: BiomeId = BiomeId(32);
    pub const WINDSWEPT_FOREST: BiomeId = BiomeId(34);
    pub const SAVANNA: BiomeId = BiomeId(35);
    pub const SAVANNA_PLATEAU: BiomeId = BiomeId(36);
    pub const BADLANDS: BiomeId = BiomeId(37);
    pub const WOODED_BADLANDS: BiomeId = BiomeId(38);
    pub const SMALL_END_ISLANDS: BiomeId = BiomeId(40);
    pub const END_MIDLANDS: BiomeId = BiomeId(41);
    pub const END_HIGHLANDS: BiomeId = BiomeId(42);
    pub const END_BARRENS: BiomeId = BiomeId(43);
    pub const WARM_OCEAN: BiomeId = BiomeId(44);
    pub const LUKEWARM_OCEAN: BiomeId = BiomeId(45);
    pub const COLD_OCEAN: BiomeId = BiomeId(46);
    pub const DEEP_LUKEWARM_OCEAN: BiomeId = BiomeId(48);
    pub const DEEP_COLD_OCEAN: BiomeId = BiomeId(49);
    pub const DEEP_FROZEN_OCEAN: BiomeId = BiomeId(50);
    pub const SUNFLOWER_PLAINS: BiomeId = BiomeId(129);
    pub const ICE_SPIKES: BiomeId = BiomeId(140);
    pub const BAMBOO_JUNGLE: BiomeId = BiomeId(168);
    pub const SOUL_SAND_VALLEY: BiomeId = BiomeId(170);
    pub const CRIMSON_FOREST: BiomeId = BiomeId(171);
    pub const WARPED_FOREST: BiomeId = BiomeId(172);
    pub const BASALT_DELTAS: BiomeId = BiomeId(173);
    pub const DRIPSTONE_CAVES: BiomeId = BiomeId(174);
    pub const LUSH_CAVES: BiomeId = BiomeId(175);
    pub const MEADOW: BiomeId = BiomeId(177);
    pub const GROVE: BiomeId = BiomeId(178);
    pub const SNOWY_SLOPES: BiomeId = BiomeId(179);
    pub const JAGGED_PEAKS: BiomeId = BiomeId(180);
    pub const FROZEN_PEAKS: BiomeId = BiomeId(181);
    pub const STONY_PEAKS: BiomeId = BiomeId(182);
    pub const DEEP_DARK: BiomeId = BiomeId(183);
    pub const MANGROVE_SWAMP: BiomeId = BiomeId(184);
    pub const CHERRY_GROVE: BiomeId = BiomeId(185);
}

use Dimension::{End, Nether, Overworld};
use McVersion as V;

/// Every known biome, in listing order for `GET /biomes`.
pub const BIOMES: &[BiomeInfo] = &[
    biome("ocean", 0, Overworld, V::V1_0),
    biome("plains", 1, Overworld, V::V1_0),
    biome("desert", 2, Overworld, V::V1_0),
    biome("windswept_hills", 3, Overworld, V::V1_0),
    biome("forest", 4, Overworld, V::V1_0),
    biome("taiga", 5, Overworld, V::V1_0),
    biome("swamp", 6, Overworld, V::V1_0),
    biome("river", 7, Overworld, V::V1_0),
    biome("nether_wastes", 8, Nether, V::V1_0),
    biome("the_end", 9, End, V::V1_0),
    biome("frozen_ocean", 10, Overworld, V::V1_0),
    biome("frozen_river", 11, Overworld, V::V1_0),
    biome("snowy_plains", 12, Overworld, V::V1_0),
    biome("mushroom_fields", 14, Overworld, V::V1_0),
    biome("beach", 16, Overworld, V::V1_0),
    biome("jungle", 21, Overworld, V::V1_2),
    biome("sparse_jungle", 23, Overworld, V::V1_7),
    biome("deep_ocean", 24, Overworld, V::V1_7),
    biome("stony_shore", 25, Overworld, V::V1_7),
    biome("snowy_beach", 26, Overworld, V::V1_7),
    biome("birch_forest", 27, Overworld, V::V1_7),
    biome("dark_forest", 29, Overworld, V::V1_7),
    biome("snowy_taiga", 30, Overworld, V::V1_7),
    biome("old_growth_pine_taiga", 32, Overworld, V::V1_7),
    biome("windswept_forest", 34, Overworld, V::V1_7),
    biome("savanna", 35, Overworld, V::V1_7),
    biome("savanna_plateau", 36, Overworld, V::V1_7),
    biome("badlands", 37, Overworld, V::V1_7),
    biome("wooded_badlands", 38, Overworld, V::V1_7),
    biome("small_end_islands", 40, End, V::V1_9),
    biome("end_midlands", 41, End, V::V1_9),
    biome("end_highlands", 42, End, V::V1_9),
    biome("end_barrens", 43, End, V::V1_9),
    biome("warm_ocean", 44, Overworld, V::V1_13),
    biome("lukewarm_ocean", 45, Overworld, V::V1_13),
    biome("cold_ocean", 46, Overworld, V::V1_13),
    biome("deep_lukewarm_ocean", 48, Overworld, V::V1_13),
    biome("deep_cold_ocean", 49, Overworld, V::V1_13),
    biome("deep_frozen_ocean", 50, Overworld, V::V1_13),
    biome("sunflower_plains", 129, Overworld, V::V1_7),
    biome("ice_spikes", 140, Overworld, V::V1_7),
    biome("bamboo_jungle", 168, Overworld, V::V1_14),
    biome("soul_sand_valley", 170, Nether, V::V1_16_1),
    biome("crimson_forest", 171, Nether, V::V1_16_1),
    biome("warped_forest", 172, Nether, V::V1_16_1),
    biome("basalt_deltas", 173, Nether, V::V1_16_1),
    cave_biome("dripstone_caves", 174, V::V1_18_2),
    cave_biome("lush_caves", 175, V::V1_18_2),
    biome("meadow", 177, Overworld, V::V1_18_2),
    biome("grove", 178, Overworld, V::V1_18_2),
    biome("snowy_slopes", 179, Overworld, V::V1_18_2),
    biome("jagged_peaks", 180, Overworld, V::V1_18_2),
    biome("frozen_peaks", 181, Overworld, V::V1_18_2),
    biome("stony_peaks", 182, Overworld, V::V1_18_2),
    cave_biome("deep_dark", 183, V::V1_19_2),
    biome("mangrove_swamp", 184, Overworld, V::V1_19_2),
    biome("cherry_grove", 185, Overworld, V::V1_20_6),
];

lazy_static! {
    static ref VERSIONS: HashMap<&'static str, McVersion> = VERSION_NAMES.iter().copied().collect();
    static ref STRUCTURES: HashMap<&'static str, StructureType> =
        StructureType::ALL.iter().map(|s| (s.name(), *s)).collect();
    static ref BIOME_NAMES: HashMap<&'static str, BiomeId> =
        BIOMES.iter().map(|b| (b.name, b.id)).collect();
}

pub fn biome_from_name(name: &str) -> Option<BiomeId> {
    BIOME_NAMES.get(name).copied()
}

pub fn biome_info(id: BiomeId) -> Option<&'static BiomeInfo> {
    BIOMES.iter().find(|b| b.id == id)
}

/// Whether a structure in `dimension` can ever report `id` at its position.
pub fn biome_can_host(id: BiomeId, dimension: Dimension, version: McVersion) -> bool {
    biome_info(id).is_some_and(|b| b.dimension == dimension && !b.cave && b.since <= version)
}

pub fn structure_names() -> Vec<&'static str> {
    StructureType::ALL.iter().map(|s| s.name()).collect()
}

pub fn biome_names() -> Vec<&'static str> {
    BIOMES.iter().map(|b| b.name).collect()
}

/// Surface biomes of `dimension` that exist in `version`.
pub fn surface_palette(dimension: Dimension, version: McVersion) -> Vec<BiomeId> {
    BIOMES
        .iter()
        .filter(|b| b.dimension == dimension && !b.cave && b.since <= version)
        .map(|b| b.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_version_names_alias_point_releases() {
        assert_eq!(McVersion::from_name("1.16"), Some(McVersion::V1_16_5));
        assert_eq!(McVersion::from_name("1.19"), Some(McVersion::V1_19_4));
        assert_eq!(McVersion::from_name("1.21"), Some(McVersion::V1_21));
        assert_eq!(McVersion::from_name("1.22"), None);
        assert_eq!(McVersion::V1_18_2.name(), "1.18.2");
    }

    #[test]
    fn structure_names_round_trip() {
        for s in StructureType::ALL {
            assert_eq!(StructureType::from_name(s.name()), Some(s));
        }
        assert_eq!(StructureType::from_name("castle"), None);
        assert_eq!(structure_names().len(), 19);
    }

    #[test]
    fn availability_follows_version_ranges() {
        assert!(StructureType::Village.available_in(McVersion::V1_0));
        assert!(!StructureType::Bastion.available_in(McVersion::V1_15));
        assert!(StructureType::Bastion.available_in(McVersion::V1_16_1));
        assert!(!StructureType::Feature.available_in(McVersion::V1_13));
        assert!(!StructureType::TrialChambers.available_in(McVersion::V1_20_6));
    }

    #[test]
    fn biome_ids_are_unique() {
        let mut ids: Vec<u16> = BIOMES.iter().map(|b| b.id.0).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), BIOMES.len());
        assert_eq!(biome_from_name("deep_dark"), Some(biomes::DEEP_DARK));
        assert_eq!(biome_from_name("none"), None);
    }

    #[test]
    fn biome_hosting_checks_dimension_layer_and_version() {
        let overworld = Dimension::Overworld;
        assert!(biome_can_host(biomes::PLAINS, overworld, McVersion::V1_0));
        assert!(!biome_can_host(biomes::NETHER_WASTES, overworld, McVersion::V1_21));
        assert!(!biome_can_host(biomes::DEEP_DARK, overworld, McVersion::V1_21));
        assert!(!biome_can_host(biomes::CHERRY_GROVE, overworld, McVersion::V1_16_5));
        assert!(biome_can_host(biomes::CHERRY_GROVE, overworld, McVersion::V1_21));
        assert_eq!(biome_info(biomes::DEEP_DARK).map(|b| b.name), Some("deep_dark"));
    }

    #[test]
    fn palettes_respect_version_and_layer() {
        let old = surface_palette(Dimension::Overworld, McVersion::V1_12);
        let new = surface_palette(Dimension::Overworld, McVersion::V1_21);
        assert!(!old.contains(&biomes::MEADOW));
        assert!(new.contains(&biomes::CHERRY_GROVE));
        assert!(!new.contains(&biomes::DEEP_DARK));
        assert_eq!(
            surface_palette(Dimension::Nether, McVersion::V1_15),
            vec![biomes::NETHER_WASTES]
        );
    }
}
