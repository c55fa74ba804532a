use serde::{Deserialize, Serialize};

// Search request body as sent by clients (POST /search and the first stream message).
// Every field is optional here so validation can name exactly what is missing.
#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct SearchRequestBody {
    pub version: Option<String>,
    pub seed_start: Option<i64>,
    pub seed_end: Option<i64>,
    pub max_results: Option<i64>,
    pub structures: Option<Vec<StructureQueryBody>>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct StructureQueryBody {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub max_distance: Option<i64>,
    #[serde(default)]
    pub biome: Option<String>,
}

// POST /search response
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct SearchResponse {
    pub seeds: Vec<i64>,
    pub scanned: u64,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct StructureList {
    pub structures: Vec<String>,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct BiomeList {
    pub biomes: Vec<String>,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

// Stream messages, one per text frame
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct SeedMessage {
    pub seed: i64,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct DoneMessage {
    pub done: bool,
    pub scanned: u64,
}

impl DoneMessage {
    pub fn new(scanned: u64) -> Self {
        Self { done: true, scanned }
    }
}
