use axum::Json;

use crate::catalog;
use crate::models::{BiomeList, StructureList};

pub async fn structures_handler() -> Json<StructureList> {
    Json(StructureList {
        structures: catalog::structure_names().into_iter().map(str::to_string).collect(),
    })
}

pub async fn biomes_handler() -> Json<BiomeList> {
    Json(BiomeList {
        biomes: catalog::biome_names().into_iter().map(str::to_string).collect(),
    })
}
