//! Request body → validated [`SearchRequest`].

use crate::catalog::{self, BiomeId, McVersion, StructureType};
use crate::config::Limits;
use crate::error::RequestError;
use crate::models::{SearchRequestBody, StructureQueryBody};
use tracing::debug;

/// One spatial constraint: a structure of `structure` within `max_distance`
/// blocks of the origin, optionally standing in `biome`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructureQuery {
    pub structure: StructureType,
    pub max_distance: i64,
    pub biome: Option<BiomeId>,
}

/// A validated search. `seed_end >= seed_start`, the width is within the
/// configured ceiling, `max_results` is clamped and `structures` is non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub version: McVersion,
    pub seed_start: i64,
    pub seed_end: i64,
    pub max_results: usize,
    pub structures: Vec<StructureQuery>,
}

impl SearchRequest {
    /// Number of seeds in the inclusive range.
    pub fn width(&self) -> u64 {
        (i128::from(self.seed_end) - i128::from(self.seed_start) + 1).max(0) as u64
    }
}

pub fn parse_request(body: &str, limits: &Limits) -> Result<SearchRequest, RequestError> {
    if body.trim().is_empty() {
        return Err(RequestError::EmptyBody);
    }
    let raw: SearchRequestBody =
        serde_json::from_str(body).map_err(|e| RequestError::MalformedJson(e.to_string()))?;
    validate(raw, limits)
}

pub fn validate(raw: SearchRequestBody, limits: &Limits) -> Result<SearchRequest, RequestError> {
    let version_name = raw.version.ok_or(RequestError::MissingVersion)?;
    let version = McVersion::from_name(&version_name).ok_or(RequestError::UnknownVersion)?;

    let seed_start = raw.seed_start.ok_or(RequestError::MissingSeedStart)?;
    let seed_end = raw.seed_end.ok_or(RequestError::MissingSeedEnd)?;
    if seed_end < seed_start {
        return Err(RequestError::InvertedRange);
    }
    if i128::from(seed_end) - i128::from(seed_start) > i128::from(limits.max_range) {
        return Err(RequestError::RangeTooWide { max: limits.max_range });
    }

    let max_results = match raw.max_results {
        Some(n) if n > 0 => (n as u64).min(limits.max_results as u64) as usize,
        _ => return Err(RequestError::InvalidMaxResults),
    };

    let entries = raw.structures.ok_or(RequestError::MissingStructures)?;
    if entries.is_empty() {
        return Err(RequestError::EmptyStructures);
    }
    if entries.len() > limits.max_structures {
        return Err(RequestError::TooManyStructures {
            max: limits.max_structures,
        });
    }
    let structures = entries
        .into_iter()
        .map(|entry| validate_query(entry, version, limits))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SearchRequest {
        version,
        seed_start,
        seed_end,
        max_results,
        structures,
    })
}

fn validate_query(
    entry: StructureQueryBody,
    version: McVersion,
    limits: &Limits,
) -> Result<StructureQuery, RequestError> {
    let structure = entry
        .kind
        .as_deref()
        .and_then(StructureType::from_name)
        .ok_or(RequestError::UnknownStructure)?;

    let max_distance = match entry.max_distance {
        Some(d) if d > 0 => d,
        _ => return Err(RequestError::InvalidMaxDistance),
    };
    if max_distance > limits.max_distance {
        return Err(RequestError::MaxDistanceTooLarge {
            max: limits.max_distance,
        });
    }

    if !structure.available_in(version) {
        return Err(RequestError::StructureUnavailable);
    }

    let biome = match entry.biome.as_deref() {
        None | Some("") | Some("none") => None,
        Some(name) => {
            let id = catalog::biome_from_name(name).ok_or(RequestError::UnknownBiome)?;
            if !catalog::biome_can_host(id, structure.dimension(), version) {
                // accepted, but every seed will scan the whole grid for it
                debug!(biome = name, %structure, %version, "biome filter can never match");
            }
            Some(id)
        }
    };

    Ok(StructureQuery {
        structure,
        max_distance,
        biome,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::biomes;

    fn parse(body: &str) -> Result<SearchRequest, RequestError> {
        parse_request(body, &Limits::default())
    }

    #[test]
    fn parses_a_complete_request() {
        let req = parse(
            r#"{"version":"1.21","seed_start":0,"seed_end":1000000,"max_results":5,
                "structures":[{"type":"village","max_distance":500},
                              {"type":"desert_pyramid","max_distance":800,"biome":"desert"}]}"#,
        )
        .unwrap();

        assert_eq!(req.version, McVersion::V1_21);
        assert_eq!(req.width(), 1_000_001);
        assert_eq!(req.max_results, 5);
        assert_eq!(req.structures.len(), 2);
        assert_eq!(req.structures[0].structure, StructureType::Village);
        assert_eq!(req.structures[0].biome, None);
        assert_eq!(req.structures[1].biome, Some(biomes::DESERT));
    }

    #[test]
    fn max_results_is_clamped_to_the_ceiling() {
        let req = parse(
            r#"{"version":"1.18","seed_start":5,"seed_end":5,"max_results":500,
                "structures":[{"type":"village","max_distance":100}]}"#,
        )
        .unwrap();
        assert_eq!(req.max_results, Limits::default().max_results);
        assert_eq!(req.width(), 1);
    }

    #[test]
    fn rejects_bad_ranges_and_counts() {
        let wide = r#"{"version":"1.21","seed_start":0,"seed_end":1000000001,"max_results":1,
                       "structures":[{"type":"village","max_distance":500}]}"#;
        assert_eq!(parse(wide), Err(RequestError::RangeTooWide { max: 1_000_000_000 }));

        let edge = r#"{"version":"1.21","seed_start":0,"seed_end":1000000000,"max_results":1,
                       "structures":[{"type":"village","max_distance":500}]}"#;
        assert!(parse(edge).is_ok());

        let inverted = r#"{"version":"1.21","seed_start":10,"seed_end":9,"max_results":1,
                           "structures":[{"type":"village","max_distance":500}]}"#;
        assert_eq!(parse(inverted), Err(RequestError::InvertedRange));

        for n in ["0", "-3"] {
            let body = format!(
                r#"{{"version":"1.21","seed_start":0,"seed_end":9,"max_results":{n},
                     "structures":[{{"type":"village","max_distance":500}}]}}"#
            );
            assert_eq!(parse(&body), Err(RequestError::InvalidMaxResults));
        }
    }

    #[test]
    fn rejects_bad_structures() {
        let cases = [
            (r#"[{"type":"castle","max_distance":500}]"#, RequestError::UnknownStructure),
            (r#"[{"max_distance":500}]"#, RequestError::UnknownStructure),
            (r#"[{"type":"village","max_distance":0}]"#, RequestError::InvalidMaxDistance),
            (r#"[{"type":"village"}]"#, RequestError::InvalidMaxDistance),
            (r#"[{"type":"trial_chambers","max_distance":500}]"#, RequestError::StructureUnavailable),
            (r#"[{"type":"village","max_distance":500,"biome":"moon"}]"#, RequestError::UnknownBiome),
            ("[]", RequestError::EmptyStructures),
        ];
        for (structures, expected) in cases {
            let body = format!(
                r#"{{"version":"1.16","seed_start":0,"seed_end":9,"max_results":1,"structures":{structures}}}"#
            );
            assert_eq!(parse(&body), Err(expected), "structures = {structures}");
        }
    }

    #[test]
    fn rejects_oversized_structure_lists() {
        let one = r#"{"type":"village","max_distance":500}"#;
        let list = vec![one; 17].join(",");
        let body = format!(
            r#"{{"version":"1.21","seed_start":0,"seed_end":9,"max_results":1,"structures":[{list}]}}"#
        );
        assert_eq!(parse(&body), Err(RequestError::TooManyStructures { max: 16 }));
    }

    #[test]
    fn max_distance_is_capped() {
        let body = |d: i64| {
            format!(
                r#"{{"version":"1.21","seed_start":0,"seed_end":9,"max_results":1,
                     "structures":[{{"type":"village","max_distance":{d}}}]}}"#
            )
        };
        let ceiling = Limits::default().max_distance;

        let req = parse(&body(ceiling)).unwrap();
        assert_eq!(req.structures[0].max_distance, ceiling);
        assert_eq!(
            parse(&body(ceiling + 1)),
            Err(RequestError::MaxDistanceTooLarge { max: ceiling })
        );
        assert_eq!(
            parse(&body(i64::MAX)),
            Err(RequestError::MaxDistanceTooLarge { max: ceiling })
        );
        assert_eq!(
            RequestError::MaxDistanceTooLarge { max: ceiling }.to_string(),
            "max_distance must not exceed 30000000"
        );
    }

    #[test]
    fn impossible_biome_filters_are_still_accepted() {
        // nether biome on an overworld structure, cave biome, biome newer than the version
        for (version, biome) in [("1.21", "nether_wastes"), ("1.21", "deep_dark"), ("1.16", "cherry_grove")] {
            let body = format!(
                r#"{{"version":"{version}","seed_start":0,"seed_end":9,"max_results":1,
                     "structures":[{{"type":"village","max_distance":500,"biome":"{biome}"}}]}}"#
            );
            assert!(parse(&body).unwrap().structures[0].biome.is_some(), "{biome}");
        }
    }

    #[test]
    fn biome_none_means_no_filter() {
        let req = parse(
            r#"{"version":"1.21","seed_start":0,"seed_end":9,"max_results":1,
                "structures":[{"type":"village","max_distance":500,"biome":"none"}]}"#,
        )
        .unwrap();
        assert_eq!(req.structures[0].biome, None);
    }

    #[test]
    fn reports_missing_fields_in_order() {
        assert_eq!(parse("   "), Err(RequestError::EmptyBody));
        assert_eq!(parse("{}"), Err(RequestError::MissingVersion));
        assert_eq!(parse(r#"{"version":"2.0"}"#), Err(RequestError::UnknownVersion));
        assert_eq!(parse(r#"{"version":"1.21"}"#), Err(RequestError::MissingSeedStart));
        assert_eq!(
            parse(r#"{"version":"1.21","seed_start":1}"#),
            Err(RequestError::MissingSeedEnd)
        );
        assert_eq!(
            parse(r#"{"version":"1.21","seed_start":1,"seed_end":2,"max_results":1}"#),
            Err(RequestError::MissingStructures)
        );
        assert!(matches!(parse("{not json"), Err(RequestError::MalformedJson(_))));
    }
}
