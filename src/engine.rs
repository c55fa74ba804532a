//! # Search Engine
//!
//! Splits a seed range into contiguous chunks, scans each chunk on its own
//! thread and aggregates matches under one lock.
//!
//! ## Shared state
//!
//! All workers of one search share a single [`Mutex`]-guarded [`Aggregate`]:
//! the match count, the scanned total and the sink matches are delivered to.
//! The sink is only ever touched while the lock is held, so deliveries are
//! serialized across workers and never overlap.
//!
//! ## Early termination
//!
//! A worker stops when its chunk is exhausted, when the match count reaches
//! `max_results` (checked after each of its own matches and every
//! `check_interval` seeds), or when the sink refuses a seed, which raises a
//! cancel flag every worker polls before each seed.

use parking_lot::Mutex;
use std::ops::RangeInclusive;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use tracing::debug;

use crate::catalog::{Dimension, McVersion};
use crate::config::Limits;
use crate::oracle::{OracleContext, WorldOracle};
use crate::request::{SearchRequest, StructureQuery};

/// Ceiling for the shared match-count check interval.
pub const MAX_CHECK_INTERVAL: u64 = 1 << 32;

/// Batch search outcome. `seeds` is in insertion order, not sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResult {
    pub seeds: Vec<i64>,
    pub scanned: u64,
}

/// Streaming search outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamOutcome {
    /// Seeds the sink accepted.
    pub found: usize,
    pub scanned: u64,
    /// The sink refused a seed and the search stopped early.
    pub cancelled: bool,
}

/// Destination for matches. Called with the aggregation lock held.
pub trait SeedSink: Send {
    /// Returns `false` when the sink can take no more seeds.
    fn accept(&mut self, seed: i64) -> bool;
}

struct Collector {
    seeds: Vec<i64>,
}

impl SeedSink for Collector {
    fn accept(&mut self, seed: i64) -> bool {
        self.seeds.push(seed);
        true
    }
}

struct Callback<F>(F);

impl<F> SeedSink for Callback<F>
where
    F: FnMut(i64) -> bool + Send,
{
    fn accept(&mut self, seed: i64) -> bool {
        (self.0)(seed)
    }
}

struct Aggregate<S> {
    found: usize,
    scanned: u64,
    sink: S,
}

pub struct SearchEngine<O> {
    oracle: O,
    max_workers: usize,
    check_interval: u64,
}

impl<O: WorldOracle> SearchEngine<O> {
    pub fn new(oracle: O, limits: &Limits) -> Self {
        Self {
            oracle,
            max_workers: limits.max_workers.max(1),
            check_interval: clamp_interval(limits.check_interval),
        }
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Runs a search and collects up to `max_results` seeds.
    pub fn search(&self, request: &SearchRequest) -> SearchResult {
        let sink = Collector {
            seeds: Vec::with_capacity(request.max_results),
        };
        let (agg, _) = self.run(request, sink);
        SearchResult {
            seeds: agg.sink.seeds,
            scanned: agg.scanned,
        }
    }

    /// Runs a search, handing every match to `on_seed` instead of buffering.
    ///
    /// `on_seed` runs with the aggregation lock held: invocations never
    /// overlap, and a slow callback stalls every worker of this search. It must
    /// not start another search on this engine from inside the callback.
    /// Returning `false` cancels the search.
    pub fn search_stream<F>(&self, request: &SearchRequest, on_seed: F) -> StreamOutcome
    where
        F: FnMut(i64) -> bool + Send,
    {
        let (agg, cancelled) = self.run(request, Callback(on_seed));
        StreamOutcome {
            found: agg.found,
            scanned: agg.scanned,
            cancelled,
        }
    }

    /// Evaluates every constraint of `request` against a single seed.
    pub fn seed_matches(&self, request: &SearchRequest, seed: i64) -> bool {
        let mut ctx = self.oracle.context(request.version);
        self.evaluate(&mut ctx, request, seed)
    }

    fn run<S: SeedSink>(&self, request: &SearchRequest, sink: S) -> (Aggregate<S>, bool) {
        let chunks = partition(request.seed_start, request.seed_end, self.max_workers);
        let shared = Mutex::new(Aggregate {
            found: 0,
            scanned: 0,
            sink,
        });
        let cancel = AtomicBool::new(false);

        debug!(
            workers = chunks.len(),
            seed_start = request.seed_start,
            seed_end = request.seed_end,
            "starting search"
        );

        thread::scope(|scope| {
            for range in chunks {
                let shared = &shared;
                let cancel = &cancel;
                scope.spawn(move || self.scan(request, range, shared, cancel));
            }
        });

        (shared.into_inner(), cancel.into_inner())
    }

    fn scan<S: SeedSink>(
        &self,
        request: &SearchRequest,
        range: RangeInclusive<i64>,
        shared: &Mutex<Aggregate<S>>,
        cancel: &AtomicBool,
    ) {
        let mut ctx = self.oracle.context(request.version);
        let mask = self.check_interval - 1;
        let mut local_scanned: u64 = 0;

        for seed in range {
            if local_scanned & mask == 0 && shared.lock().found >= request.max_results {
                break;
            }
            if cancel.load(Ordering::Relaxed) {
                break;
            }
            local_scanned += 1;

            if !self.evaluate(&mut ctx, request, seed) {
                continue;
            }

            let mut agg = shared.lock();
            if agg.found < request.max_results {
                if agg.sink.accept(seed) {
                    agg.found += 1;
                } else {
                    cancel.store(true, Ordering::Relaxed);
                }
            }
            let done = agg.found >= request.max_results;
            drop(agg);
            if done {
                break;
            }
        }

        shared.lock().scanned += local_scanned;
    }

    fn evaluate(&self, ctx: &mut O::Context, request: &SearchRequest, seed: i64) -> bool {
        let seed = seed as u64;
        ctx.apply_seed(Dimension::Overworld, seed);
        // declaration order, first failure discards the seed
        request
            .structures
            .iter()
            .all(|query| self.satisfies(ctx, request.version, seed, query))
    }

    // First grid cell in row-major order passing every check wins.
    fn satisfies(&self, ctx: &mut O::Context, version: McVersion, seed: u64, query: &StructureQuery) -> bool {
        let Some(config) = self.oracle.structure_config(query.structure, version) else {
            return false;
        };
        let radius = query.max_distance / config.region_blocks().max(1) + 2;
        let limit = i128::from(query.max_distance).pow(2);

        for rx in -radius..=radius {
            for rz in -radius..=radius {
                let Some(pos) = self.oracle.structure_pos(query.structure, version, seed, rx, rz) else {
                    continue;
                };
                if pos.dist_sq() > limit {
                    continue;
                }
                if !ctx.is_viable(query.structure, pos) {
                    continue;
                }
                if let Some(wanted) = query.biome {
                    ctx.apply_seed(config.dimension, seed);
                    let biome = ctx.biome_at(pos);
                    ctx.apply_seed(Dimension::Overworld, seed);
                    if biome != Some(wanted) {
                        continue;
                    }
                }
                return true;
            }
        }
        false
    }
}

/// Rounds a check interval up to a power of two in `1..=MAX_CHECK_INTERVAL`.
pub fn clamp_interval(interval: u64) -> u64 {
    interval.clamp(1, MAX_CHECK_INTERVAL).next_power_of_two()
}

/// Splits `start..=end` into at most `max_workers` contiguous chunks; the last
/// chunk absorbs the remainder. Empty when `end < start`.
pub fn partition(start: i64, end: i64, max_workers: usize) -> Vec<RangeInclusive<i64>> {
    let total = i128::from(end) - i128::from(start) + 1;
    if total <= 0 {
        return Vec::new();
    }
    let workers = (max_workers.max(1) as i128).min(total);
    let chunk = total / workers;

    (0..workers)
        .map(|i| {
            let lo = i128::from(start) + i * chunk;
            let hi = if i == workers - 1 { i128::from(end) } else { lo + chunk - 1 };
            (lo as i64)..=(hi as i64)
        })
        .collect()
}
