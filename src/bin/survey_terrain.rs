//! Terrain survey binary: generates a square region of chunks in parallel
//! and reports biome coverage, surface heights and block counts.
//!
//! Usage: cargo run --release --bin survey_terrain -- [OPTIONS]
//!
//! Options:
//!   --radius <CHUNKS>  Region half-width in chunks around the origin (default: 8)
//!   --seed <SEED>      Random seed (default: from config, 12345)
//!   --config <PATH>    World config JSON (default: built-in world)
//!   --jobs <N>         Max parallel chunk builds (default: all cores)
//!   --out <PATH>       Write the JSON report here instead of stdout

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use rayon::prelude::*;
use serde_json::json;

use blockfield::render::ChunkMesher;
use blockfield::terrain::{Biome, TerrainGenerator};
use blockfield::voxel::block::BlockId;
use blockfield::voxel::chunk::{ChunkCoord, WORLD_LIMIT};
use blockfield::WorldConfig;

/// Per-chunk tallies, merged after the parallel pass
#[derive(Default)]
struct ChunkSurvey {
    biome_columns: [usize; 3],
    min_height: i32,
    max_height: i32,
    height_sum: i64,
    columns: usize,
    blocks: BTreeMap<BlockId, usize>,
    batches: usize,
}

impl ChunkSurvey {
    fn merge(mut self, other: ChunkSurvey) -> ChunkSurvey {
        if other.columns == 0 {
            return self;
        }
        if self.columns == 0 {
            return other;
        }
        for i in 0..3 {
            self.biome_columns[i] += other.biome_columns[i];
        }
        self.min_height = self.min_height.min(other.min_height);
        self.max_height = self.max_height.max(other.max_height);
        self.height_sum += other.height_sum;
        self.columns += other.columns;
        for (id, count) in other.blocks {
            *self.blocks.entry(id).or_insert(0) += count;
        }
        self.batches += other.batches;
        self
    }
}

fn survey_chunk(generator: &TerrainGenerator, config: &WorldConfig, coord: ChunkCoord) -> ChunkSurvey {
    let size = generator.chunk_size();
    let (ox, oz) = coord.world_origin(size);
    let mut survey = ChunkSurvey {
        min_height: i32::MAX,
        max_height: i32::MIN,
        ..ChunkSurvey::default()
    };

    for lx in 0..size as i32 {
        for lz in 0..size as i32 {
            let column = generator.column(ox + lx, oz + lz);
            let slot = Biome::ALL.iter().position(|&b| b == column.biome).unwrap_or(0);
            survey.biome_columns[slot] += 1;
            survey.min_height = survey.min_height.min(column.height);
            survey.max_height = survey.max_height.max(column.height);
            survey.height_sum += column.height as i64;
            survey.columns += 1;
        }
    }

    let grid = generator.generate(coord);
    for (_, _, _, id) in grid.solid_voxels() {
        *survey.blocks.entry(id).or_insert(0) += 1;
    }
    survey.batches = ChunkMesher::build_grid(coord, 0, &grid, &config.blocks).batches.len();
    survey
}

fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .format_timestamp_millis()
    .init();

    let args: Vec<String> = std::env::args().collect();
    let mut config = match parse_path_arg(&args, "--config") {
        Some(path) => WorldConfig::load(&path).expect("Failed to load world config"),
        None => WorldConfig::default(),
    };
    if let Some(seed) = parse_u32_arg(&args, "--seed") {
        config.terrain.seed = seed;
    }
    config.validate().expect("Invalid world config");
    let radius = parse_i32_arg(&args, "--radius").unwrap_or(8).clamp(0, WORLD_LIMIT);

    if let Some(jobs) = parse_usize_arg(&args, "--jobs") {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .expect("Failed to configure thread pool");
    }

    let generator = TerrainGenerator::new(config.terrain.clone(), config.chunk_size, config.chunk_height);
    let coords: Vec<ChunkCoord> = ChunkCoord::new(0, 0)
        .square_around(radius)
        .filter(|coord| coord.is_within_world(config.chunk_size))
        .collect();
    let total = coords.len();
    let side = radius * 2 + 1;
    log::info!(
        "Surveying {} chunks ({} x {}), seed {}, chunk {}x{}",
        total,
        side,
        side,
        config.seed(),
        config.chunk_size,
        config.chunk_height
    );

    let start = Instant::now();
    let done = AtomicUsize::new(0);
    let survey = coords
        .par_iter()
        .map(|&coord| {
            let survey = survey_chunk(&generator, &config, coord);
            let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
            if finished % 100 == 0 || finished == total {
                log::info!("  [{}/{}] chunks", finished, total);
            }
            survey
        })
        .reduce(ChunkSurvey::default, ChunkSurvey::merge);
    let elapsed = start.elapsed();

    let columns = survey.columns.max(1) as f64;
    let biomes: BTreeMap<Biome, f64> = Biome::ALL
        .into_iter()
        .zip(survey.biome_columns)
        .map(|(biome, count)| (biome, count as f64 / columns))
        .collect();
    let blocks: BTreeMap<String, usize> = survey
        .blocks
        .iter()
        .map(|(&id, &count)| {
            let name = config.blocks.get(id).map_or_else(|| id.to_string(), |t| t.name.clone());
            (name, count)
        })
        .collect();

    let report = json!({
        "seed": config.seed(),
        "radius": radius,
        "chunks": total,
        "chunk_size": config.chunk_size,
        "chunk_height": config.chunk_height,
        "elapsed_secs": elapsed.as_secs_f64(),
        "chunks_per_sec": total as f64 / elapsed.as_secs_f64().max(1e-9),
        "height": {
            "min": survey.min_height,
            "max": survey.max_height,
            "mean": survey.height_sum as f64 / columns,
        },
        "biome_coverage": biomes,
        "blocks": blocks,
        "draw_batches": survey.batches,
    });
    let text = serde_json::to_string_pretty(&report).expect("Failed to serialize report");

    match parse_path_arg(&args, "--out") {
        Some(path) => {
            std::fs::write(&path, text).expect("Failed to write report");
            log::info!("Report written to {}", path.display());
        }
        None => println!("{}", text),
    }
}

fn parse_u32_arg(args: &[String], flag: &str) -> Option<u32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_i32_arg(args: &[String], flag: &str) -> Option<i32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_usize_arg(args: &[String], flag: &str) -> Option<usize> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_path_arg(args: &[String], flag: &str) -> Option<PathBuf> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(PathBuf::from)
}
