//! Blockfield - headless walk through a streamed voxel world
//!
//! Spawns a player on the terrain surface, walks it forward for a number of
//! fixed steps while streaming chunks around it, digs and places a block now
//! and then, and prints a JSON summary of what the renderer was asked to do.
//!
//! Usage: cargo run --release -- [OPTIONS]
//!
//! Options:
//!   --config <PATH>    World config JSON (default: built-in world)
//!   --seed <SEED>      Override the world seed
//!   --radius <CHUNKS>  Override the streaming radius
//!   --steps <N>        Simulation steps (default: 1200)
//!   --yaw <RADIANS>    Walking direction, 0 looks down -Z (default: 0.6)
//!   --edit-every <N>   Steps between block edits, 0 disables (default: 150)
//!   --out <PATH>       Write the summary here instead of stdout

use std::path::PathBuf;
use std::time::Instant;

use serde_json::json;

use blockfield::core::logging;
use blockfield::core::types::Vec3;
use blockfield::physics::{forward_vector, MoveIntent, MovementController, PlayerState};
use blockfield::render::RecordingRenderer;
use blockfield::voxel::block::ids;
use blockfield::voxel::ChunkStore;
use blockfield::{Result, WorldConfig};

fn main() {
    logging::init();
    log::info!("Blockfield starting...");

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    let mut config = match parse_path_arg(&args, "--config") {
        Some(path) => WorldConfig::load(&path)?,
        None => WorldConfig::default(),
    };
    if let Some(seed) = parse_u32_arg(&args, "--seed") {
        config.terrain.seed = seed;
    }
    if let Some(radius) = parse_i32_arg(&args, "--radius") {
        config.streaming_radius = radius;
    }
    let steps = parse_usize_arg(&args, "--steps").unwrap_or(1200);
    let yaw = parse_f32_arg(&args, "--yaw").unwrap_or(0.6);
    let edit_every = parse_usize_arg(&args, "--edit-every").unwrap_or(150);

    let mut store = ChunkStore::new(&config)?;
    let mut renderer = RecordingRenderer::new();
    let controller = MovementController::new(config.player.clone());

    let (sx, sz) = (8.5_f32, 8.5_f32);
    let surface = store
        .generator()
        .model()
        .surface_height(sx as f64, sz as f64, store.chunk_height());
    let mut player = PlayerState::new(Vec3::new(sx, surface as f32 + 2.0, sz), controller.config());
    log::info!(
        "Seed {}, radius {}, spawning at ({:.1}, {:.1}, {:.1})",
        config.seed(),
        config.streaming_radius,
        player.position.x,
        player.position.y,
        player.position.z
    );

    let start = Instant::now();
    let mut streaming = store.update_streaming(player.position.x, player.position.z, &mut renderer);
    let mut peak_chunks = store.chunk_count();
    let mut jump_next = false;
    let (mut dug, mut placed, mut refused) = (0usize, 0usize, 0usize);

    for step in 1..=steps {
        let intent = MoveIntent { jump: jump_next, ..MoveIntent::forward() };
        let report = controller.step(&mut player, intent, yaw, &store);
        // Hop over anything that stops us
        jump_next = report.blocked_x || report.blocked_z;

        let feet = player.position.floor().as_ivec3();
        let in_range = feet.y >= 1 && feet.y + 2 < store.chunk_height() as i32;
        if edit_every > 0 && step % edit_every == 0 && player.on_ground && in_range {
            if store.remove_block(feet.x, feet.y - 1, feet.z, &mut renderer)? {
                dug += 1;
            }
            let ahead = (player.position + forward_vector(yaw) * 3.0).floor().as_ivec3();
            if store.place_block(ahead.x, feet.y + 2, ahead.z, ids::PURPLE, &player, &mut renderer)? {
                placed += 1;
            }
            // Placing inside our own body must be refused
            if !store.place_block(feet.x, feet.y, feet.z, ids::PURPLE, &player, &mut renderer)? {
                refused += 1;
            }
        }

        let update = store.update_streaming(player.position.x, player.position.z, &mut renderer);
        streaming.loaded += update.loaded;
        streaming.unloaded += update.unloaded;
        streaming.rebuilt += update.rebuilt;
        peak_chunks = peak_chunks.max(store.chunk_count());
    }

    let elapsed = start.elapsed();
    let final_position = player.position;
    let final_chunks = store.chunk_count();
    let released = store.unload_all(&mut renderer);

    log::info!(
        "Walked {} steps in {:.2}s, {} chunks streamed in, {} out",
        steps,
        elapsed.as_secs_f64(),
        streaming.loaded,
        streaming.unloaded
    );

    let summary = json!({
        "seed": config.seed(),
        "steps": steps,
        "yaw": yaw,
        "elapsed_secs": elapsed.as_secs_f64(),
        "final_position": [final_position.x, final_position.y, final_position.z],
        "on_ground": player.on_ground,
        "chunks": {
            "peak": peak_chunks,
            "at_end": final_chunks,
            "released_on_exit": released,
        },
        "streaming": streaming,
        "edits": {
            "dug": dug,
            "placed": placed,
            "refused": refused,
        },
        "renderer": renderer.stats(),
    });
    let text = serde_json::to_string_pretty(&summary)?;

    match parse_path_arg(&args, "--out") {
        Some(path) => {
            std::fs::write(&path, text)?;
            log::info!("Summary written to {}", path.display());
        }
        None => println!("{}", text),
    }
    Ok(())
}

fn parse_f32_arg(args: &[String], flag: &str) -> Option<f32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
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
