//! Drives the tracker from the reference host for a few seconds of ticks.
//!
//! Run with: cargo run --example tracker_demo [config.json]
//!
//! Set `RUST_LOG=villager_tracker=debug` to see every cycle.

use tracing_subscriber::EnvFilter;
use villager_tracker::{HostWorld, Position, Tracker, TrackerConfig};

fn main() -> villager_tracker::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("villager_tracker=info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => TrackerConfig::load(path)?,
        None => TrackerConfig::default(),
    };
    let mut tracker = Tracker::new(&config)?;
    let mut host = HostWorld::new();

    // A small village along the x axis, plus a few unnamed or foreign-named villagers.
    let labels = ["Bob", "entity.Villager.name", "村人", "", "Alice", "Quartermaster"];
    for (i, label) in labels.iter().enumerate() {
        let x = i as f64 * 20.0;
        host.spawn_villager(*label, i as i32, Position::new(x, 64.0, (i as f64 * 7.0) % 11.0));
    }

    // No one connected yet: these ticks are skipped.
    host.step_with(0.25, &mut tracker);

    let player = host.connect_actor("alex", Position::new(0.0, 64.0, 0.0));
    for tick in 0..100 {
        // Walk the player east through the village, one block per tick.
        host.set_position(player, Position::new(tick as f64, 64.0, 0.0));
        host.tick_once(&mut tracker);
    }

    tracker.profiler().log_summary();

    let text = std::fs::read_to_string(tracker.publisher().output_path())
        .map_err(|e| villager_tracker::TrackerError::Io {
            path: tracker.publisher().output_path().to_path_buf(),
            source: e,
        })?;
    println!("{text}");
    Ok(())
}
