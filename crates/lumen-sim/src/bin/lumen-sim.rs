//! Lumen crowd demo
//!
//! Run the proximity engine against a simulated crowd and watch the
//! population estimate converge.

use std::env;

use lumen_beacon::{BeaconId, Blake3Oracle};
use lumen_engine::{Engine, EngineEvent, NoInput, ScanConfig};
use lumen_leveling::LevelingConfig;
use lumen_radio::RadioConfig;
use lumen_sim::{Crowd, CrowdConfig};
use tokio::time::{interval, Duration};
use tracing::info;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    // Parse command line args
    let args: Vec<String> = env::args().collect();

    let population: usize = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(50);
    let bursts: usize = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(30);

    let radio = RadioConfig::default();
    println!("Lumen Crowd Demo");
    println!("================");
    println!();
    println!(
        "Simulated channel {} ({} byte frames), {} neighbors, {} scan bursts...",
        radio.channel, radio.frame_len, population, bursts
    );
    println!();

    let local = BeaconId::new(0x1055_c0de);
    let leveling = LevelingConfig { confirm_ticks: 10, ..Default::default() };
    let mut engine = Engine::with_config(Blake3Oracle, local, ScanConfig::default(), leveling);
    let mut crowd = Crowd::new(
        CrowdConfig { population, ..Default::default() },
        local,
    );

    let mut ticker = interval(Duration::from_millis(leveling.tick_interval_ms));
    let mut awards = 0usize;

    for burst in 1..=bursts {
        let mut events = engine.scan_burst(&mut crowd, &mut NoInput);

        // Drive any pending gesture to its verdict, one paced tick at a time.
        while engine.session().leveler().attempt().is_some() {
            ticker.tick().await;
            events.extend(engine.tick(&mut NoInput));
        }

        for event in &events {
            match event {
                EngineEvent::Award(award) => {
                    awards += 1;
                    info!(
                        "award: bucket {} visual {} (peer {:04x})",
                        award.bucket, award.visual, award.peer_hash
                    );
                }
                EngineEvent::Attention => engine.acknowledge_attention(),
                EngineEvent::Fault { bucket } => {
                    tracing::error!("bucket {} out of range", bucket)
                }
                EngineEvent::Redraw(_) => {}
            }
        }

        info!("burst {:>3}: estimate {}", burst, engine.estimate());
    }

    let snapshot = engine.snapshot();
    println!();
    println!("Session complete:");
    println!("  True population:  {}", population);
    println!("  Final estimate:   {}", snapshot.estimate);
    println!(
        "  Machine table:    {} sightings",
        snapshot.machine_occupancy.0.iter().map(|&c| c as usize).sum::<usize>()
    );
    println!(
        "  Confirmed table:  {} encounters ({} awards)",
        snapshot.confirmed_occupancy.0.iter().map(|&c| c as usize).sum::<usize>(),
        awards
    );
}
