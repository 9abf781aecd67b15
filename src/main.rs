//! Balloon Burst entry point
//!
//! There is no window here: the runner plays a scripted session headless
//! and logs what happens. Pass a settings JSON path to override tuning,
//! and set `RUST_LOG=debug` to see every bounce, pop and wrap.

use anyhow::Context;

use balloon_burst::Settings;
use balloon_burst::consts::SIM_DT;
use balloon_burst::sim::{GameEvent, Session, TickInput};

/// Length of the scripted run
const DEMO_SECONDS: f32 = 30.0;
const DEMO_SEED: u64 = 0x5eed;

fn load_settings() -> anyhow::Result<Settings> {
    let Some(path) = std::env::args().nth(1) else {
        return Ok(Settings::default());
    };
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("reading settings from {path}"))?;
    Settings::from_json(&json).with_context(|| format!("parsing settings from {path}"))
}

/// Sweep left and right every three seconds, firing twice a second
fn scripted_input(frame: u32) -> TickInput {
    let sweep_right = (frame / 180) % 2 == 0;
    TickInput {
        left: !sweep_right,
        right: sweep_right,
        fire: frame % 30 == 0,
        ..Default::default()
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    log::info!("Balloon Burst (headless) starting...");

    let settings = load_settings()?;
    let mut session = Session::new(settings, DEMO_SEED);
    let frames = (DEMO_SECONDS / SIM_DT) as u32;
    let mut popped = 0u32;
    let mut final_score = None;

    for frame in 0..frames {
        session.tick(&scripted_input(frame), SIM_DT);

        for event in session.state.drain_events() {
            if let GameEvent::BalloonPopped { balloon, position, .. } = event {
                popped += 1;
                log::info!("Frame {frame}: balloon {balloon} popped at {position}");
            }
        }

        if session.state.balloon_count() == 0 {
            log::info!("All balloons popped after {frame} frames");
            break;
        }
    }

    session.state.end_game();
    for event in session.state.drain_events() {
        if let GameEvent::GameOver { score } = event {
            final_score = Some(score);
        }
    }

    println!(
        "Final score: {}, balloons popped: {popped}, balloons left: {}",
        final_score.unwrap_or(session.state.score),
        session.state.balloon_count()
    );
    Ok(())
}
