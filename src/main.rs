//! Centipede entry point
//!
//! Headless frame driver: runs the simulation in real time with the
//! autopilot at the controls, then prints a final snapshot as JSON.
//!
//! Usage: `centipede [settings.json] [seconds]`

use std::time::{Duration, Instant};

use centipede::Settings;
use centipede::consts::*;
use centipede::sim::{GameState, TickInput, tick};

/// Seconds to run when no duration is given
const DEFAULT_RUN_SECONDS: f32 = 10.0;

fn load_settings(path: Option<&str>) -> Settings {
    let Some(path) = path else {
        return Settings::default();
    };
    match Settings::load(path) {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("{e}; using default settings");
            Settings::default()
        }
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let settings = load_settings(args.first().map(String::as_str));
    let run_seconds = args
        .get(1)
        .and_then(|s| s.parse::<f32>().ok())
        .unwrap_or(DEFAULT_RUN_SECONDS);

    let seed: u64 = rand::random();
    log::info!("Centipede (headless) starting, seed {seed}, {run_seconds}s");

    let mut state = GameState::with_settings(settings, seed);
    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };

    let frame = Duration::from_secs_f32(SIM_DT);
    let start = Instant::now();
    let mut last = start;
    let mut accumulator = 0.0f32;

    while start.elapsed().as_secs_f32() < run_seconds {
        let now = Instant::now();
        accumulator += (now - last).as_secs_f32();
        last = now;

        let mut substeps = 0;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut state, &input, SIM_DT);
            accumulator -= SIM_DT;
            substeps += 1;
        }
        // Drop time we could not catch up on
        if substeps == MAX_SUBSTEPS {
            accumulator = 0.0;
        }

        let spent = now.elapsed();
        if spent < frame {
            std::thread::sleep(frame - spent);
        }
    }

    log::info!(
        "Finished after {} ticks: score {}, high score {}, lives {}",
        state.time_ticks,
        state.score(),
        state.high_score(),
        state.lives()
    );

    match serde_json::to_string_pretty(&state.snapshot()) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to serialize snapshot: {e}"),
    }
}
