//! Sky Defense headless runner
//!
//! Drives the simulation on a fixed timestep with the autopilot enabled and
//! logs what happened. Usage: `sky-defense [tuning.json|-] [seconds] [seed]`

use sky_defense::audio::{self, LogAudio};
use sky_defense::consts::*;
use sky_defense::renderer::{RenderCommand, SceneSync};
use sky_defense::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
use sky_defense::{SimResult, Tuning};

/// Wall-clock frame time the runner pretends the host delivers
const FRAME_DT: f32 = 1.0 / 30.0;

struct Game {
    state: GameState,
    scene: SceneSync,
    audio: LogAudio,
    input: TickInput,
    accumulator: f32,
    commands: Vec<RenderCommand>,
    destroyed: u32,
    sessions: u32,
}

impl Game {
    fn new(seed: u64, tuning: Tuning) -> SimResult<Self> {
        Ok(Self {
            state: GameState::with_tuning(seed, tuning)?,
            scene: SceneSync::new(),
            audio: LogAudio::new(),
            input: TickInput {
                tap: None,
                idle_mode: true,
            },
            accumulator: 0.0,
            commands: Vec::new(),
            destroyed: 0,
            sessions: 0,
        })
    }

    fn frame(&mut self, dt: f32) {
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &self.input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS {
            // Drop the backlog rather than spiral
            self.accumulator = 0.0;
        }

        self.commands.clear();
        self.scene.sync(&self.state, &mut self.commands);

        audio::dispatch(&self.state.events, &mut self.audio);
        for event in self.state.drain_events() {
            match event {
                GameEvent::SessionStarted => self.sessions += 1,
                GameEvent::MeteorDestroyed { .. } => self.destroyed += 1,
                GameEvent::DifficultyRaised { tier } => log::info!("Difficulty tier {}", tier),
                GameEvent::GameOver {
                    score,
                    survived_secs,
                } => log::info!("Game over: score {} after {:.1}s", score, survived_secs),
                _ => {}
            }
        }
    }
}

fn load_tuning(path: Option<&str>) -> SimResult<Tuning> {
    let Some(path) = path else {
        return Ok(Tuning::default());
    };
    match std::fs::read_to_string(path) {
        Ok(json) => Tuning::from_json(&json),
        Err(e) => {
            log::warn!("Could not read tuning file {}: {}, using defaults", path, e);
            Ok(Tuning::default())
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Sky Defense (headless) starting...");

    let args: Vec<String> = std::env::args().collect();
    let tuning_path = args.get(1).map(String::as_str).filter(|p| *p != "-");
    let seconds: f32 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(120.0);
    let seed: u64 = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(0x5EED);

    let game = load_tuning(tuning_path).and_then(|t| Game::new(seed, t));
    let mut game = match game {
        Ok(game) => game,
        Err(e) => {
            log::error!("Failed to start: {}", e);
            std::process::exit(1);
        }
    };
    log::info!("Game initialized with seed: {}", seed);

    let frames = (seconds / FRAME_DT).ceil() as u32;
    for _ in 0..frames {
        game.frame(FRAME_DT);
    }

    let session = &game.state.session;
    log::info!(
        "Ran {:.0}s: {} session(s), {} meteors destroyed, score {}, energy {}, phase {:?}",
        seconds,
        game.sessions,
        game.destroyed,
        session.score,
        session.energy,
        session.phase,
    );
    if session.phase == GamePhase::Running {
        log::info!("Still defending at tier {}", session.tier());
    }
    log::debug!("{} cues played", game.audio.played());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser hosts drive the library directly
}
