//! Speed Racer headless runner
//!
//! Drives the simulation with the autopilot (or a fixed key set) at a fixed
//! frame rate and prints a JSON summary of the run.
//!
//! Usage: `speed-racer [--tuning FILE] [--seed N] [--seconds N] [--manual]`

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use speed_racer::Tuning;
use speed_racer::consts::{MAX_SUBSTEPS, SIM_DT};
use speed_racer::sim::{Controls, GameEvent, GamePhase, GameState, TickInput, tick};

/// Frame time of the pretend display; the simulation substeps at `SIM_DT`
const FRAME_DT: f32 = 1.0 / 30.0;
const DEFAULT_SECONDS: f32 = 120.0;

#[derive(Debug, Default)]
struct Options {
    tuning: Option<PathBuf>,
    seed: Option<u64>,
    seconds: f32,
    manual: bool,
}

impl Options {
    fn from_args() -> Self {
        let mut options = Self {
            seconds: DEFAULT_SECONDS,
            ..Default::default()
        };

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--tuning" => options.tuning = args.next().map(PathBuf::from),
                "--seed" => match args.next().map(|s| s.parse::<u64>()) {
                    Some(Ok(seed)) => options.seed = Some(seed),
                    _ => log::warn!("Ignoring invalid --seed, using a time-based seed"),
                },
                "--seconds" => match args.next().map(|s| s.parse::<f32>()) {
                    Some(Ok(seconds)) if seconds > 0.0 => options.seconds = seconds,
                    _ => log::warn!("Ignoring invalid --seconds, running {DEFAULT_SECONDS}s"),
                },
                "--manual" => options.manual = true,
                other => log::warn!("Unknown argument `{other}`"),
            }
        }

        options
    }
}

/// Run instance with a fixed-step accumulator
struct Runner {
    state: GameState,
    input: TickInput,
    accumulator: f32,
    hits: u32,
}

impl Runner {
    fn new(state: GameState, manual: bool) -> Self {
        let input = if manual {
            // Hold the throttle and nothing else
            TickInput {
                controls: Controls {
                    up: true,
                    ..Default::default()
                },
                autopilot: false,
            }
        } else {
            TickInput {
                autopilot: true,
                ..Default::default()
            }
        };

        Self {
            state,
            input,
            accumulator: 0.0,
            hits: 0,
        }
    }

    /// Run simulation ticks for one display frame
    fn update(&mut self, dt: f32) {
        self.accumulator += dt.min(0.1);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &self.input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            for event in self.state.drain_events() {
                self.report(&event);
            }
        }
    }

    fn report(&mut self, event: &GameEvent) {
        match event {
            GameEvent::CarSpawned { id } => log::trace!("car {id} spawned"),
            GameEvent::CarDodged { id } => log::trace!("car {id} dodged"),
            GameEvent::PlayerHit { health } => {
                self.hits += 1;
                log::debug!(
                    "tick {}: hit, health {health}",
                    self.state.time_ticks
                );
            }
            GameEvent::GameOver { won, score } => {
                log::info!(
                    "tick {}: game over ({}), score {score:.2}",
                    self.state.time_ticks,
                    if *won { "won" } else { "lost" }
                );
            }
        }
    }
}

/// What the runner prints at the end
#[derive(Debug, Serialize)]
struct RunSummary {
    seed: u64,
    ticks: u64,
    seconds: f32,
    phase: GamePhase,
    score: f32,
    cars_dodged: u32,
    distance: f32,
    health: i32,
    hits: u32,
    cars_on_road: u32,
}

impl RunSummary {
    fn of(runner: &Runner) -> Self {
        let state = &runner.state;
        Self {
            seed: state.seed,
            ticks: state.time_ticks,
            seconds: state.time_ticks as f32 * SIM_DT,
            phase: state.phase,
            score: state.score,
            cars_dodged: state.cars_dodged,
            distance: state.distance(),
            health: state.player_health(),
            hits: runner.hits,
            cars_on_road: state.car_count(),
        }
    }
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Speed Racer (headless) starting...");

    let options = Options::from_args();

    let tuning = match &options.tuning {
        Some(path) => match Tuning::load(path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("{e}");
                return ExitCode::FAILURE;
            }
        },
        None => Tuning::default(),
    };

    let seed = options.seed.unwrap_or_else(time_seed);
    log::info!(
        "Game initialized with seed: {} ({})",
        seed,
        if options.manual { "manual" } else { "autopilot" }
    );

    let state = match GameState::try_with_tuning(seed, tuning) {
        Ok(state) => state,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    let mut runner = Runner::new(state, options.manual);

    let frames = (options.seconds / FRAME_DT).ceil() as u64;
    for _ in 0..frames {
        runner.update(FRAME_DT);
        if runner.state.phase.is_over() {
            break;
        }
    }

    let summary = RunSummary::of(&runner);
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Failed to encode run summary: {e}");
            ExitCode::FAILURE
        }
    }
}
