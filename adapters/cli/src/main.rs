#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Face Arena experience.

mod emulation;
mod headless;
mod scene;

use std::{
    fmt,
    path::{Path, PathBuf},
    process::ExitCode,
    rc::Rc,
    time::Instant,
};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use face_arena_core::WELCOME_BANNER;
use face_arena_rendering::{
    Color, FrameSimulationBreakdown, Presentation, RenderingBackend, Scene,
};
use face_arena_rendering_macroquad::MacroquadBackend;
use face_arena_simulation::{GameConfig, OperatorInput, Session, Simulation};
use glam::Vec2;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::emulation::{KeyboardAudio, KeyboardPerception, SharedFace};

const WINDOW_TITLE: &str = "Face Arena";

/// Height of the emulated face anchor as a fraction of the play area.
const EMULATED_ANCHOR_HEIGHT: f32 = 0.75;

/// Background behind the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum BackgroundColor {
    Black,
    Green,
    Blue,
    White,
    Transparent,
}

impl BackgroundColor {
    fn color(self) -> Color {
        match self {
            Self::Black => Color::from_rgb_u8(0, 0, 0),
            Self::Green => Color::from_rgb_u8(0, 255, 0),
            Self::Blue => Color::from_rgb_u8(0, 0, 255),
            Self::White => Color::from_rgb_u8(255, 255, 255),
            Self::Transparent => Color::new(0.0, 0.0, 0.0, 0.0),
        }
    }
}

/// Command-line arguments accepted by the Face Arena binary.
#[derive(Debug, Parser)]
#[command(name = "face-arena")]
#[command(about = "Face-tracked arcade arena with waves, bosses, and an eternal antagonist")]
struct Args {
    /// Borderless overlay presentation that hides minions and moves the HUD.
    #[arg(long)]
    stream_mode: bool,

    /// Background colour behind the arena.
    #[arg(long, value_enum, default_value_t = BackgroundColor::Black)]
    bg_color: BackgroundColor,

    /// Game configuration file in TOML format.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Replays a JSON perception script without opening a window.
    #[arg(long, value_name = "SCRIPT")]
    headless: Option<PathBuf>,

    /// Overrides the random seed from the configuration.
    #[arg(long)]
    seed: Option<u64>,

    /// Logs frame timings once per second.
    #[arg(long)]
    show_fps: bool,

    /// Tracing filter directive; falls back to `RUST_LOG`, then `info`.
    #[arg(long, value_name = "DIRECTIVE")]
    log_filter: Option<String>,
}

/// Presentation mode the binary runs in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RunMode {
    Windowed,
    Stream,
    Headless,
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Windowed => "windowed",
            Self::Stream => "stream",
            Self::Headless => "headless",
        })
    }
}

impl Args {
    fn mode(&self) -> RunMode {
        if self.headless.is_some() {
            RunMode::Headless
        } else if self.stream_mode {
            RunMode::Stream
        } else {
            RunMode::Windowed
        }
    }
}

/// Entry point for the Face Arena command-line interface.
fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.log_filter.as_deref());
    info!(mode = %args.mode(), "{}", WELCOME_BANNER);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!(
                mode = %args.mode(),
                background = ?args.bg_color,
                config = ?args.config,
                "fatal error: {error:#}"
            );
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(directive: Option<&str>) {
    let (filter, rejected) = match directive.map(EnvFilter::try_new) {
        Some(Ok(filter)) => (filter, None),
        Some(Err(parse_error)) => (default_filter(), Some(parse_error)),
        None => (default_filter(), None),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Some(parse_error) = rejected {
        warn!(%parse_error, "ignoring invalid --log-filter directive");
    }
}

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn run(args: &Args) -> Result<()> {
    let config = load_config(args.config.as_deref(), args.seed)?;
    debug!(?config, "configuration loaded");

    match &args.headless {
        Some(script) => {
            let _ = headless::run(script, &config)?;
            Ok(())
        }
        None => run_windowed(args, &config),
    }
}

fn load_config(path: Option<&Path>, seed: Option<u64>) -> Result<GameConfig> {
    let mut config = match path {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("failed to load configuration {}", path.display()))?,
        None => GameConfig::default(),
    };
    if let Some(seed) = seed {
        config.seed = seed;
    }
    Ok(config)
}

fn run_windowed(args: &Args, config: &GameConfig) -> Result<()> {
    let area = config.play_area();
    let scene =
        Scene::new(area.width(), area.height()).context("play area cannot be presented")?;
    let anchor = Vec2::new(area.width() * 0.5, area.height() * EMULATED_ANCHOR_HEIGHT);

    let face = SharedFace::default();
    let mut session = Session::new(
        Simulation::new(config),
        KeyboardPerception::new(Rc::clone(&face)),
        KeyboardAudio::new(Rc::clone(&face)),
    );
    let presentation = Presentation::new(WINDOW_TITLE, args.bg_color.color(), scene)
        .with_stream_mode(args.stream_mode);
    let backend = MacroquadBackend::new()
        .with_vsync(true)
        .with_show_fps(args.show_fps);

    let mut paused = false;
    backend.run(presentation, move |dt, input, target| {
        if input.pause_toggle {
            paused = !paused;
            info!(paused, "pause toggled");
        }
        face.borrow_mut().update(&input, anchor);

        let simulation_start = Instant::now();
        let _ = session
            .frame(
                dt,
                OperatorInput {
                    paused,
                    speak: input.speak,
                },
            )
            .context("device failure during the frame loop")?;
        let simulation = simulation_start.elapsed();

        let population_start = Instant::now();
        scene::populate(session.simulation().world(), paused, target);

        Ok(FrameSimulationBreakdown {
            simulation,
            scene_population: population_start.elapsed(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arguments_select_the_mode() {
        let windowed = Args::parse_from(["face-arena"]);
        assert_eq!(windowed.mode(), RunMode::Windowed);
        assert_eq!(windowed.bg_color, BackgroundColor::Black);

        let stream = Args::parse_from(["face-arena", "--stream-mode", "--bg-color", "green"]);
        assert_eq!(stream.mode(), RunMode::Stream);
        assert_eq!(stream.bg_color.color(), Color::from_rgb_u8(0, 255, 0));

        let headless = Args::parse_from([
            "face-arena",
            "--stream-mode",
            "--headless",
            "script.json",
            "--seed",
            "7",
        ]);
        assert_eq!(headless.mode(), RunMode::Headless);
        assert_eq!(headless.seed, Some(7));
    }

    #[test]
    fn unknown_background_colours_are_rejected() {
        assert!(Args::try_parse_from(["face-arena", "--bg-color", "mauve"]).is_err());
    }

    #[test]
    fn seed_override_replaces_the_configured_seed() {
        let config = load_config(None, Some(99)).expect("defaults load");

        assert_eq!(config.seed, 99);
        assert_eq!(config.kill_thresholds, GameConfig::default().kill_thresholds);
    }

    #[test]
    fn missing_configuration_names_the_path() {
        let error = load_config(Some(Path::new("/nonexistent/face-arena.toml")), None)
            .expect_err("missing file");

        assert!(format!("{error:#}").contains("/nonexistent/face-arena.toml"));
    }
}
