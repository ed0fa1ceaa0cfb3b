#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Balloon Defence experience.

mod headless;

use std::{
    fs,
    path::{Path, PathBuf},
    process::ExitCode,
    time::Duration,
};

use anyhow::{Context, Result};
use balloon_defence_core::{Command, GameRules, Health, SimulationStatus};
use balloon_defence_rendering::{
    Color, Decorations, Presentation, RenderingBackend, Scene, SceneBase, SceneEnemy, SceneTower,
    Scenery,
};
use balloon_defence_rendering_macroquad::MacroquadBackend;
use balloon_defence_simulation::{apply, query, Game};
use clap::Parser;
use glam::Vec2;
use tracing_subscriber::EnvFilter;

use self::headless::HeadlessOptions;

const DEFAULT_LOG_FILTER: &str = "balloon_defence=info";

/// Command-line arguments accepted by the Balloon Defence binary.
#[derive(Debug, Parser)]
#[command(name = "balloon-defence", about = "Defend the base against waves of balloons.")]
struct CliArgs {
    /// Asset manifest listing sprites and the font.
    #[arg(long, value_name = "PATH", default_value = "assets/manifest.toml")]
    manifest: PathBuf,
    /// TOML file overriding gameplay rules; omitted keys keep their defaults.
    #[arg(long, value_name = "PATH")]
    rules: Option<PathBuf>,
    /// Synchronise presentation with the display refresh rate.
    #[arg(long)]
    vsync: bool,
    /// Log the frame rate once per second.
    #[arg(long)]
    show_fps: bool,
    /// Run the simulation without a window and log a summary.
    #[arg(long)]
    headless: bool,
    /// Maximum number of ticks in headless mode.
    #[arg(long, value_name = "N", default_value_t = 3600)]
    frames: u32,
    /// Simulated milliseconds per tick in headless mode.
    #[arg(
        long,
        value_name = "MS",
        default_value_t = 16,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    frame_ms: u64,
    /// Tower to place before the first tick; may be repeated.
    #[arg(long = "tower", value_name = "X,Y", value_parser = parse_tower_position)]
    towers: Vec<Vec2>,
}

/// Entry point for the Balloon Defence command-line interface.
fn main() -> ExitCode {
    init_tracing();

    match run(CliArgs::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!("{error:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run(args: CliArgs) -> Result<()> {
    let rules = load_rules(args.rules.as_deref())?;

    if args.headless {
        let options = HeadlessOptions {
            frames: args.frames,
            frame_time: Duration::from_millis(args.frame_ms),
            towers: args.towers,
        };
        let summary = headless::run(&rules, &options);
        tracing::info!(
            frames = summary.frames_run,
            elapsed_secs = summary.elapsed.as_secs_f32(),
            towers_placed = summary.towers_placed,
            towers_rejected = summary.towers_rejected,
            enemies_spawned = summary.enemies_spawned,
            enemies_killed = summary.enemies_killed,
            base_health = summary.base_health.get(),
            status = ?summary.status,
            "headless session finished"
        );
        return Ok(());
    }

    let backend = MacroquadBackend::new()
        .with_vsync(args.vsync)
        .with_show_fps(args.show_fps)
        .with_manifest_path(args.manifest);
    run_windowed(backend, &rules, args.towers)
}

fn load_rules(path: Option<&Path>) -> Result<GameRules> {
    let Some(path) = path else {
        return Ok(GameRules::default());
    };

    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read rules file at {}", path.display()))?;
    let rules = GameRules::from_toml_str(&contents)
        .with_context(|| format!("invalid rules file {}", path.display()))?;
    tracing::info!(rules = %path.display(), "loaded gameplay rules");
    Ok(rules)
}

fn run_windowed<B: RenderingBackend>(backend: B, rules: &GameRules, towers: Vec<Vec2>) -> Result<()> {
    let mut game = Game::new(rules);
    let mut events = Vec::new();
    for position in towers {
        apply(&mut game, Command::PlaceTower { position }, &mut events);
    }
    tracing::info!("{}", query::welcome_banner(&game));

    let enemy_health = rules.enemy_health;
    let mut scene = Scene::new(
        SceneBase::from_snapshot(&query::base(&game)),
        Scenery::classic(),
        Decorations::classic(),
    );
    refresh_scene(&game, enemy_health, &mut scene);

    let presentation = Presentation::new("Balloon Defence", Color::BLACK, scene);
    backend.run(presentation, move |dt, input, scene| {
        events.clear();
        if let Some(position) = input.placement() {
            apply(&mut game, Command::PlaceTower { position }, &mut events);
        }
        apply(&mut game, Command::Tick { dt }, &mut events);

        scene.decorations.advance(dt);
        refresh_scene(&game, enemy_health, scene);
    })
}

/// Rebuilds the simulation-derived parts of the scene.
fn refresh_scene(game: &Game, enemy_health: Health, scene: &mut Scene) {
    scene.base = SceneBase::from_snapshot(&query::base(game));
    scene.towers = query::towers(game)
        .iter()
        .map(SceneTower::from_snapshot)
        .collect();
    scene.enemies = query::enemy_view(game)
        .iter()
        .map(|enemy| SceneEnemy::from_snapshot(enemy, enemy_health))
        .collect();
    scene.game_over = query::status(game) == SimulationStatus::GameOver;
}

fn parse_tower_position(value: &str) -> Result<Vec2, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but found `{value}`"))?;
    let coordinate = |text: &str| {
        text.trim()
            .parse::<f32>()
            .ok()
            .filter(|number| number.is_finite())
            .ok_or_else(|| format!("invalid coordinate `{text}`"))
    };
    Ok(Vec2::new(coordinate(x)?, coordinate(y)?))
}
