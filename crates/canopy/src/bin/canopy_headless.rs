//! # CANOPY Headless
//!
//! Runs the demo scene without a window: a scripted input sequence, a
//! fixed step per frame and a recording render target.
//!
//! ```bash
//! # Defaults, 600 frames
//! canopy_headless
//!
//! # Custom config and frame count
//! RUST_LOG=canopy=debug canopy_headless canopy.toml 1200
//! ```

use std::process::ExitCode;

use canopy::{ConfigError, ConfigResult, Game, GameConfig, InputEvent, Key, RecordingTarget};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_FRAMES: u64 = 600;

/// Inputs delivered at the start of the given frame.
const SCRIPT: &[(u64, InputEvent)] = &[
    (30, InputEvent::KeyDown(Key::Right)),
    (90, InputEvent::KeyUp(Key::Right)),
    (100, InputEvent::KeyDown(Key::Down)),
    (120, InputEvent::KeyDown(Key::Space)),
    (121, InputEvent::KeyUp(Key::Space)),
    (160, InputEvent::KeyUp(Key::Down)),
    (200, InputEvent::KeyDown(Key::Char('d'))),
    (240, InputEvent::KeyDown(Key::Space)),
    (241, InputEvent::KeyUp(Key::Space)),
];

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> ConfigResult<()> {
    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    let frames = match args.next() {
        Some(value) => value
            .parse::<u64>()
            .map_err(|err| ConfigError::Invalid(format!("frame count {value:?}: {err}")))?,
        None => DEFAULT_FRAMES,
    };

    let step_ms = config.frame_budget_ms();
    let mut game = Game::new(config)?;
    let scene = game.load_demo_scene();
    let mut target = RecordingTarget::new();

    info!("running {frames} frames at {step_ms}ms per frame");

    let mut collisions = 0;
    let mut fired = 0;
    let mut expired = 0;
    let mut destroyed = 0;
    let mut drawn = 0;

    for frame in 1..=frames {
        let inputs: Vec<InputEvent> = SCRIPT
            .iter()
            .filter(|(at, _)| *at == frame)
            .map(|&(_, input)| input)
            .collect();
        game.process_input(&inputs);
        if !game.is_running() {
            break;
        }

        let stats = game.update(step_ms);
        collisions += stats.collisions;
        fired += stats.projectiles_fired;
        expired += stats.expired;
        destroyed += stats.reconcile.removed;

        drawn = game.render(&mut target);
    }

    let registry = game.registry();
    let chopper = registry.entity(scene.chopper);
    info!(
        "finished after {} frames ({}ms simulated)",
        game.frame(),
        game.clock().now_ms()
    );
    info!(
        "{} entities alive, {collisions} colliding pairs, {fired} interval shots, \
         {expired} expired, {destroyed} destroyed",
        registry.alive_count()
    );
    if chopper.is_alive() {
        if let Some(transform) = chopper.try_component::<canopy::components::Transform>() {
            info!(
                "chopper at ({:.1}, {:.1}), camera {:?}",
                transform.position.x,
                transform.position.y,
                game.camera()
            );
        }
    }
    info!(
        "last frame: {drawn} sprites, {} draw calls, {} frames presented",
        target.commands().len(),
        target.frames_presented()
    );
    Ok(())
}
