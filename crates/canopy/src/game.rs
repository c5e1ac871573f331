//! # Frame Loop
//!
//! ```text
//! Frame N:
//! ┌──────────────────────────────────────────────────────────────────┐
//! │ 1. INPUT    process_input                                        │
//! │    └─ quit / debug toggle, key events onto the bus               │
//! │                                                                  │
//! │ 2. UPDATE   update(elapsed_ms)                                   │
//! │    ├─ advance the clock                                          │
//! │    ├─ reset the bus, re-subscribe event-driven systems           │
//! │    ├─ camera, projectile emit, collision, movement,              │
//! │    │  lifecycle, animation                                       │
//! │    └─ registry.update() commits staged additions and kills       │
//! │                                                                  │
//! │ 3. RENDER   render(target)                                       │
//! │    └─ sprites, debug colliders, health bars                      │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Entities spawned or killed during a frame only reach (or leave)
//! systems at the reconciliation that closes step 2.

use canopy_core::{EventBus, FrameClock, ReconcileStats, Registry};

use crate::config::{ConfigResult, GameConfig};
use crate::events::{InputEvent, Key, KeyPressedEvent, KeyReleasedEvent};
use crate::math::Rect;
use crate::render::{Color, RenderTarget};
use crate::scene::{load_demo_scene, DemoScene};
use crate::systems::{
    AnimationSystem, CameraMovementSystem, CollisionSystem, DamageSystem, KeyboardMovementSystem,
    LifecycleSystem, MovementSystem, ProjectileEmitSystem, RenderColliderSystem, RenderHealthSystem,
    RenderSystem,
};

/// Key that toggles collider outlines.
pub const DEBUG_KEY: Key = Key::Char('d');

/// What happened during one [`Game::update`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Frame number, starting at 1.
    pub frame: u64,
    /// Clock value after the step.
    pub now_ms: u64,
    /// Colliding pairs found.
    pub collisions: usize,
    /// Projectiles spawned by interval fire.
    pub projectiles_fired: u64,
    /// Entities whose lifetime ran out.
    pub expired: usize,
    /// Result of the closing reconciliation.
    pub reconcile: ReconcileStats,
}

/// The simulation: registry, event bus, clock and camera.
pub struct Game {
    config: GameConfig,
    clock: FrameClock,
    registry: Registry,
    events: EventBus,
    camera: Rect,
    is_running: bool,
    is_debug: bool,
    frame: u64,
}

impl Game {
    /// Creates a game with every default system registered.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ConfigError::Invalid`] if `config` does not validate.
    pub fn new(config: GameConfig) -> ConfigResult<Self> {
        config.validate()?;

        let mut game = Self {
            camera: Rect::new(0, 0, config.window_width, config.window_height),
            is_debug: config.debug_colliders,
            config,
            clock: FrameClock::new(),
            registry: Registry::new(),
            events: EventBus::new(),
            is_running: true,
            frame: 0,
        };
        game.register_default_systems()?;
        game.subscribe_systems();

        tracing::info!(
            "game ready: viewport {}x{}, map {}x{}",
            game.config.window_width,
            game.config.window_height,
            game.config.map_width,
            game.config.map_height
        );
        Ok(game)
    }

    /// Registers the simulation and render systems.
    ///
    /// Registering again replaces each system with a fresh instance
    /// matched against the current entities.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ConfigError::Invalid`] if the fire key is unknown.
    pub fn register_default_systems(&mut self) -> ConfigResult<()> {
        let fire_key = self.config.fire_key()?;

        self.registry.add_system(MovementSystem::new());
        self.registry.add_system(RenderSystem::new());
        self.registry.add_system(AnimationSystem::new());
        self.registry.add_system(CollisionSystem::new());
        self.registry.add_system(RenderColliderSystem::new());
        self.registry.add_system(DamageSystem::new());
        self.registry.add_system(KeyboardMovementSystem::new());
        self.registry.add_system(CameraMovementSystem::new());
        self.registry.add_system(ProjectileEmitSystem::new(fire_key));
        self.registry.add_system(LifecycleSystem::new());
        self.registry.add_system(RenderHealthSystem::new());
        Ok(())
    }

    /// Clears the bus and subscribes the event-driven systems.
    pub fn subscribe_systems(&mut self) {
        self.events.reset();
        KeyboardMovementSystem::subscribe_to_events(&mut self.events);
        ProjectileEmitSystem::subscribe_to_events(&mut self.events);
        DamageSystem::subscribe_to_events(&mut self.events);
    }

    /// Spawns the demo level.
    pub fn load_demo_scene(&mut self) -> DemoScene {
        load_demo_scene(&mut self.registry, &self.config, self.clock.now_ms())
    }

    /// Handles this frame's raw input.
    ///
    /// Quit and Escape stop the game. Every key change is also delivered
    /// to the bus as a pressed or released event.
    pub fn process_input(&mut self, inputs: &[InputEvent]) {
        let now_ms = self.clock.now_ms();
        self.registry
            .get_system_mut::<ProjectileEmitSystem>()
            .set_clock(now_ms);

        for &input in inputs {
            match input {
                InputEvent::Quit | InputEvent::KeyDown(Key::Escape) => {
                    tracing::info!("quit requested");
                    self.is_running = false;
                }
                InputEvent::KeyDown(key) => {
                    if key == DEBUG_KEY {
                        self.is_debug = !self.is_debug;
                        tracing::debug!("collider outlines {}", if self.is_debug { "on" } else { "off" });
                    }
                    self.events.emit(&mut self.registry, KeyPressedEvent { key });
                }
                InputEvent::KeyUp(key) => {
                    self.events.emit(&mut self.registry, KeyReleasedEvent { key });
                }
            }
        }
    }

    /// Steps the simulation by `elapsed_ms`.
    pub fn update(&mut self, elapsed_ms: u64) -> FrameStats {
        self.frame += 1;
        let now_ms = self.clock.advance(elapsed_ms);
        let delta_time = self.clock.delta_seconds();

        self.subscribe_systems();

        let (map_width, map_height) = (self.config.map_width, self.config.map_height);
        self.registry
            .get_system::<CameraMovementSystem>()
            .update(&self.registry, &mut self.camera, map_width, map_height);

        let projectiles_fired = self
            .registry
            .run_system::<ProjectileEmitSystem, _>(|system, registry| system.update(registry, now_ms));
        let collisions = self
            .registry
            .run_system::<CollisionSystem, _>(|system, registry| system.update(registry, &mut self.events));
        self.registry
            .run_system::<MovementSystem, _>(|system, registry| system.update(registry, delta_time));
        let expired = self
            .registry
            .run_system::<LifecycleSystem, _>(|system, registry| system.update(registry, now_ms));
        self.registry
            .run_system::<AnimationSystem, _>(|system, registry| system.update(registry, now_ms));

        let reconcile = self.registry.update();

        let stats = FrameStats {
            frame: self.frame,
            now_ms,
            collisions,
            projectiles_fired,
            expired,
            reconcile,
        };
        tracing::trace!("frame {stats:?}");
        stats
    }

    /// Draws the current state and presents it.
    ///
    /// # Returns
    ///
    /// The number of sprites drawn.
    pub fn render(&self, target: &mut dyn RenderTarget) -> usize {
        target.clear(Color::BACKGROUND);

        let drawn = self
            .registry
            .get_system::<RenderSystem>()
            .update(&self.registry, target, self.camera);
        if self.is_debug {
            self.registry
                .get_system::<RenderColliderSystem>()
                .update(&self.registry, target, self.camera);
        }
        self.registry
            .get_system::<RenderHealthSystem>()
            .update(&self.registry, target, self.camera);

        target.present();
        drawn
    }

    /// Stops the game.
    pub fn quit(&mut self) {
        self.is_running = false;
    }

    /// Returns `false` once quit was requested.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.is_running
    }

    /// Returns `true` while collider outlines are drawn.
    #[must_use]
    pub fn is_debug(&self) -> bool {
        self.is_debug
    }

    /// Frames stepped so far.
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Current camera viewport in world pixels.
    #[must_use]
    pub fn camera(&self) -> Rect {
        self.camera
    }

    /// The simulation clock.
    #[must_use]
    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The entity registry.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Mutable access to the registry, for spawning outside the demo scene.
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }
}
