//! Game state and core simulation types
//!
//! All per-run mutable state lives here and is recreated wholesale on reset.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::collision::Aabb;
use super::spawn::{Pattern, Spawner};
use crate::config::{EngineConfig, SizingMode};
use crate::consts::*;
use crate::normalize_angle;

/// Current mode of the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    /// Fresh engine, no run yet; waiting for the first activate
    NotStarted,
    /// Active run
    Running,
    /// Run ended; waiting for activate to restart
    GameOver,
}

/// The controllable entity
#[derive(Debug, Clone)]
pub struct Player {
    /// Top-left corner, world units
    pub pos: Vec2,
    /// Fixed for the run, derived once at reset
    pub size: Vec2,
    /// Vertical velocity, world units per tick
    pub velocity: f32,
}

impl Player {
    /// Fresh player at the layout's start position
    pub fn spawn(layout: &Layout) -> Self {
        Self {
            pos: layout.player_pos,
            size: layout.player_size,
            velocity: 0.0,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// A scrolling obstacle
#[derive(Debug, Clone)]
pub struct Obstacle {
    /// Top-left corner, world units
    pub pos: Vec2,
    pub size: Vec2,
    /// Cosmetic rotation; the collision box stays axis-aligned
    pub angle: f32,
    /// Radians per tick, zero for non-rotating spawns
    pub angular_vel: f32,
    /// Per-obstacle speed override; `None` uses the shared speed
    pub speed: Option<f32>,
}

impl Obstacle {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            size,
            angle: 0.0,
            angular_vel: 0.0,
            speed: None,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    /// Advance one tick leftward at the shared speed unless overridden
    pub fn advance(&mut self, shared_speed: f32) {
        self.pos.x -= self.speed.unwrap_or(shared_speed);
        if self.angular_vel != 0.0 {
            self.angle = normalize_angle(self.angle + self.angular_vel);
        }
    }

    /// Fully past the left edge and due for removal
    pub fn off_screen(&self) -> bool {
        self.pos.x + self.size.x <= 0.0
    }
}

/// Score-gated difficulty ratchet
///
/// Speed only rises and the spawn interval only falls, each bounded.
#[derive(Debug, Clone, PartialEq)]
pub struct Difficulty {
    /// Shared obstacle speed, world units per tick
    pub speed: f32,
    /// Current ticks between spawn events
    pub spawn_interval: u32,
    milestone: u64,
    speed_step: f32,
    interval_step: u32,
    interval_floor: u32,
    /// Last score a ratchet was applied at, guards double-apply
    last_applied: u64,
}

impl Difficulty {
    pub fn new(base_speed: f32, config: &EngineConfig) -> Self {
        debug_assert!(config.milestone > 0);
        debug_assert!(config.interval_floor > 0);
        Self {
            speed: base_speed,
            spawn_interval: config.spawn_interval,
            milestone: config.milestone.max(1),
            speed_step: config.speed_step,
            interval_step: config.interval_step,
            interval_floor: config.interval_floor,
            last_applied: 0,
        }
    }

    /// Ratchet once if `score` sits on a fresh milestone
    pub fn on_score(&mut self, score: u64) {
        if score == 0 || !score.is_multiple_of(self.milestone) || score == self.last_applied {
            return;
        }
        self.speed += self.speed_step;
        self.spawn_interval = self
            .spawn_interval
            .saturating_sub(self.interval_step)
            .max(self.interval_floor);
        self.last_applied = score;
    }
}

/// Concrete world-unit sizing, derived once per reset
///
/// Under adaptive sizing everything scales off the viewport; under fixed
/// sizing the config's literal constants are used and the host viewport is
/// ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    /// World bounds (ceiling at y=0, floor at y=viewport.y)
    pub viewport: Vec2,
    pub player_pos: Vec2,
    pub player_size: Vec2,
    pub obstacle_size: Vec2,
    /// Shared obstacle speed before any difficulty ratchet
    pub base_speed: f32,
    pub pattern: Pattern,
}

impl Layout {
    pub fn resolve(config: &EngineConfig, viewport: Vec2) -> Self {
        match config.sizing {
            SizingMode::Adaptive => Self {
                viewport,
                player_pos: Vec2::new(
                    viewport.x * PLAYER_X_FRAC,
                    viewport.y * PLAYER_Y_FRAC,
                ),
                player_size: Vec2::new(
                    viewport.x * PLAYER_W_FRAC,
                    viewport.x * PLAYER_H_FRAC,
                ),
                obstacle_size: Vec2::new(
                    viewport.x * OBSTACLE_W_FRAC,
                    viewport.x * OBSTACLE_H_FRAC,
                ),
                base_speed: viewport.x * OBSTACLE_SPEED_FRAC,
                pattern: Pattern::resolve(&config.pattern, Some(viewport)),
            },
            SizingMode::Fixed => Self {
                viewport: config.fixed_viewport,
                player_pos: Vec2::new(
                    config.fixed_viewport.x * PLAYER_X_FRAC,
                    config.fixed_viewport.y * PLAYER_Y_FRAC,
                ),
                player_size: config.fixed_player_size,
                obstacle_size: config.fixed_obstacle_size,
                base_speed: config.fixed_obstacle_speed,
                pattern: Pattern::resolve(&config.pattern, None),
            },
        }
    }
}

/// Complete engine state
///
/// Owned by one controller and passed by reference into `step`/`activate`;
/// there are no ambient globals. The RNG stream persists across resets so
/// randomized spawns are drawn fresh each run.
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub mode: GameMode,
    /// Incremented exactly once per running tick
    pub score: u64,
    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub spawner: Spawner,
    pub difficulty: Difficulty,
    /// Sizing resolved at the last reset
    pub layout: Layout,
    pub config: EngineConfig,
    /// Host viewport, consumed by the next reset
    viewport: Vec2,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Create an engine that has not started a run yet
    pub fn new(config: EngineConfig, viewport: Vec2, seed: u64) -> Self {
        let layout = Layout::resolve(&config, viewport);
        Self {
            seed,
            mode: GameMode::NotStarted,
            score: 0,
            player: Player::spawn(&layout),
            obstacles: Vec::new(),
            spawner: Spawner::new(layout.pattern.clone(), config.max_obstacles),
            difficulty: Difficulty::new(layout.base_speed, &config),
            layout,
            viewport,
            rng: Pcg32::seed_from_u64(seed),
            config,
        }
    }

    /// Record a viewport change; sizing is re-derived at the next reset
    pub fn set_viewport(&mut self, viewport: Vec2) {
        self.viewport = viewport;
    }

    /// Begin a fresh run: all mutable state is recreated, difficulty and
    /// timers return to base values, and the mode becomes `Running`
    pub fn reset(&mut self) {
        self.layout = Layout::resolve(&self.config, self.viewport);
        self.player = Player::spawn(&self.layout);
        self.obstacles.clear();
        self.score = 0;
        self.spawner = Spawner::new(self.layout.pattern.clone(), self.config.max_obstacles);
        self.difficulty = Difficulty::new(self.layout.base_speed, &self.config);
        self.mode = GameMode::Running;
    }
}
