//! Timer-driven obstacle spawn scheduler
//!
//! One spawn event fires each time the tick counter exceeds the current
//! spawn interval. Three pattern families are supported; whichever is
//! configured, new obstacles always enter at or past the right viewport
//! edge so they are never visible at spawn.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{Layout, Obstacle};
use crate::config::PatternConfig;
use crate::consts::SPAWN_MARGIN;

/// A spawn pattern with world-unit tuning, resolved from `PatternConfig`
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    /// Burst of obstacles along a fixed vertical sequence
    ZigZag { offsets: Vec<f32>, spacing: f32 },
    /// Two obstacles bracketing a randomly placed corridor
    PairedGap {
        gap_height: f32,
        margin: f32,
        angular_speed: f32,
        speed_jitter: f32,
    },
    /// One obstacle at a uniformly random height
    SingleRandom,
}

impl Pattern {
    /// Resolve config values into world units
    ///
    /// `viewport` is present under adaptive sizing, where zig-zag offsets
    /// are height fractions and spacing is a width fraction; fixed sizing
    /// passes `None` and the literals are used as-is.
    pub fn resolve(config: &PatternConfig, viewport: Option<Vec2>) -> Self {
        match (config, viewport) {
            (PatternConfig::ZigZag { offsets, spacing }, Some(vp)) => Pattern::ZigZag {
                offsets: offsets.iter().map(|f| f * vp.y).collect(),
                spacing: spacing * vp.x,
            },
            (PatternConfig::ZigZag { offsets, spacing }, None) => Pattern::ZigZag {
                offsets: offsets.clone(),
                spacing: *spacing,
            },
            (
                PatternConfig::PairedGap {
                    gap_height,
                    margin,
                    angular_speed,
                    speed_jitter,
                },
                _,
            ) => Pattern::PairedGap {
                gap_height: *gap_height,
                margin: *margin,
                angular_speed: *angular_speed,
                speed_jitter: *speed_jitter,
            },
            (PatternConfig::SingleRandom, _) => Pattern::SingleRandom,
        }
    }
}

/// Timer-driven spawn scheduler
#[derive(Debug, Clone)]
pub struct Spawner {
    pattern: Pattern,
    max_obstacles: usize,
    /// Ticks since the last spawn event
    pub timer: u32,
}

impl Spawner {
    pub fn new(pattern: Pattern, max_obstacles: usize) -> Self {
        Self {
            pattern,
            max_obstacles,
            timer: 0,
        }
    }

    /// Advance the spawn timer one tick, firing one spawn event once the
    /// counter exceeds `interval`. The timer resets on every event, even
    /// when the population cap suppresses the spawn itself.
    pub fn tick(
        &mut self,
        interval: u32,
        layout: &Layout,
        shared_speed: f32,
        obstacles: &mut Vec<Obstacle>,
        rng: &mut Pcg32,
    ) {
        self.timer += 1;
        if self.timer <= interval {
            return;
        }
        self.timer = 0;
        self.spawn(layout, shared_speed, obstacles, rng);
    }

    /// Emit one spawn event for the configured pattern
    fn spawn(
        &self,
        layout: &Layout,
        shared_speed: f32,
        obstacles: &mut Vec<Obstacle>,
        rng: &mut Pcg32,
    ) {
        let vp = layout.viewport;
        let size = layout.obstacle_size;

        match &self.pattern {
            Pattern::ZigZag { offsets, spacing } => {
                // All-or-nothing: over the cap the whole burst is skipped
                if obstacles.len() > self.max_obstacles {
                    return;
                }
                let start_x = vp.x + SPAWN_MARGIN;
                for (i, &y) in offsets.iter().enumerate() {
                    obstacles.push(Obstacle::new(
                        Vec2::new(start_x + i as f32 * spacing, y),
                        size,
                    ));
                }
            }
            Pattern::PairedGap {
                gap_height,
                margin,
                angular_speed,
                speed_jitter,
            } => {
                let max_top = (vp.y - gap_height - margin).max(margin + 1.0);
                let gap_top = rng.random_range(*margin..max_top);
                let speed = if *speed_jitter > 0.0 {
                    Some(shared_speed + rng.random_range(-*speed_jitter..=*speed_jitter))
                } else {
                    None
                };

                let mut above = Obstacle::new(Vec2::new(vp.x, gap_top - size.y), size);
                above.angular_vel = *angular_speed;
                above.speed = speed;

                let mut below = Obstacle::new(Vec2::new(vp.x, gap_top + gap_height), size);
                below.angular_vel = -*angular_speed;
                below.speed = speed;

                obstacles.push(above);
                obstacles.push(below);
            }
            Pattern::SingleRandom => {
                let max_y = (vp.y - size.y).max(1.0);
                let y = rng.random_range(0.0..max_y);
                obstacles.push(Obstacle::new(Vec2::new(vp.x, y), size));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EngineConfig, SizingMode, VariantPreset};
    use rand::SeedableRng;

    fn fixed_layout(config: &EngineConfig) -> Layout {
        Layout::resolve(config, Vec2::ZERO)
    }

    fn zigzag_config() -> EngineConfig {
        let mut config = EngineConfig::default();
        config.sizing = SizingMode::Fixed;
        config.fixed_viewport = Vec2::new(310.0, 600.0);
        config.pattern = PatternConfig::ZigZag {
            offsets: vec![80.0, 520.0],
            spacing: 110.0,
        };
        config
    }

    #[test]
    fn test_zigzag_burst_positions() {
        let config = zigzag_config();
        let layout = fixed_layout(&config);
        let spawner = Spawner::new(layout.pattern.clone(), config.max_obstacles);
        let mut obstacles = Vec::new();
        let mut rng = Pcg32::seed_from_u64(1);

        spawner.spawn(&layout, 3.0, &mut obstacles, &mut rng);

        assert_eq!(obstacles.len(), 2);
        assert_eq!(obstacles[0].pos, Vec2::new(360.0, 80.0));
        assert_eq!(obstacles[1].pos, Vec2::new(470.0, 520.0));
        // Burst members share size and the shared speed
        assert_eq!(obstacles[0].size, layout.obstacle_size);
        assert!(obstacles[0].speed.is_none());
        assert_eq!(obstacles[0].angular_vel, 0.0);
    }

    #[test]
    fn test_timer_fires_after_interval_and_resets() {
        let config = zigzag_config();
        let layout = fixed_layout(&config);
        let mut spawner = Spawner::new(layout.pattern.clone(), config.max_obstacles);
        let mut obstacles = Vec::new();
        let mut rng = Pcg32::seed_from_u64(1);

        // interval 3: ticks 1..=3 are silent, the 4th fires
        for _ in 0..3 {
            spawner.tick(3, &layout, 3.0, &mut obstacles, &mut rng);
            assert!(obstacles.is_empty());
        }
        spawner.tick(3, &layout, 3.0, &mut obstacles, &mut rng);
        assert_eq!(obstacles.len(), 2);
        assert_eq!(spawner.timer, 0);
    }

    #[test]
    fn test_population_cap_suppresses_whole_burst() {
        let config = zigzag_config();
        let layout = fixed_layout(&config);
        let mut spawner = Spawner::new(layout.pattern.clone(), 3);
        let mut rng = Pcg32::seed_from_u64(1);

        let filler = Obstacle::new(Vec2::new(500.0, 0.0), Vec2::new(10.0, 10.0));
        let mut obstacles = vec![filler; 4];

        for _ in 0..4 {
            spawner.tick(3, &layout, 3.0, &mut obstacles, &mut rng);
        }
        // Event fired, burst skipped, timer consumed
        assert_eq!(obstacles.len(), 4);
        assert_eq!(spawner.timer, 0);
    }

    #[test]
    fn test_paired_gap_geometry() {
        let config = EngineConfig::from_preset(VariantPreset::Gauntlet);
        let layout = fixed_layout(&config);
        let spawner = Spawner::new(layout.pattern.clone(), config.max_obstacles);
        let mut rng = Pcg32::seed_from_u64(99);

        for _ in 0..50 {
            let mut obstacles = Vec::new();
            spawner.spawn(&layout, 3.0, &mut obstacles, &mut rng);
            assert_eq!(obstacles.len(), 2);

            let (above, below) = (&obstacles[0], &obstacles[1]);
            // Both enter at the right edge
            assert_eq!(above.pos.x, layout.viewport.x);
            assert_eq!(below.pos.x, layout.viewport.x);
            // Exactly gap_height of corridor between the pair
            let gap = below.pos.y - (above.pos.y + above.size.y);
            assert!((gap - 180.0).abs() < 1e-3);
            // Gap placement honors the margins
            let gap_top = above.pos.y + above.size.y;
            assert!(gap_top >= 60.0);
            assert!(gap_top + 180.0 <= layout.viewport.y - 60.0 + 1e-3);
            // Opposite spins, shared per-pair speed override
            assert_eq!(above.angular_vel, -below.angular_vel);
            assert!(above.angular_vel > 0.0);
            assert_eq!(above.speed, below.speed);
            let speed = above.speed.expect("paired spawns carry an override");
            assert!((speed - 3.0).abs() <= 0.5);
        }
    }

    #[test]
    fn test_single_random_bounds() {
        let mut config = EngineConfig::default();
        config.sizing = SizingMode::Fixed;
        config.pattern = PatternConfig::SingleRandom;
        let layout = fixed_layout(&config);
        let spawner = Spawner::new(layout.pattern.clone(), config.max_obstacles);
        let mut rng = Pcg32::seed_from_u64(5);

        for _ in 0..50 {
            let mut obstacles = Vec::new();
            spawner.spawn(&layout, 3.0, &mut obstacles, &mut rng);
            assert_eq!(obstacles.len(), 1);
            let o = &obstacles[0];
            assert_eq!(o.pos.x, layout.viewport.x);
            assert!(o.pos.y >= 0.0);
            assert!(o.pos.y + o.size.y <= layout.viewport.y);
            assert!(o.speed.is_none());
        }
    }

    #[test]
    fn test_spawns_are_deterministic_per_seed() {
        let config = EngineConfig::from_preset(VariantPreset::Gauntlet);
        let layout = fixed_layout(&config);
        let spawner = Spawner::new(layout.pattern.clone(), config.max_obstacles);

        let mut a = Vec::new();
        let mut b = Vec::new();
        let mut rng_a = Pcg32::seed_from_u64(12345);
        let mut rng_b = Pcg32::seed_from_u64(12345);
        for _ in 0..10 {
            spawner.spawn(&layout, 3.0, &mut a, &mut rng_a);
            spawner.spawn(&layout, 3.0, &mut b, &mut rng_b);
        }
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.pos, y.pos);
            assert_eq!(x.speed, y.speed);
        }
    }
}
