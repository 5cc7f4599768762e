//! Engine configuration and variant presets
//!
//! Persisted separately from run state in LocalStorage.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Variant presets resolving the classic family of rule sets into one engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum VariantPreset {
    /// Viewport-adaptive sizing with zig-zag bursts
    #[default]
    Classic,
    /// Fixed sizing with rotating paired-gap corridors
    Gauntlet,
    /// Fixed sizing with single random obstacles
    Scatter,
}

impl VariantPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            VariantPreset::Classic => "Classic",
            VariantPreset::Gauntlet => "Gauntlet",
            VariantPreset::Scatter => "Scatter",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" => Some(VariantPreset::Classic),
            "gauntlet" => Some(VariantPreset::Gauntlet),
            "scatter" => Some(VariantPreset::Scatter),
            _ => None,
        }
    }
}

/// How entity sizes, speeds and pattern offsets are derived at reset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SizingMode {
    /// Derive from the current viewport at reset time
    #[default]
    Adaptive,
    /// Use the literal constants carried by the config
    Fixed,
}

/// Spawn pattern family and its tuning
///
/// Zig-zag offsets and spacing are viewport fractions under `Adaptive`
/// sizing and literal world units under `Fixed`. Paired-gap and
/// single-random parameters are always world units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PatternConfig {
    /// Burst of obstacles along a fixed vertical sequence
    ZigZag {
        /// Vertical positions, one obstacle per entry
        offsets: Vec<f32>,
        /// Horizontal distance between burst members
        spacing: f32,
    },
    /// Two obstacles bracketing a vertical corridor
    PairedGap {
        /// Corridor height between the pair
        gap_height: f32,
        /// Margin kept clear at the top and bottom when placing the gap
        margin: f32,
        /// Magnitude of the cosmetic spin, radians per tick (one member
        /// spins positive, the other negative)
        angular_speed: f32,
        /// Uniform per-pair speed override range around the shared speed
        speed_jitter: f32,
    },
    /// One obstacle at a uniformly random height
    SingleRandom,
}

/// Engine configuration, consumed at reset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    // === Physics ===
    /// Downward acceleration per tick
    pub gravity: f32,
    /// Velocity set by an activate impulse while running
    pub jump_power: f32,
    /// Upward-speed ceiling; the impulse only applies while velocity > this
    pub max_up_speed: f32,

    // === Spawning ===
    pub pattern: PatternConfig,
    /// Base ticks between spawn events (ratchets down with difficulty)
    pub spawn_interval: u32,
    /// Live-obstacle population cap
    pub max_obstacles: usize,

    // === Sizing ===
    pub sizing: SizingMode,
    /// World size when sizing is `Fixed`
    pub fixed_viewport: Vec2,
    pub fixed_player_size: Vec2,
    pub fixed_obstacle_size: Vec2,
    /// Shared obstacle speed when sizing is `Fixed` (world units per tick)
    pub fixed_obstacle_speed: f32,

    // === Difficulty ratchet ===
    /// Score multiple at which the ratchet fires
    pub milestone: u64,
    /// Speed gain per milestone
    pub speed_step: f32,
    /// Spawn interval reduction per milestone (ticks)
    pub interval_step: u32,
    /// Spawn interval never drops below this
    pub interval_floor: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            jump_power: JUMP_POWER,
            max_up_speed: MAX_UP_SPEED,

            pattern: PatternConfig::ZigZag {
                offsets: vec![0.15, 0.75, 0.25, 0.65, 0.35, 0.55, 0.45],
                spacing: 0.35,
            },
            spawn_interval: SPAWN_INTERVAL,
            max_obstacles: MAX_OBSTACLES,

            sizing: SizingMode::Adaptive,
            fixed_viewport: Vec2::new(FIXED_VIEWPORT_W, FIXED_VIEWPORT_H),
            fixed_player_size: Vec2::new(FIXED_PLAYER_W, FIXED_PLAYER_H),
            fixed_obstacle_size: Vec2::new(FIXED_OBSTACLE_W, FIXED_OBSTACLE_H),
            fixed_obstacle_speed: FIXED_OBSTACLE_SPEED,

            milestone: SCORE_MILESTONE,
            speed_step: SPEED_STEP,
            interval_step: SPAWN_INTERVAL_STEP,
            interval_floor: SPAWN_INTERVAL_FLOOR,
        }
    }
}

impl EngineConfig {
    /// Create a config from a variant preset
    pub fn from_preset(preset: VariantPreset) -> Self {
        let mut config = Self::default();
        config.apply_preset(preset);
        config
    }

    /// Apply a variant preset (overwrites sizing, pattern and spawn timing)
    pub fn apply_preset(&mut self, preset: VariantPreset) {
        match preset {
            VariantPreset::Classic => {
                self.sizing = SizingMode::Adaptive;
                self.pattern = PatternConfig::ZigZag {
                    offsets: vec![0.15, 0.75, 0.25, 0.65, 0.35, 0.55, 0.45],
                    spacing: 0.35,
                };
                self.spawn_interval = SPAWN_INTERVAL;
            }
            VariantPreset::Gauntlet => {
                self.sizing = SizingMode::Fixed;
                self.pattern = PatternConfig::PairedGap {
                    gap_height: 180.0,
                    margin: 60.0,
                    angular_speed: 0.02,
                    speed_jitter: 0.5,
                };
                self.spawn_interval = 150;
            }
            VariantPreset::Scatter => {
                self.sizing = SizingMode::Fixed;
                self.pattern = PatternConfig::SingleRandom;
                self.spawn_interval = SPAWN_INTERVAL;
            }
        }
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "sky_dash_config";

    /// Load config from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(config) = serde_json::from_str(&json) {
                    log::info!("Loaded config from LocalStorage");
                    return config;
                }
            }
        }

        log::info!("Using default config");
        Self::default()
    }

    /// Save config to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Config saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_classic() {
        let default = EngineConfig::default();
        let classic = EngineConfig::from_preset(VariantPreset::Classic);
        assert_eq!(default, classic);
        assert_eq!(default.sizing, SizingMode::Adaptive);
        assert_eq!(default.spawn_interval, 120);
        assert_eq!(default.milestone, 300);
        assert_eq!(default.interval_floor, 110);
    }

    #[test]
    fn test_gauntlet_preset() {
        let config = EngineConfig::from_preset(VariantPreset::Gauntlet);
        assert_eq!(config.sizing, SizingMode::Fixed);
        assert!(matches!(
            config.pattern,
            PatternConfig::PairedGap { gap_height, .. } if gap_height == 180.0
        ));
    }

    #[test]
    fn test_preset_roundtrip() {
        for preset in [
            VariantPreset::Classic,
            VariantPreset::Gauntlet,
            VariantPreset::Scatter,
        ] {
            assert_eq!(VariantPreset::from_str(preset.as_str()), Some(preset));
        }
        assert_eq!(VariantPreset::from_str("bogus"), None);
    }
}
