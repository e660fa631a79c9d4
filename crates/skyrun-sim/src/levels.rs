use serde::{Deserialize, Serialize};

use skyrun_core::theme::Theme;

/// Difficulty profile and palette for one level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelProfile {
    pub name: String,
    pub theme: Theme,
    /// Scales the vertical spread of the generated platforms.
    pub difficulty: f32,
    /// Per-segment probability of spawning a hostile.
    pub enemy_density: f32,
    /// Per-segment probability of spawning a pickup.
    pub collectible_density: f32,
    pub sky_color: String,
    pub ground_color: String,
    pub platform_color: String,
    pub decoration_color: String,
}

impl Default for LevelProfile {
    fn default() -> Self {
        Self {
            name: "Unnamed".to_string(),
            theme: Theme::Forest,
            difficulty: 1.0,
            enemy_density: 0.1,
            collectible_density: 0.6,
            sky_color: "#87CEEB".to_string(),
            ground_color: "#228B22".to_string(),
            platform_color: "#8B4513".to_string(),
            decoration_color: "#32CD32".to_string(),
        }
    }
}

fn profile(
    name: &str,
    theme: Theme,
    difficulty: f32,
    enemy_density: f32,
    collectible_density: f32,
    colors: [&str; 4],
) -> LevelProfile {
    let [sky, ground, platform, decoration] = colors;
    LevelProfile {
        name: name.to_string(),
        theme,
        difficulty,
        enemy_density,
        collectible_density,
        sky_color: sky.to_string(),
        ground_color: ground.to_string(),
        platform_color: platform.to_string(),
        decoration_color: decoration.to_string(),
    }
}

/// The built-in five-level campaign, easiest first.
pub fn default_levels() -> Vec<LevelProfile> {
    vec![
        profile(
            "Enchanted Forest",
            Theme::Forest,
            1.0,
            0.1,
            0.6,
            ["#87CEEB", "#228B22", "#8B4513", "#32CD32"],
        ),
        profile(
            "Frozen Glacier",
            Theme::Ice,
            1.5,
            0.15,
            0.5,
            ["#B0E0E6", "#F0F8FF", "#E6F3FF", "#87CEEB"],
        ),
        profile(
            "Tropical Beach",
            Theme::Beach,
            2.0,
            0.2,
            0.4,
            ["#87CEEB", "#F4A460", "#DEB887", "#FFD700"],
        ),
        profile(
            "Volcano",
            Theme::Fire,
            2.5,
            0.25,
            0.3,
            ["#FF4500", "#8B0000", "#A0522D", "#FF6347"],
        ),
        profile(
            "Deep Ocean",
            Theme::Water,
            3.0,
            0.3,
            0.2,
            ["#191970", "#000080", "#4682B4", "#00CED1"],
        ),
    ]
}

/// Clamp a 1-based level index into `[1, max_level]`.
pub fn clamp_level(level: u32, max_level: u32) -> u32 {
    let max_level = max_level.max(1);
    if level == 0 || level > max_level {
        tracing::warn!(level, max_level, "Level index out of range, clamping");
    }
    level.clamp(1, max_level)
}

/// Profile for a 1-based level index. Indices past the table resolve to the
/// last configured level instead of failing.
pub fn profile_for(levels: &[LevelProfile], level: u32) -> LevelProfile {
    if levels.is_empty() {
        tracing::warn!(level, "Empty level table, using built-in profile");
        return LevelProfile::default();
    }
    let idx = clamp_level(level, levels.len() as u32) as usize - 1;
    levels[idx].clone()
}
