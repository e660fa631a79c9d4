use serde::{Deserialize, Serialize};

/// Visual/audio theme tag of a level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Forest,
    Ice,
    Beach,
    Fire,
    Water,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Forest => "forest",
            Theme::Ice => "ice",
            Theme::Beach => "beach",
            Theme::Fire => "fire",
            Theme::Water => "water",
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
