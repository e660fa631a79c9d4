use serde::{Deserialize, Serialize};

/// Playable characters. Purely cosmetic: the renderer dispatches on this
/// enum, the simulation only carries it through the snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacterKind {
    #[default]
    Sonic,
    Mario,
    Knuckles,
    CaptainBarnacles,
    Kwazii,
    Ninjago,
    Spongebob,
    Blippi,
}

impl CharacterKind {
    pub const ALL: [CharacterKind; 8] = [
        CharacterKind::Sonic,
        CharacterKind::Mario,
        CharacterKind::Knuckles,
        CharacterKind::CaptainBarnacles,
        CharacterKind::Kwazii,
        CharacterKind::Ninjago,
        CharacterKind::Spongebob,
        CharacterKind::Blippi,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            CharacterKind::Sonic => "Sonic",
            CharacterKind::Mario => "Mario",
            CharacterKind::Knuckles => "Knuckles",
            CharacterKind::CaptainBarnacles => "Captain Barnacles",
            CharacterKind::Kwazii => "Kwazii",
            CharacterKind::Ninjago => "Ninjago",
            CharacterKind::Spongebob => "SpongeBob",
            CharacterKind::Blippi => "Blippi",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CharacterKind::Sonic => "The fast blue hedgehog",
            CharacterKind::Mario => "The mustached plumber",
            CharacterKind::Knuckles => "Guardian of the emeralds",
            CharacterKind::CaptainBarnacles => "The polar bear captain",
            CharacterKind::Kwazii => "The orange pirate cat",
            CharacterKind::Ninjago => "The green ninja",
            CharacterKind::Spongebob => "The square sponge",
            CharacterKind::Blippi => "The colorful educator",
        }
    }

    /// Primary body colour as a CSS hex string.
    pub fn color(&self) -> &'static str {
        match self {
            CharacterKind::Sonic => "#00BFFF",
            CharacterKind::Mario => "#FF0000",
            CharacterKind::Knuckles => "#8B0000",
            CharacterKind::CaptainBarnacles => "#FFFFFF",
            CharacterKind::Kwazii => "#FF8C00",
            CharacterKind::Ninjago => "#32CD32",
            CharacterKind::Spongebob => "#FFFF00",
            CharacterKind::Blippi => "#FF8C00",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_character_has_metadata() {
        for c in CharacterKind::ALL {
            assert!(!c.display_name().is_empty());
            assert!(!c.description().is_empty());
            assert!(c.color().starts_with('#') && c.color().len() == 7);
        }
    }

    #[test]
    fn config_names_are_snake_case() {
        let c: CharacterKind = serde_json::from_str("\"captain_barnacles\"").unwrap();
        assert_eq!(c, CharacterKind::CaptainBarnacles);
    }
}
