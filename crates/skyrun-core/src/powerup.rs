use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// Trait for power-up kind enums.
pub trait PowerUpKind: Clone + Copy + PartialEq + Serialize + DeserializeOwned {
    /// Whether the effect runs out on its own. Timed kinds count down the
    /// duration the owner was configured with; untimed kinds last until
    /// stripped.
    fn is_timed(&self) -> bool;
}

/// Active power-up effect, counted down once per simulation tick.
///
/// Expiry is stored on the owner instead of being scheduled elsewhere, so
/// dropping the owner (level change, restart) drops the timer with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct ActivePowerUp<K: PowerUpKind> {
    pub kind: K,
    pub remaining_ticks: Option<u32>,
}

impl<K: PowerUpKind> ActivePowerUp<K> {
    /// Start the effect. `duration_ticks` is ignored for untimed kinds.
    pub fn new(kind: K, duration_ticks: u32) -> Self {
        Self {
            remaining_ticks: kind.is_timed().then_some(duration_ticks),
            kind,
        }
    }

    pub fn tick(&mut self) {
        if let Some(remaining) = self.remaining_ticks.as_mut() {
            *remaining = remaining.saturating_sub(1);
        }
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_ticks == Some(0)
    }

    /// Restart the countdown, e.g. when the same power-up is collected again.
    pub fn refresh(&mut self, ticks: u32) {
        self.remaining_ticks = self.kind.is_timed().then_some(ticks);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    enum TestKind {
        Short,
        Forever,
    }

    impl PowerUpKind for TestKind {
        fn is_timed(&self) -> bool {
            matches!(self, TestKind::Short)
        }
    }

    #[test]
    fn short_expires_after_duration() {
        let mut pu = ActivePowerUp::new(TestKind::Short, 3);
        pu.tick();
        pu.tick();
        assert!(!pu.is_expired());
        pu.tick();
        assert!(pu.is_expired());
        pu.tick();
        assert!(pu.is_expired(), "countdown must saturate at zero");
    }

    #[test]
    fn forever_never_expires() {
        let mut pu = ActivePowerUp::new(TestKind::Forever, 3);
        for _ in 0..10_000 {
            pu.tick();
        }
        assert!(!pu.is_expired());
    }

    #[test]
    fn refresh_restarts_countdown() {
        let mut pu = ActivePowerUp::new(TestKind::Short, 2);
        pu.tick();
        pu.refresh(5);
        assert_eq!(pu.remaining_ticks, Some(5));
    }

    #[test]
    fn untimed_kind_ignores_refresh_duration() {
        let mut pu = ActivePowerUp::new(TestKind::Forever, 2);
        assert_eq!(pu.remaining_ticks, None);
        pu.refresh(5);
        assert_eq!(pu.remaining_ticks, None);
    }
}
