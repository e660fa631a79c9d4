/// Nominal host frame rate the tick-based constants are tuned for.
pub const NOMINAL_TICK_RATE_HZ: f32 = 60.0;

/// Convert ticks back to seconds at `tick_rate_hz`.
pub fn ticks_to_secs(ticks: u32, tick_rate_hz: f32) -> f32 {
    if tick_rate_hz > 0.0 {
        ticks as f32 / tick_rate_hz
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thirty_seconds_at_sixty_hz() {
        assert_eq!(ticks_to_secs(1800, NOMINAL_TICK_RATE_HZ), 30.0);
    }

    #[test]
    fn degenerate_inputs_are_zero() {
        assert_eq!(ticks_to_secs(10, 0.0), 0.0);
    }
}
