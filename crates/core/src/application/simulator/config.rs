// Simulator configuration

use super::constants::*;
use std::time::Duration;

/// Tunables for one simulator instance
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    pub connect_delay: Duration,
    pub tick_interval: Duration,
    pub approaching_turn_position: u32,
    pub wait_change_minutes: u32,
    pub event_capacity: usize,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            connect_delay: CONNECT_DELAY,
            tick_interval: TICK_INTERVAL,
            approaching_turn_position: APPROACHING_TURN_POSITION,
            wait_change_minutes: WAIT_CHANGE_THRESHOLD_MINUTES,
            event_capacity: EVENT_CHANNEL_CAPACITY,
        }
    }
}

impl SimulatorConfig {
    /// Reject values that would make the session loop spin or the channel unusable
    pub fn validate(&self) -> crate::Result<()> {
        if self.tick_interval.is_zero() {
            return Err(crate::AppError::Config(
                "tick interval must be greater than zero".to_string(),
            ));
        }
        if self.event_capacity == 0 {
            return Err(crate::AppError::Config(
                "event capacity must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_observed_timings() {
        let config = SimulatorConfig::default();
        assert_eq!(config.connect_delay, Duration::from_secs(2));
        assert_eq!(config.tick_interval, Duration::from_secs(15));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_interval_rejected() {
        let config = SimulatorConfig {
            tick_interval: Duration::ZERO,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("tick interval"));
    }
}
