// Simulator constants (no magic values)
use std::time::Duration;

/// Time spent in `connecting` before the feed reports `connected` (2s)
pub const CONNECT_DELAY: Duration = Duration::from_millis(2000);

/// Period of the synthetic update generator (15s)
pub const TICK_INTERVAL: Duration = Duration::from_millis(15_000);

/// Position at or below which the patient is told to get ready
pub const APPROACHING_TURN_POSITION: u32 = 3;

/// Wait-time swing (minutes) that counts as a material change
pub const WAIT_CHANGE_THRESHOLD_MINUTES: u32 = 10;

/// Broadcast capacity for notifications
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Queue positions are 1-based
pub const MIN_POSITION: u32 = 1;

/// Floor for the estimated wait (minutes)
pub const MIN_WAIT_MINUTES: u32 = 10;

/// Department load bounds on the generated path (percent)
pub const LOAD_FLOOR: u32 = 30;
pub const LOAD_CEILING: u32 = 100;

/// Chance that a position_change tick actually moves the patient up
pub const POSITION_ADVANCE_PROBABILITY: f64 = 0.3;

/// Staff action deltas (minutes / percent)
pub const EMERGENCY_WAIT_PENALTY_MINUTES: u32 = 20;
pub const EMERGENCY_LOAD_INCREASE: u32 = 15;
pub const DELAY_WAIT_PENALTY_MINUTES: u32 = 15;
