//! Application constants.

/// Channel buffer size for scan messages.
pub const SCAN_CHANNEL_SIZE: usize = 100;

/// Event loop tick interval in milliseconds.
pub const TICK_INTERVAL_MS: u64 = 50;
