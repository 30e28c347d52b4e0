use std::time::Duration;

/// Long enough for a spawned thread to reach its blocking point.
pub const BLOCK_DELAY: Duration = Duration::from_millis(100);
pub const ITEMS_MEDIUM: usize = 200;
pub const ITEMS_HIGH: usize = 1000;
