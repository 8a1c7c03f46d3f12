//! Rule constants shared across the crate

/// Number of stats on a unit
pub const NUM_STATS: usize = 8;

/// Growth bonus granted to the avatar's boon stat (and removed from the bane)
pub const TRAIT_BONUS: i32 = 15;

/// Highest level an interval may reach unless overridden by options
pub const DEFAULT_MAX_LEVEL: u32 = 40;

/// Extra room above the tallest growth bar
pub const CHART_HEADROOM: i32 = 30;

/// Saved projections kept per session unless overridden by options
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Cap used for classes missing from the caps table
pub const UNCAPPED: i32 = i32::MAX;
