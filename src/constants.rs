// Classic 75-ball defaults
pub const DEFAULT_BOARD_SIZE: usize = 5;
pub const DEFAULT_BOARD_COUNT: usize = 2;
pub const DEFAULT_MIN_NUM: i32 = 1;
pub const DEFAULT_MAX_NUM: i32 = 75;

// Simulation limits
pub const DEFAULT_TOTAL_GAMES: u32 = 1000;
pub const MAX_TOTAL_GAMES: u32 = 100_000;
pub const DEFAULT_PROGRESS_INTERVAL: u32 = 100;

// Board and range sanity limits
pub const MAX_BOARD_SIZE: usize = 15;
pub const MAX_BOARD_COUNT: usize = 100;
pub const MAX_RANGE_SIZE: usize = 10_000;

// Board generation: resample budget is this multiple of the number range
pub const RESAMPLE_BUDGET_FACTOR: usize = 2;

// Live display
pub const DEFAULT_DISPLAY_SCALE: u32 = 100;
pub const MIN_DISPLAY_SCALE: u32 = 50;
pub const MAX_DISPLAY_SCALE: u32 = 200;
pub const DEFAULT_PORT: u16 = 3000;
