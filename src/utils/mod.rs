pub mod maths_utils;
pub mod time_utils;

pub use maths_utils::{get_max, get_min, mean};
pub use time_utils::{SECS_PER_DAY, utc_day_start, utc_hour};
