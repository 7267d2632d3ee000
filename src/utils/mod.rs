pub mod duration;
pub mod logger;
pub mod shift_time;
