pub mod time;

pub use time::{format_wait, next_fire_time};
