//! Pure time helpers shared by the throttle enforcer and schedulers:
//! UTC day boundaries and minute-window expiry (§4.1, §8 properties 1 and 5).

pub mod window;

pub use window::{minute_window_expired, start_of_utc_day, start_of_utc_today};
