//! Built-in tools that need no external service.

mod time;

pub use time::{CurrentTimeTool, DEFAULT_TIME_FORMAT, format_time};
