#![forbid(unsafe_code)]

pub mod input;
pub mod model;
pub mod text;
pub mod time;

pub use time::Clock;
