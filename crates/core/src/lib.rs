#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod progress;
pub mod time;

pub use error::Error;
pub use progress::{next_window, ParagraphWindow, QUESTIONS_PER_ROUND};
pub use time::Clock;
