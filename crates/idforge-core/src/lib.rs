/// Lazily compiled, process-wide regex.
macro_rules! regex {
    ($re:expr $(,)?) => {{
        static RE: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
        RE.get_or_init(|| regex::Regex::new($re).unwrap())
    }};
}

pub mod activity;
pub mod classifier;
pub mod config;
pub mod draft;
pub mod error;
pub mod format;
pub mod io;
pub mod paths;
pub mod persona;
pub mod rules;
pub mod session;
pub mod types;
pub mod workflow;

pub use error::{IdError, Result};
