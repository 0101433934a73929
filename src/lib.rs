pub mod config;
pub mod poll;
pub mod report;
pub mod stats;
pub mod table;

pub use config::WatchConfig;
pub use poll::{poll_once, run};
pub use report::Report;
