pub mod config;
pub mod planner;
pub mod store;
pub mod task;

pub use config::*;
pub use planner::*;
pub use store::*;
pub use task::*;
