pub mod contract;
pub mod error;
pub mod math;
pub mod schedule;
pub mod state;
mod utils;
