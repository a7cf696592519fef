pub mod catalog;
pub mod config;
pub mod error;
pub mod intent;
pub mod kernel;
pub mod outputs;
pub mod planner;
pub mod services;

pub use kernel::reactor::Reactor;
