pub mod env;
pub mod error;
pub mod invocation;
pub mod item;
pub mod orchestrator;
pub mod runner;
