//! Worker-node core for the satgrid batch harness: control-channel protocol,
//! solver job runner, report parsing, and ordered result emission.

pub mod config;
pub mod emit;
pub mod error;
pub mod protocol;
pub mod runner;
pub mod worker;

pub use error::WorkerError;
pub use worker::Worker;
