pub mod config;
pub mod dilemma;
pub mod error;
pub mod telemetry;
