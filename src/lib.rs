pub mod config;
pub mod config_processors;
pub mod error;
pub mod evaluation;
pub mod io;
pub mod knn;
pub mod metrics;
pub mod stopwatch;
