pub mod analyzer;
pub mod config;
pub mod delivery;
pub mod market;
pub mod model;
pub mod normalizer;
pub mod parser;
pub mod queue;
pub mod utils;
pub mod worker;
