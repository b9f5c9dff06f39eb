pub mod config;
pub mod error;
pub mod motif;
pub mod pattern;
pub mod series;
pub mod stats;
