pub mod action;
pub mod cards;
pub mod cli;
pub mod config;
pub mod display;
pub mod engine;
pub mod error;
pub mod play;
pub mod profile;
pub mod quiz;
pub mod sampler;
pub mod spots;
pub mod stats;
pub mod store;
pub mod tables;
