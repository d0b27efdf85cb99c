//! Startup idea simulator: result contract, mock generator, remote
//! client and the view-state controllers that sit between them and a
//! rendering surface.

pub mod adapter;
pub mod backend;
pub mod client;
pub mod config;
pub mod contract;
pub mod dashboard;
pub mod error;
pub mod generator;
pub mod history;
pub mod report;
pub mod rng;
pub mod summary;
pub mod types;
