// src/lib.rs
//! Juice quality prediction: feature pipeline, classifiers, HTTP API and client.

pub mod api;
pub mod client;
pub mod exploration;
pub mod features;
pub mod history;
pub mod model;
pub mod prediction;
pub mod session;
pub mod utils;
