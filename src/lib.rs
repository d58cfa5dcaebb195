// src/lib.rs

//! examwatch: driving-exam slot watcher library

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod utils;
