//! Application service layer - config, metric cache, deadlines, scan pipeline, export

pub mod cache;
pub mod config;
pub mod deadline;
pub mod export;
pub mod repository;
pub mod scanner;
pub mod service;
