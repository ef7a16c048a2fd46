//! Domain layer - health store capability trait and summary services

pub mod repository;
pub mod service;

pub use repository::HealthStore;
