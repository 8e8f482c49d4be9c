//! Domain layer: entities, repository traits and the booking rules

pub mod model;
pub mod repository;
pub mod service;
