//! HTTP handlers, one module per resource.

pub mod assistant;
pub mod auth;
pub mod dashboard;
pub mod dirigentes;
pub mod vehicles;
pub mod voters;
