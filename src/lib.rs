//! Product catalog API: validation, filtering, pagination and partial-update
//! semantics for a product store, plus seeded mock product generation.

pub mod catalog;
pub mod config;
pub mod db;
pub mod dto;
pub mod entity;
pub mod error;
pub mod middleware;
pub mod models;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
