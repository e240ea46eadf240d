// src/services/mod.rs
pub mod auth_service;
pub mod redacao_service;
pub mod tema_service;
pub mod user_service;
