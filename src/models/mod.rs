// src/models/mod.rs
pub mod credito;
pub mod estatisticas;
pub mod redacao;
pub mod tema;
pub mod usuario;
