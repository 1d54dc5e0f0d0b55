// src/ui/mod.rs
pub mod chat;
pub mod results;
pub mod upload;
