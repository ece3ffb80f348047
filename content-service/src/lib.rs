//! content-service: generates social content with a chat-completion provider
//! and screens it with a moderation provider before returning it.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
