// Core moderation module - the deterministic allow/deny rule table.

pub mod moderation_models;
pub mod moderation_service;

pub use moderation_models::*;
pub use moderation_service::*;
