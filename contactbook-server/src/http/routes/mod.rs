//! Route handlers organized by resource

pub mod health;
pub mod auth;
pub mod contacts;
pub mod notes;
pub mod tags;
pub mod users;
