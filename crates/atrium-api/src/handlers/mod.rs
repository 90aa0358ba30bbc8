//! HTTP handlers

pub mod permissions;
pub mod providers;
pub mod search;
pub mod share;
