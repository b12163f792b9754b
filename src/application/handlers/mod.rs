//! Use-case handlers.

pub mod admin;
pub mod membership;
