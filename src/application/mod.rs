//! Application layer - use-case handlers and lifecycle orchestration.
//!
//! Handlers coordinate domain logic with the ports; they own no business
//! rules themselves beyond sequencing, idempotency, and error mapping.

pub mod handlers;
pub mod lifecycle;
