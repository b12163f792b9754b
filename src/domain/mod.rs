//! Domain layer - Business logic and entities.
//!
//! Pure domain logic with no infrastructure dependencies.
//! Organized by bounded context:
//!
//! - `foundation` - Shared primitives (IDs, timestamps, errors)
//! - `membership` - Membership lifecycle, benefits, and renewal rules

pub mod foundation;
pub mod membership;
