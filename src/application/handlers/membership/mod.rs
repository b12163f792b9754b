//! Customer-facing membership use cases.

mod create_membership;
mod process_order_event;
mod renew_membership;
mod validate_membership;

pub use create_membership::CreateMembershipHandler;
pub use process_order_event::{OrderOutcome, ProcessOrderEventHandler};
pub use renew_membership::{PaymentDetails, RenewMembershipHandler, RenewalOutcome};
pub use validate_membership::{ValidateMembershipHandler, ValidationResult};
