//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::ValidationError;

/// Unique identifier for a membership.
///
/// Generated once at creation time as `mem_<unix-millis>_<8-hex>` and
/// immutable afterwards. The timestamp component makes identifiers roughly
/// sortable by creation time; the random suffix guards against collisions
/// within the same millisecond.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MembershipId(String);

impl MembershipId {
    /// Generates a new membership identifier.
    pub fn generate(created_at: &super::Timestamp) -> Self {
        let millis = created_at.as_datetime().timestamp_millis();
        let suffix = Uuid::new_v4().simple().to_string();
        Self(format!("mem_{}_{}", millis, &suffix[..8]))
    }

    /// Wraps an existing identifier, rejecting empty input.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ValidationError::empty_field("membership_id"));
        }
        Ok(Self(id))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MembershipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Customer identifier (reference into the external customer store).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(String);

impl CustomerId {
    /// Creates a new CustomerId, returning error if empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ValidationError::empty_field("customer_id"));
        }
        Ok(Self(id))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a lifecycle audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
    /// Creates a new random EventId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timestamp;

    #[test]
    fn membership_id_generates_unique_values() {
        let now = Timestamp::now();
        let id1 = MembershipId::generate(&now);
        let id2 = MembershipId::generate(&now);
        assert_ne!(id1, id2);
    }

    #[test]
    fn membership_id_has_expected_format() {
        let now = Timestamp::now();
        let id = MembershipId::generate(&now);
        let parts: Vec<&str> = id.as_str().splitn(3, '_').collect();

        assert_eq!(parts[0], "mem");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 8);
    }

    #[test]
    fn membership_id_rejects_empty_string() {
        assert!(MembershipId::new("").is_err());
    }

    #[test]
    fn customer_id_accepts_non_empty_string() {
        let id = CustomerId::new("cust-123").unwrap();
        assert_eq!(id.as_str(), "cust-123");
    }

    #[test]
    fn customer_id_rejects_empty_string() {
        let result = CustomerId::new("");
        assert!(result.is_err());
        match result {
            Err(ValidationError::EmptyField { field }) => assert_eq!(field, "customer_id"),
            _ => panic!("Expected EmptyField error"),
        }
    }

    #[test]
    fn customer_id_displays_correctly() {
        let id = CustomerId::new("cust-456").unwrap();
        assert_eq!(format!("{}", id), "cust-456");
    }

    #[test]
    fn event_id_generates_unique_values() {
        assert_ne!(EventId::new(), EventId::new());
    }

    #[test]
    fn membership_id_serializes_transparently() {
        let id = MembershipId::new("mem_1_abcdefgh").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"mem_1_abcdefgh\"");
    }
}
