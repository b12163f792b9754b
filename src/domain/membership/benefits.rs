//! Benefit terms captured on a membership.
//!
//! # Design Decisions
//!
//! - **Snapshot, not live config**: benefits are captured from configuration
//!   at creation/renewal time and read back from the membership afterwards.
//!   A config change never alters the terms of a running cycle.
//! - **Fixed service set**: discount eligibility is limited to the four
//!   canonical service categories; unknown service ids simply get no
//!   discount, they are not an error.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Service categories eligible for the membership discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceCategory {
    Mot,
    Servicing,
    Repairs,
    Diagnostics,
}

static DISPLAY_NAMES: Lazy<HashMap<ServiceCategory, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (ServiceCategory::Mot, "MOT Test"),
        (ServiceCategory::Servicing, "Vehicle Servicing"),
        (ServiceCategory::Repairs, "Repairs"),
        (ServiceCategory::Diagnostics, "Diagnostics"),
    ])
});

impl ServiceCategory {
    /// All eligible service categories.
    pub const ALL: [ServiceCategory; 4] = [
        ServiceCategory::Mot,
        ServiceCategory::Servicing,
        ServiceCategory::Repairs,
        ServiceCategory::Diagnostics,
    ];

    /// Canonical service identifier used by the storefront.
    pub fn id(&self) -> &'static str {
        match self {
            ServiceCategory::Mot => "mot",
            ServiceCategory::Servicing => "servicing",
            ServiceCategory::Repairs => "repairs",
            ServiceCategory::Diagnostics => "diagnostics",
        }
    }

    /// Human-readable display name.
    pub fn display_name(&self) -> &'static str {
        DISPLAY_NAMES[self]
    }

    /// Parses a storefront service identifier, case-insensitively.
    ///
    /// Returns `None` for anything outside the fixed eligible set.
    pub fn from_id(id: &str) -> Option<Self> {
        match id.to_ascii_lowercase().as_str() {
            "mot" => Some(ServiceCategory::Mot),
            "servicing" => Some(ServiceCategory::Servicing),
            "repairs" => Some(ServiceCategory::Repairs),
            "diagnostics" => Some(ServiceCategory::Diagnostics),
            _ => None,
        }
    }
}

/// Benefit terms snapshotted onto a membership at creation/renewal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenefitsSnapshot {
    /// Flat discount applied to eligible services, as a fraction (0.15 = 15%).
    pub service_discount_fraction: f64,

    /// Whether delivery fees are waived for this member.
    pub free_delivery: bool,

    /// Services this membership's discount applies to.
    pub eligible_services: Vec<ServiceCategory>,

    /// Annual fee in effect when this snapshot was taken.
    pub annual_fee: f64,
}

impl BenefitsSnapshot {
    /// Captures a snapshot of the given terms over the full service set.
    pub fn capture(service_discount_fraction: f64, free_delivery: bool, annual_fee: f64) -> Self {
        Self {
            service_discount_fraction,
            free_delivery,
            eligible_services: ServiceCategory::ALL.to_vec(),
            annual_fee,
        }
    }

    /// Whether the given service is covered by this snapshot.
    pub fn covers(&self, service: ServiceCategory) -> bool {
        self.eligible_services.contains(&service)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_id_parses_canonical_ids() {
        assert_eq!(ServiceCategory::from_id("mot"), Some(ServiceCategory::Mot));
        assert_eq!(
            ServiceCategory::from_id("servicing"),
            Some(ServiceCategory::Servicing)
        );
        assert_eq!(
            ServiceCategory::from_id("repairs"),
            Some(ServiceCategory::Repairs)
        );
        assert_eq!(
            ServiceCategory::from_id("diagnostics"),
            Some(ServiceCategory::Diagnostics)
        );
    }

    #[test]
    fn from_id_is_case_insensitive() {
        assert_eq!(ServiceCategory::from_id("MOT"), Some(ServiceCategory::Mot));
        assert_eq!(
            ServiceCategory::from_id("Servicing"),
            Some(ServiceCategory::Servicing)
        );
    }

    #[test]
    fn from_id_rejects_unknown_services() {
        assert_eq!(ServiceCategory::from_id("tyres"), None);
        assert_eq!(ServiceCategory::from_id(""), None);
    }

    #[test]
    fn display_names_cover_all_categories() {
        for category in ServiceCategory::ALL {
            assert!(!category.display_name().is_empty());
        }
    }

    #[test]
    fn capture_includes_full_service_set() {
        let snapshot = BenefitsSnapshot::capture(0.15, true, 199.0);
        assert_eq!(snapshot.eligible_services.len(), 4);
        assert!(snapshot.covers(ServiceCategory::Mot));
        assert!(snapshot.covers(ServiceCategory::Diagnostics));
    }

    #[test]
    fn capture_preserves_terms() {
        let snapshot = BenefitsSnapshot::capture(0.2, false, 249.0);
        assert_eq!(snapshot.service_discount_fraction, 0.2);
        assert!(!snapshot.free_delivery);
        assert_eq!(snapshot.annual_fee, 249.0);
    }
}
