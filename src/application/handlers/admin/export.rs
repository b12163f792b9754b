//! Full-fidelity membership export for admin tooling.

use crate::domain::membership::{Membership, MembershipError};

/// Serializes memberships to pretty-printed JSON.
pub fn export_json(memberships: &[Membership]) -> Result<String, MembershipError> {
    serde_json::to_string_pretty(memberships).map_err(|e| MembershipError::store(e.to_string()))
}

/// Serializes memberships to CSV with a header row.
///
/// Fields containing commas, quotes, or newlines are quoted per RFC 4180.
pub fn export_csv(memberships: &[Membership]) -> String {
    let mut out = String::from(
        "membership_id,customer_id,status,payment_status,start_date,expiration_date,\
         annual_fee,service_discount_fraction,free_delivery,created_at\n",
    );
    for m in memberships {
        let row = [
            csv_field(m.id.as_str()),
            csv_field(m.customer_id.as_str()),
            csv_field(m.status.label()),
            csv_field(m.payment_status.label()),
            csv_field(&m.start_date.to_string()),
            csv_field(&m.expiration_date.to_string()),
            format!("{:.2}", m.benefits.annual_fee),
            format!("{}", m.benefits.service_discount_fraction),
            m.benefits.free_delivery.to_string(),
            csv_field(&m.created_at.to_string()),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{CustomerId, Timestamp};
    use crate::domain::membership::BenefitsSnapshot;

    fn membership(customer: &str) -> Membership {
        let now = Timestamp::now();
        let mut m = Membership::create(
            CustomerId::new(customer).unwrap(),
            BenefitsSnapshot::capture(0.15, true, 199.0),
            12,
            now,
        );
        m.confirm_payment(now).unwrap();
        m
    }

    #[test]
    fn csv_has_header_and_one_row_per_membership() {
        let memberships = vec![membership("cust-1"), membership("cust-2")];
        let csv = export_csv(&memberships);

        let lines: Vec<&str> = csv.trim_end().lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("membership_id,customer_id,status"));
        assert!(lines[1].contains("active"));
        assert!(lines[1].contains("199.00"));
    }

    #[test]
    fn csv_quotes_fields_with_commas() {
        let memberships = vec![membership("Smith, Sons & Co")];
        let csv = export_csv(&memberships);
        assert!(csv.contains("\"Smith, Sons & Co\""));
    }

    #[test]
    fn json_round_trips() {
        let memberships = vec![membership("cust-1")];
        let json = export_json(&memberships).unwrap();

        let parsed: Vec<Membership> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, memberships);
    }
}
