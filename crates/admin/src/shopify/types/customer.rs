//! Customer domain types for the Shopify Admin API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shopdesk_core::{CustomerId, UpdateFailure};

// =============================================================================
// Customer Types
// =============================================================================

/// A customer row in the admin list.
///
/// `phone` is the only field the admin edits; everything else is read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRecord {
    /// Shopify global ID.
    pub id: CustomerId,
    /// First name.
    pub first_name: Option<String>,
    /// Last name.
    pub last_name: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Phone number (E.164 when set through Shopify).
    pub phone: Option<String>,
    /// When the customer was created.
    pub created_at: DateTime<Utc>,
    /// When the customer was last updated.
    pub updated_at: DateTime<Utc>,
    /// Number of orders placed.
    pub number_of_orders: u64,
}

impl CustomerRecord {
    /// First and last name joined by a space, skipping missing parts.
    #[must_use]
    pub fn display_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Merge the fields echoed by a phone update.
    pub fn apply(&mut self, update: &CustomerPhoneUpdated) {
        if self.id == update.id {
            self.phone.clone_from(&update.phone);
        }
    }
}

// =============================================================================
// Update Types
// =============================================================================

/// Request to change a customer's phone number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerPhoneUpdate {
    /// Customer to update.
    pub customer_id: CustomerId,
    /// New phone number; empty clears it.
    pub phone: String,
}

impl CustomerPhoneUpdate {
    /// Build an update from untrusted form input.
    ///
    /// # Errors
    ///
    /// Returns a validation failure if the customer ID is malformed.
    pub fn parse(customer_id: &str, phone: &str) -> Result<Self, UpdateFailure> {
        let customer_id = CustomerId::parse(customer_id)
            .map_err(|e| UpdateFailure::validation(format!("Invalid customer id: {e}")))?;
        Ok(Self {
            customer_id,
            phone: phone.trim().to_string(),
        })
    }
}

/// Fields echoed back by a successful phone update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerPhoneUpdated {
    /// Updated customer.
    pub id: CustomerId,
    /// Phone number now stored by Shopify.
    pub phone: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use shopdesk_core::FailureKind;

    fn record() -> CustomerRecord {
        CustomerRecord {
            id: CustomerId::parse("1").unwrap(),
            first_name: Some("Ada".to_string()),
            last_name: None,
            email: Some("ada@example.com".to_string()),
            phone: None,
            created_at: DateTime::<Utc>::UNIX_EPOCH,
            updated_at: DateTime::<Utc>::UNIX_EPOCH,
            number_of_orders: 0,
        }
    }

    #[test]
    fn test_display_name_skips_missing_parts() {
        let mut customer = record();
        assert_eq!(customer.display_name(), "Ada");

        customer.last_name = Some("Lovelace".to_string());
        assert_eq!(customer.display_name(), "Ada Lovelace");

        customer.first_name = None;
        customer.last_name = None;
        assert_eq!(customer.display_name(), "");
    }

    #[test]
    fn test_apply_merges_matching_customer_only() {
        let mut customer = record();
        customer.apply(&CustomerPhoneUpdated {
            id: CustomerId::parse("2").unwrap(),
            phone: Some("+15550000000".to_string()),
        });
        assert_eq!(customer.phone, None);

        customer.apply(&CustomerPhoneUpdated {
            id: CustomerId::parse("1").unwrap(),
            phone: Some("+1234567890".to_string()),
        });
        assert_eq!(customer.phone.as_deref(), Some("+1234567890"));
    }

    #[test]
    fn test_parse_update_rejects_bad_id() {
        let failure = CustomerPhoneUpdate::parse("gid://shopify/Product/1", "+1").unwrap_err();
        assert_eq!(failure.kind, FailureKind::Validation);

        let update = CustomerPhoneUpdate::parse("gid://shopify/Customer/1", " +1234567890 ").unwrap();
        assert_eq!(update.phone, "+1234567890");
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let json = serde_json::to_value(record()).unwrap();
        assert_eq!(json["id"], "gid://shopify/Customer/1");
        assert_eq!(json["firstName"], "Ada");
        assert_eq!(json["numberOfOrders"], 0);
    }
}
