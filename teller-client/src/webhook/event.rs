//! Teller webhook event types.
//!
//! Every payload field is optional. Which ones are present depends on what
//! Teller sent, never on the event type:
//!
//! | type | payload fields |
//! |------|----------------|
//! | `enrollment.disconnected` | `enrollment_id`, `reason` |
//! | `transactions.processed` | `account_id`, `transactions` |
//! | `account.number_verification.processed` | `account_id`, `status` |
//! | `webhook.test` | none |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::Transaction;
use crate::error::WebhookError;

open_enum! {
    /// Kind of webhook event.
    pub enum WebhookEventType {
        EnrollmentDisconnected => "enrollment.disconnected",
        TransactionsProcessed => "transactions.processed",
        AccountNumberVerificationProcessed => "account.number_verification.processed",
        WebhookTest => "webhook.test",
    }
}

open_enum! {
    /// Why an enrollment was disconnected.
    pub enum DisconnectReason {
        Disconnected => "disconnected",
        AccountLocked => "disconnected.account_locked",
        CredentialsInvalid => "disconnected.credentials_invalid",
        EnrollmentInactive => "disconnected.enrollment_inactive",
        CaptchaRequired => "disconnected.user_action.captcha_required",
        ContactInformationRequired => "disconnected.user_action.contact_information_required",
        InsufficientPermissions => "disconnected.user_action.insufficient_permissions",
        MfaRequired => "disconnected.user_action.mfa_required",
        WebLoginRequired => "disconnected.user_action.web_login_required",
    }
}

impl DisconnectReason {
    /// Whether the user has to act in the Teller Connect flow to reconnect.
    pub fn requires_user_action(&self) -> bool {
        self.as_str().starts_with("disconnected.user_action.")
    }
}

open_enum! {
    /// Outcome of an account number verification.
    pub enum VerificationStatus {
        Completed => "completed",
        Expired => "expired",
    }
}

/// Payload of a webhook event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebhookPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrollment_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<DisconnectReason>,
    /// Transaction records, passed through as Teller sent them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transactions: Option<Vec<Transaction>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<VerificationStatus>,
}

impl WebhookPayload {
    /// True when Teller sent no known payload fields.
    pub fn is_empty(&self) -> bool {
        self == &WebhookPayload::default()
    }
}

/// A verified Teller webhook event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: WebhookEventType,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub payload: WebhookPayload,
}

/// Decode a webhook body into an event.
///
/// Only call this on a body whose signature has already been verified.
/// Unknown fields are ignored.
pub fn decode_event(body: &[u8]) -> Result<WebhookEvent, WebhookError> {
    Ok(serde_json::from_slice(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_test_event() {
        let body = br#"{"id":"evt_1","type":"webhook.test","timestamp":"2024-01-01T00:00:00Z","payload":{}}"#;
        let event = decode_event(body).unwrap();

        assert_eq!(event.id, "evt_1");
        assert_eq!(event.event_type, WebhookEventType::WebhookTest);
        assert_eq!(event.timestamp.to_rfc3339(), "2024-01-01T00:00:00+00:00");
        assert!(event.payload.is_empty());
    }

    #[test]
    fn test_decode_enrollment_disconnected() {
        let body = br#"{
            "id": "wh_oiu8k5ab0hcvlpvhsm000",
            "type": "enrollment.disconnected",
            "timestamp": "2023-07-10T03:49:29Z",
            "payload": {
                "enrollment_id": "enr_oiin624rqaojse22oe000",
                "reason": "disconnected.user_action.mfa_required"
            }
        }"#;
        let event = decode_event(body).unwrap();

        assert_eq!(event.event_type, WebhookEventType::EnrollmentDisconnected);
        assert_eq!(
            event.payload.enrollment_id.as_deref(),
            Some("enr_oiin624rqaojse22oe000")
        );
        let reason = event.payload.reason.unwrap();
        assert_eq!(reason, DisconnectReason::MfaRequired);
        assert!(reason.requires_user_action());
        assert!(event.payload.transactions.is_none());
    }

    #[test]
    fn test_decode_transactions_processed() {
        let body = br#"{
            "id": "wh_1",
            "type": "transactions.processed",
            "timestamp": "2023-07-10T03:49:29Z",
            "payload": {
                "account_id": "acc_1",
                "transactions": [{
                    "account_id": "acc_1",
                    "amount": "-84.63",
                    "date": "2023-07-09",
                    "description": "Coffee",
                    "details": {
                        "processing_status": "complete",
                        "category": "dining",
                        "counterparty": {"name": "CAFE", "type": "organization"}
                    },
                    "status": "posted",
                    "id": "txn_1",
                    "links": {"self": "https://api.teller.io/x", "account": "https://api.teller.io/y"},
                    "running_balance": null,
                    "type": "card_payment"
                }]
            }
        }"#;
        let event = decode_event(body).unwrap();

        assert_eq!(event.event_type, WebhookEventType::TransactionsProcessed);
        assert_eq!(event.payload.account_id.as_deref(), Some("acc_1"));
        let transactions = event.payload.transactions.unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].amount, "-84.63");
        assert_eq!(transactions[0].running_balance, None);
    }

    #[test]
    fn test_decode_transactions_processed_with_null_fields() {
        let body = br#"{
            "id": "wh_1",
            "type": "transactions.processed",
            "timestamp": "2023-07-10T03:49:29Z",
            "payload": {
                "transactions": [{
                    "id": "txn_1",
                    "amount": "-84.63",
                    "description": null,
                    "details": null,
                    "links": {"self": null, "account": "https://api.teller.io/y"},
                    "type": null
                }]
            }
        }"#;
        let event = decode_event(body).unwrap();

        let transactions = event.payload.transactions.unwrap();
        assert_eq!(transactions[0].id, "txn_1");
        assert_eq!(transactions[0].description, "");
        assert_eq!(transactions[0].details.processing_status, "");
        assert_eq!(transactions[0].details.counterparty, None);
        assert_eq!(transactions[0].links.self_link, "");
        assert_eq!(transactions[0].transaction_type, "");
    }

    #[test]
    fn test_decode_verification_processed() {
        let body = br#"{"id":"wh_2","type":"account.number_verification.processed","timestamp":"2023-07-10T03:49:29Z","payload":{"account_id":"acc_1","status":"expired"}}"#;
        let event = decode_event(body).unwrap();

        assert_eq!(event.payload.status, Some(VerificationStatus::Expired));
        assert!(event.payload.enrollment_id.is_none());
    }

    #[test]
    fn test_decode_preserves_unknown_values() {
        let body = br#"{"id":"wh_3","type":"enrollment.reconnected","timestamp":"2023-07-10T03:49:29Z","payload":{"reason":"disconnected.new_reason","extra":1},"api_version":"2020-10-12"}"#;
        let event = decode_event(body).unwrap();

        assert_eq!(
            event.event_type,
            WebhookEventType::Other("enrollment.reconnected".to_string())
        );
        assert_eq!(event.event_type.as_str(), "enrollment.reconnected");
        let reason = event.payload.reason.clone().unwrap();
        assert_eq!(reason.as_str(), "disconnected.new_reason");
        assert!(!reason.requires_user_action());

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "enrollment.reconnected");
    }

    #[test]
    fn test_decode_missing_payload() {
        let body = br#"{"id":"wh_4","type":"webhook.test","timestamp":"2023-07-10T03:49:29Z"}"#;
        assert!(decode_event(body).unwrap().payload.is_empty());
    }

    #[test]
    fn test_decode_malformed() {
        assert!(matches!(decode_event(b"{not json"), Err(WebhookError::Decode(_))));
        assert!(matches!(
            decode_event(br#"{"id":"x","type":"webhook.test","timestamp":"yesterday"}"#),
            Err(WebhookError::Decode(_))
        ));
    }
}
