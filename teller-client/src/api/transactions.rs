//! Transaction endpoints.
//!
//! [`Transaction`] is also embedded in `transactions.processed` webhook
//! payloads, so every field decodes leniently: a missing key or an explicit
//! `null` yields the field's default.

use reqwest::Method;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::info;

use super::{ApiClient, RequestOptions};
use crate::error::ApiResult;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Counterparty {
    pub name: Option<String>,
    /// `person` or `organization`
    #[serde(rename = "type")]
    pub counterparty_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionDetails {
    /// `pending` or `complete`
    #[serde(deserialize_with = "null_as_default")]
    pub processing_status: String,
    pub category: Option<String>,
    pub counterparty: Option<Counterparty>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionLinks {
    #[serde(rename = "self", deserialize_with = "null_as_default")]
    pub self_link: String,
    #[serde(deserialize_with = "null_as_default")]
    pub account: String,
}

/// A transaction on an account. Amounts and balances are decimal strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transaction {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub account_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub amount: String,
    #[serde(deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub details: TransactionDetails,
    /// `posted` or `pending`
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub links: TransactionLinks,
    pub running_balance: Option<String>,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub transaction_type: String,
}

/// Decode `null` as `T::default()`. Missing keys are covered by the
/// container-level `#[serde(default)]`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Cursor pagination for transaction listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pagination {
    /// Return transactions after this transaction id
    pub from_id: Option<String>,
    /// Maximum number of transactions to return
    pub count: Option<u32>,
}

impl Pagination {
    fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(from_id) = self.from_id.as_deref().filter(|id| !id.is_empty()) {
            query.push(("from_id", from_id.to_string()));
        }
        if let Some(count) = self.count.filter(|c| *c > 0) {
            query.push(("count", count.to_string()));
        }
        query
    }
}

/// Transaction endpoints, borrowed from an [`ApiClient`].
#[derive(Debug, Clone, Copy)]
pub struct TransactionModule<'a> {
    client: &'a ApiClient,
}

impl<'a> TransactionModule<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// List an account's transactions, newest first.
    pub async fn list(
        &self,
        account_id: &str,
        pagination: &Pagination,
        options: Option<&RequestOptions>,
    ) -> ApiResult<Vec<Transaction>> {
        let request = self.client.request(
            Method::GET,
            &["accounts", account_id, "transactions"],
            &pagination.query(),
            options,
            true,
        )?;
        let transactions: Vec<Transaction> = self.client.send_json(request).await?;
        info!(
            account_id = %account_id,
            count = transactions.len(),
            "teller_transactions_listed"
        );
        Ok(transactions)
    }

    pub async fn get(
        &self,
        account_id: &str,
        id: &str,
        options: Option<&RequestOptions>,
    ) -> ApiResult<Transaction> {
        let request = self.client.request(
            Method::GET,
            &["accounts", account_id, "transactions", id],
            &[],
            options,
            true,
        )?;
        self.client.send_json(request).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::api::ClientConfig;

    fn transaction_json(id: &str) -> serde_json::Value {
        json!({
            "account_id": "acc_1",
            "amount": "-14.18",
            "date": "2023-07-08",
            "description": "Uber Eats",
            "details": {
                "category": "dining",
                "counterparty": {"name": "UBER", "type": "organization"},
                "processing_status": "complete"
            },
            "id": id,
            "links": {
                "account": "https://api.teller.io/accounts/acc_1",
                "self": format!("https://api.teller.io/accounts/acc_1/transactions/{id}")
            },
            "running_balance": "1200.00",
            "status": "posted",
            "type": "card_payment"
        })
    }

    fn client(server: &MockServer) -> ApiClient {
        ApiClient::new(ClientConfig {
            base_url: server.uri(),
            access_token: Some("tok".to_string()),
            ..ClientConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_pagination_query() {
        assert!(Pagination::default().query().is_empty());

        let page = Pagination {
            from_id: Some("txn_9".to_string()),
            count: Some(25),
        };
        assert_eq!(
            page.query(),
            vec![("from_id", "txn_9".to_string()), ("count", "25".to_string())]
        );

        let ignored = Pagination {
            from_id: Some(String::new()),
            count: Some(0),
        };
        assert!(ignored.query().is_empty());
    }

    #[test]
    fn test_transaction_with_null_fields() {
        let tx: Transaction = serde_json::from_value(json!({
            "id": "txn_1",
            "amount": "5.00",
            "details": {"processing_status": "pending", "category": null, "counterparty": {"name": null, "type": null}},
            "running_balance": null
        }))
        .unwrap();

        assert_eq!(tx.details.category, None);
        assert_eq!(tx.details.counterparty.unwrap().name, None);
        assert_eq!(tx.account_id, "");
    }

    #[test]
    fn test_transaction_with_explicit_nulls() {
        let tx: Transaction = serde_json::from_value(json!({
            "id": "txn_1",
            "account_id": "acc_1",
            "amount": "5.00",
            "date": null,
            "description": null,
            "details": null,
            "status": null,
            "links": null,
            "type": null
        }))
        .unwrap();

        assert_eq!(tx.id, "txn_1");
        assert_eq!(tx.description, "");
        assert_eq!(tx.details, TransactionDetails::default());
        assert_eq!(tx.links, TransactionLinks::default());
        assert_eq!(tx.transaction_type, "");

        let details: TransactionDetails =
            serde_json::from_value(json!({"processing_status": null, "category": "dining"})).unwrap();
        assert_eq!(details.processing_status, "");
        assert_eq!(details.category.as_deref(), Some("dining"));

        let links: TransactionLinks = serde_json::from_value(json!({"self": null, "account": null})).unwrap();
        assert_eq!(links, TransactionLinks::default());
    }

    #[tokio::test]
    async fn get_transaction_escapes_path_ids() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("GET"))
            .and(matchers::path("/accounts/acc%2F1/transactions/txn%3F1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(transaction_json("txn?1")))
            .expect(1)
            .mount(&server)
            .await;

        let tx = client(&server)
            .transactions()
            .get("acc/1", "txn?1", None)
            .await
            .unwrap();

        assert_eq!(tx.id, "txn?1");
    }

    #[tokio::test]
    async fn list_transactions_with_pagination() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("GET"))
            .and(matchers::path("/accounts/acc_1/transactions"))
            .and(matchers::query_param("from_id", "txn_0"))
            .and(matchers::query_param("count", "2"))
            .and(matchers::header("authorization", "Basic dG9rOg=="))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([transaction_json("txn_1"), transaction_json("txn_2")])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let page = Pagination {
            from_id: Some("txn_0".to_string()),
            count: Some(2),
        };
        let transactions = client(&server)
            .transactions()
            .list("acc_1", &page, None)
            .await
            .unwrap();

        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[1].id, "txn_2");
        assert_eq!(transactions[0].running_balance.as_deref(), Some("1200.00"));
        assert_eq!(
            transactions[0].details.counterparty.as_ref().unwrap().counterparty_type.as_deref(),
            Some("organization")
        );
    }

    #[tokio::test]
    async fn get_transaction() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("GET"))
            .and(matchers::path("/accounts/acc_1/transactions/txn_1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(transaction_json("txn_1")))
            .expect(1)
            .mount(&server)
            .await;

        let tx = client(&server)
            .transactions()
            .get("acc_1", "txn_1", None)
            .await
            .unwrap();

        assert_eq!(tx.transaction_type, "card_payment");
        assert_eq!(tx.description, "Uber Eats");
    }
}
