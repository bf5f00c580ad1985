//! Identity endpoint.

use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::{Account, ApiClient, RequestOptions};
use crate::error::ApiResult;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    pub primary: bool,
    pub street: String,
    pub city: String,
    pub region: String,
    pub postal_code: String,
    pub country_code: String,
}

/// A typed value such as a name or phone number.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypedValue {
    #[serde(rename = "type")]
    pub value_type: Option<String>,
    pub data: String,
}

/// An account holder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Owner {
    /// `person` or `business`
    #[serde(rename = "type")]
    pub owner_type: String,
    pub names: Vec<TypedValue>,
    pub addresses: Vec<Address>,
    pub phone_numbers: Vec<TypedValue>,
    pub emails: Vec<TypedValue>,
}

/// Ownership information for one account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub account: Account,
    #[serde(default)]
    pub owners: Vec<Owner>,
}

/// Identity endpoint, borrowed from an [`ApiClient`].
#[derive(Debug, Clone, Copy)]
pub struct IdentityModule<'a> {
    client: &'a ApiClient,
}

impl<'a> IdentityModule<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Fetch account holder information for every account on the enrollment.
    pub async fn get(&self, options: Option<&RequestOptions>) -> ApiResult<Vec<Identity>> {
        let request = self
            .client
            .request(Method::GET, &["identity"], &[], options, true)?;
        self.client.send_json(request).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::api::ClientConfig;

    #[tokio::test]
    async fn get_identity() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("GET"))
            .and(matchers::path("/identity"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "account": {
                    "id": "acc_1",
                    "currency": "USD",
                    "enrollment_id": "enr_1",
                    "institution": {"id": "chase", "name": "Chase"},
                    "last_four": "1234",
                    "links": {"self": "https://api.teller.io/accounts/acc_1"},
                    "name": "Checking",
                    "subtype": "checking",
                    "type": "depository",
                    "status": "open"
                },
                "owners": [{
                    "type": "person",
                    "names": [{"type": "name", "data": "Jane Doe"}],
                    "addresses": [{
                        "primary": true,
                        "street": "1 Main St",
                        "city": "Springfield",
                        "region": "IL",
                        "postal_code": "62701",
                        "country_code": "US"
                    }],
                    "phone_numbers": [{"type": "mobile", "data": "15555550100"}],
                    "emails": [{"data": "jane@example.com"}]
                }]
            }])))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(ClientConfig {
            base_url: server.uri(),
            access_token: Some("tok".to_string()),
            ..ClientConfig::default()
        })
        .unwrap();

        let identities = client.identity().get(None).await.unwrap();

        assert_eq!(identities.len(), 1);
        let owner = &identities[0].owners[0];
        assert_eq!(owner.owner_type, "person");
        assert_eq!(owner.names[0].data, "Jane Doe");
        assert!(owner.addresses[0].primary);
        assert_eq!(owner.emails[0].value_type, None);
        assert_eq!(identities[0].account.id, "acc_1");
    }
}
