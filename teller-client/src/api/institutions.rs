//! Institution listing. This endpoint is public and sent without credentials.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::ApiClient;
use crate::error::ApiResult;

/// A financial institution supported by Teller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Institution {
    pub id: String,
    pub name: String,
    /// Products available at this institution, e.g. `balance`, `transactions`
    #[serde(default)]
    pub products: Vec<String>,
}

/// Institution endpoint, borrowed from an [`ApiClient`].
#[derive(Debug, Clone, Copy)]
pub struct InstitutionsModule<'a> {
    client: &'a ApiClient,
}

impl<'a> InstitutionsModule<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> ApiResult<Vec<Institution>> {
        let request = self
            .client
            .request(Method::GET, &["institutions"], &[], None, false)?;
        let institutions: Vec<Institution> = self.client.send_json(request).await?;
        info!(count = institutions.len(), "teller_institutions_listed");
        Ok(institutions)
    }
}
