//! Account endpoints.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{ApiClient, RequestOptions};
use crate::error::ApiResult;

open_enum! {
    /// Broad account category.
    pub enum AccountType {
        Depository => "depository",
        Credit => "credit",
    }
}

open_enum! {
    /// Specific account product.
    pub enum AccountSubtype {
        Checking => "checking",
        Savings => "savings",
        MoneyMarket => "money_market",
        CertificateOfDeposit => "certificate_of_deposit",
        Treasury => "treasury",
        CreditCard => "credit_card",
        Sweep => "sweep",
    }
}

open_enum! {
    pub enum AccountStatus {
        Open => "open",
        Closed => "closed",
    }
}

/// Institution an account is held at.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountInstitution {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountLinks {
    #[serde(rename = "self")]
    pub self_link: String,
    pub details: Option<String>,
    pub balances: Option<String>,
    pub transactions: Option<String>,
}

/// A bank account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub enrollment_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    pub subtype: AccountSubtype,
    pub status: AccountStatus,
    #[serde(default)]
    pub institution: AccountInstitution,
    #[serde(default)]
    pub last_four: String,
    #[serde(default)]
    pub links: AccountLinks,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingNumbers {
    pub ach: Option<String>,
    pub wire: Option<String>,
    pub bacs: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountResourceLinks {
    #[serde(rename = "self")]
    pub self_link: String,
    pub account: String,
}

/// Account and routing numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountDetails {
    pub account_id: String,
    pub account_number: String,
    #[serde(default)]
    pub routing_numbers: RoutingNumbers,
    #[serde(default)]
    pub links: AccountResourceLinks,
}

/// Ledger and available balances, as decimal strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountBalances {
    pub account_id: String,
    #[serde(default)]
    pub ledger: Option<String>,
    #[serde(default)]
    pub available: Option<String>,
    #[serde(default)]
    pub links: AccountResourceLinks,
}

/// Account endpoints, borrowed from an [`ApiClient`].
#[derive(Debug, Clone, Copy)]
pub struct AccountModule<'a> {
    client: &'a ApiClient,
}

impl<'a> AccountModule<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// List every account on the enrollment.
    pub async fn list(&self, options: Option<&RequestOptions>) -> ApiResult<Vec<Account>> {
        let request = self
            .client
            .request(Method::GET, &["accounts"], &[], options, true)?;
        let accounts: Vec<Account> = self.client.send_json(request).await?;
        info!(count = accounts.len(), "teller_accounts_listed");
        Ok(accounts)
    }

    pub async fn get(&self, id: &str, options: Option<&RequestOptions>) -> ApiResult<Account> {
        let request = self
            .client
            .request(Method::GET, &["accounts", id], &[], options, true)?;
        self.client.send_json(request).await
    }

    /// Remove a single account from the enrollment.
    pub async fn remove(&self, id: &str, options: Option<&RequestOptions>) -> ApiResult<()> {
        let request =
            self.client
                .request(Method::DELETE, &["accounts", id], &[], options, true)?;
        self.client.send_empty(request).await?;
        info!(account_id = %id, "teller_account_removed");
        Ok(())
    }

    /// Remove every account, which disconnects the enrollment.
    pub async fn remove_all(&self, options: Option<&RequestOptions>) -> ApiResult<()> {
        let request = self
            .client
            .request(Method::DELETE, &["accounts"], &[], options, true)?;
        self.client.send_empty(request).await?;
        info!("teller_accounts_removed");
        Ok(())
    }

    pub async fn details(&self, id: &str, options: Option<&RequestOptions>) -> ApiResult<AccountDetails> {
        let request = self.client.request(
            Method::GET,
            &["accounts", id, "details"],
            &[],
            options,
            true,
        )?;
        self.client.send_json(request).await
    }

    pub async fn balances(&self, id: &str, options: Option<&RequestOptions>) -> ApiResult<AccountBalances> {
        let request = self.client.request(
            Method::GET,
            &["accounts", id, "balances"],
            &[],
            options,
            true,
        )?;
        self.client.send_json(request).await
    }
}
