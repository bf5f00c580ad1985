//! Teller API client.
//!
//! ```text
//! ApiClient ─┬─ accounts()      /accounts, /accounts/{id}[/details|/balances]
//!            ├─ transactions()  /accounts/{id}/transactions[/{id}]
//!            ├─ identity()      /identity
//!            └─ institutions()  /institutions
//! ```

pub mod accounts;
pub mod client;
pub mod identity;
pub mod institutions;
pub mod transactions;

pub use accounts::{
    Account, AccountBalances, AccountDetails, AccountModule, AccountStatus, AccountSubtype,
    AccountType,
};
pub use client::{ApiClient, CertificatePaths, ClientConfig, RequestOptions, DEFAULT_BASE_URL};
pub use identity::{Identity, IdentityModule, Owner};
pub use institutions::{Institution, InstitutionsModule};
pub use transactions::{Pagination, Transaction, TransactionModule};
