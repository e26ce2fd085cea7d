//! # tnb-core
//!
//! Typed client core for the paginated JSON API of TNB network nodes.
//!
//! Raw responses are checked and converted by a [`schema::Spec`] tree into
//! domain records. Callers pass ambient constructor arguments (such as the
//! identifier of the bank a record came from) through an explicit
//! [`ConversionContext`], and list endpoints are walked lazily with a
//! [`Cursor`].
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`schema`] | Spec tree nodes and the validate/transform engine |
//! | [`context`] | Conversion context with ambient arguments |
//! | [`cursor`] | Bidirectional paged cursor |
//! | [`client`] | JSON fetch seam and its HTTP implementation |
//! | [`http_client`] | Transport abstraction over reqwest |
//! | [`retry`] | Retry policy and backoff |
//! | [`config`] | Client configuration |
//! | [`domain`] | Records, keys, timestamps and orderings |
//! | [`schemas`] | Spec trees for the node's records |
//! | [`bank`] | Bank node client |
//! | [`error`] | Domain and top-level errors |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tnb_core::{AccountOrder, AccountQuery, Bank, HttpJsonClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Arc::new(HttpJsonClient::from_env());
//!     let bank = Bank::connect(client, "http://54.183.16.194").await?;
//!
//!     let mut accounts = bank.fetch_accounts(
//!         AccountQuery::new().ordering(AccountOrder::TrustDesc).limit(10),
//!     )?;
//!     while let Some(account) = accounts.try_next().await? {
//!         println!("{} trust={}", account.account_number, account.trust);
//!     }
//!     Ok(())
//! }
//! ```

pub mod bank;
pub mod client;
pub mod config;
pub mod context;
pub mod cursor;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod retry;
pub mod schema;
pub mod schemas;

pub use bank::{AccountQuery, Bank, BankQuery, BlockQuery, TransactionQuery};
pub use client::{ClientError, ClientErrorKind, HttpJsonClient, JsonClient, JsonFuture};
pub use config::ClientConfig;
pub use context::{Ambient, ConversionContext, TargetKey};
pub use cursor::{Cursor, CursorConfig, CursorError, CursorState, Direction, PageEnvelope};
pub use domain::{
    Account, AccountNumber, AccountOrder, BankConfig, BankDetails, BankOrder, BankTransaction,
    Block, BlockOrder, NodeType, Signature, TransactionOrder, UrlProtocol, UtcDateTime,
    ValidatorDetails,
};
pub use error::{TnbError, ValidationError};
pub use http_client::{
    HttpClient, HttpError, HttpErrorKind, HttpRequest, HttpResponse, ReqwestHttpClient,
};
pub use retry::{Backoff, RetryConfig};
pub use schema::{Kind, SchemaError, SchemaErrorKind, Spec, Target, Unpack};
