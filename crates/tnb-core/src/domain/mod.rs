//! # Domain records
//!
//! Plain data holders produced by the record schemas in [`crate::schemas`].
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Account`] | Account with the trust assigned by one bank |
//! | [`Block`] | Signed transfer block |
//! | [`BankTransaction`] | One transfer inside a block |
//! | [`BankDetails`] | Bank listed by another bank |
//! | [`BankConfig`], [`ValidatorDetails`] | A bank's `/config` and its primary validator |
//! | [`NodeType`], [`UrlProtocol`] | Wire enums |
//! | [`AccountNumber`], [`Signature`] | Validated hex keys |
//! | [`UtcDateTime`] | UTC timestamp |
//! | [`AccountOrder`] … [`BankOrder`] | `ordering` query values |

mod key;
mod models;
mod order;
mod timestamp;

pub use key::{AccountNumber, Signature, ACCOUNT_NUMBER_HEX_LEN, SIGNATURE_HEX_LEN};
pub use models::{
    Account, BankConfig, BankDetails, BankTransaction, Block, NodeType, UrlProtocol,
    ValidatorDetails,
};
pub use order::{AccountOrder, BankOrder, BlockOrder, TransactionOrder};
pub use timestamp::UtcDateTime;
