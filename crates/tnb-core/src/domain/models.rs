use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{AccountNumber, Signature, UtcDateTime, ValidationError};

/// Role of a node on the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeType {
    Bank,
    PrimaryValidator,
    ConfirmationValidator,
}

impl NodeType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bank => "BANK",
            Self::PrimaryValidator => "PRIMARY_VALIDATOR",
            Self::ConfirmationValidator => "CONFIRMATION_VALIDATOR",
        }
    }
}

impl FromStr for NodeType {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "BANK" => Ok(Self::Bank),
            "PRIMARY_VALIDATOR" => Ok(Self::PrimaryValidator),
            "CONFIRMATION_VALIDATOR" => Ok(Self::ConfirmationValidator),
            other => Err(ValidationError::UnknownNodeType {
                value: other.to_owned(),
            }),
        }
    }
}

impl Display for NodeType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrlProtocol {
    Http,
    Https,
}

impl UrlProtocol {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

impl FromStr for UrlProtocol {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "http" => Ok(Self::Http),
            "https" => Ok(Self::Https),
            other => Err(ValidationError::UnknownProtocol {
                value: other.to_owned(),
            }),
        }
    }
}

impl Display for UrlProtocol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An account as seen by one bank. Trust differs between banks, so the
/// record carries the identifier of the bank that reported it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub created_date: UtcDateTime,
    pub modified_date: UtcDateTime,
    pub account_number: AccountNumber,
    pub trust: f64,
    pub bank_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub id: String,
    pub created_date: UtcDateTime,
    pub modified_date: UtcDateTime,
    pub balance_key: AccountNumber,
    pub sender: AccountNumber,
    pub signature: Signature,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankTransaction {
    pub id: String,
    pub block: Block,
    pub amount: u64,
    /// Node type that received this payment as a fee; `None` for ordinary transfers.
    pub fee: Option<NodeType>,
    pub memo: String,
    pub recipient: AccountNumber,
    pub bank_id: String,
}

impl BankTransaction {
    pub fn is_fee(&self) -> bool {
        self.fee.is_some()
    }
}

/// A bank listed by another bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankDetails {
    pub account_number: AccountNumber,
    pub ip_address: String,
    pub node_identifier: AccountNumber,
    pub port: Option<u16>,
    pub protocol: UrlProtocol,
    pub version: String,
    pub default_transaction_fee: u64,
    pub trust: f64,
}

impl BankDetails {
    /// Base URL of this bank's API.
    pub fn address(&self) -> String {
        node_address(self.protocol, &self.ip_address, self.port)
    }
}

/// Primary validator as described in a bank's `/config`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatorDetails {
    pub account_number: AccountNumber,
    pub ip_address: String,
    pub node_identifier: AccountNumber,
    pub port: Option<u16>,
    pub protocol: UrlProtocol,
    pub version: String,
    pub default_transaction_fee: u64,
    pub root_account_file: String,
    pub root_account_file_hash: String,
    pub seed_block_identifier: String,
    pub daily_confirmation_rate: Option<u64>,
    pub trust: f64,
}

impl ValidatorDetails {
    pub fn address(&self) -> String {
        node_address(self.protocol, &self.ip_address, self.port)
    }
}

/// A bank's own `/config`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankConfig {
    pub account_number: AccountNumber,
    pub ip_address: String,
    pub node_identifier: AccountNumber,
    pub port: Option<u16>,
    pub protocol: UrlProtocol,
    pub version: String,
    pub default_transaction_fee: u64,
    pub node_type: NodeType,
    pub primary_validator: Option<ValidatorDetails>,
}

impl BankConfig {
    pub fn address(&self) -> String {
        node_address(self.protocol, &self.ip_address, self.port)
    }
}

fn node_address(protocol: UrlProtocol, ip_address: &str, port: Option<u16>) -> String {
    match port {
        Some(port) => format!("{protocol}://{ip_address}:{port}"),
        None => format!("{protocol}://{ip_address}"),
    }
}
