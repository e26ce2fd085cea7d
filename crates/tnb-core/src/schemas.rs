//! Spec trees for the records returned by node list endpoints.
//!
//! Leaf values that need more than a kind check (keys, timestamps, trust)
//! go through `Fn` nodes that validate and normalize them, and every record
//! ends in a `Convert` node targeting its domain type.

use serde_json::{Number, Value};

use crate::schema::{BoxError, Kind, SchemaError, Spec, Target};
use crate::{
    Account, AccountNumber, BankConfig, BankDetails, BankTransaction, Block, NodeType, Signature,
    UrlProtocol, UtcDateTime, ValidationError, ValidatorDetails,
};

fn as_str<'a>(value: &'a Value, what: &str) -> Result<&'a str, BoxError> {
    value
        .as_str()
        .ok_or_else(|| format!("{what} must be a string, got {value}").into())
}

/// 64-character hex public key, lowercased.
pub fn public_key() -> Spec {
    Spec::func("public_key", |value| {
        let key = AccountNumber::parse(as_str(value, "public key")?)?;
        Ok(Value::String(key.as_str().to_owned()))
    })
}

/// RFC3339 timestamp, rewritten in canonical UTC form.
pub fn timestamp() -> Spec {
    Spec::func("timestamp", |value| {
        let parsed = UtcDateTime::parse(as_str(value, "timestamp")?)?;
        Ok(Value::String(parsed.format_rfc3339()))
    })
}

/// Trust as a JSON number. Nodes send it as a decimal string such as `"12.50"`.
pub fn trust() -> Spec {
    Spec::func("trust", |value| {
        let parsed = match value {
            Value::Number(number) => number.as_f64(),
            Value::String(text) => text.trim().parse::<f64>().ok(),
            _ => None,
        };
        parsed
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| {
                ValidationError::InvalidTrust {
                    value: value.to_string(),
                }
                .into()
            })
    })
}

pub fn signature() -> Spec {
    Spec::func("signature", |value| {
        let signature = Signature::parse(as_str(value, "signature")?)?;
        Ok(Value::String(signature.as_str().to_owned()))
    })
}

/// Fee recipient of a transaction. The empty string marks an ordinary transfer.
pub fn fee() -> Spec {
    Spec::func("fee", |value| match value {
        Value::Null => Ok(Value::Null),
        Value::String(text) if text.is_empty() => Ok(Value::Null),
        other => {
            let node_type: NodeType = as_str(other, "fee")?.parse()?;
            Ok(Value::String(node_type.as_str().to_owned()))
        }
    })
}

pub fn protocol() -> Spec {
    Spec::func("protocol", |value| {
        let protocol: UrlProtocol = as_str(value, "protocol")?.parse()?;
        Ok(Value::String(protocol.as_str().to_owned()))
    })
}

/// Accounts carry the reporting bank's `bank_id` as ambient context.
pub fn account() -> Result<Spec, SchemaError> {
    let fields = Spec::dict()
        .field("id", Kind::String)
        .field("created_date", timestamp())
        .field("modified_date", timestamp())
        .field("account_number", public_key())
        .field("trust", trust())
        .build()?;
    Ok(Spec::convert(fields, Target::of::<Account>()))
}

pub fn block() -> Result<Spec, SchemaError> {
    let fields = Spec::dict()
        .field("id", Kind::String)
        .field("created_date", timestamp())
        .field("modified_date", timestamp())
        .field("balance_key", public_key())
        .field("sender", public_key())
        .field("signature", signature())
        .build()?;
    Ok(Spec::convert(fields, Target::of::<Block>()))
}

/// Transactions embed their block and carry `bank_id` as ambient context.
pub fn bank_transaction() -> Result<Spec, SchemaError> {
    let fields = Spec::dict()
        .field("id", Kind::String)
        .field("block", block()?)
        .field("amount", Spec::strict(Kind::Integer))
        .field("fee", fee())
        .field("memo", Kind::String)
        .field("recipient", public_key())
        .build()?;
    Ok(Spec::convert(fields, Target::of::<BankTransaction>()))
}

pub fn bank_details() -> Result<Spec, SchemaError> {
    let fields = Spec::dict()
        .field("account_number", public_key())
        .field("ip_address", Kind::String)
        .field("node_identifier", public_key())
        .optional("port", Kind::Integer)
        .field("protocol", protocol())
        .field("version", Kind::String)
        .field("default_transaction_fee", Spec::strict(Kind::Integer))
        .field("trust", trust())
        .build()?;
    Ok(Spec::convert(fields, Target::of::<BankDetails>()))
}

pub fn validator_details() -> Result<Spec, SchemaError> {
    let fields = Spec::dict()
        .field("account_number", public_key())
        .field("ip_address", Kind::String)
        .field("node_identifier", public_key())
        .optional("port", Kind::Integer)
        .field("protocol", protocol())
        .field("version", Kind::String)
        .field("default_transaction_fee", Spec::strict(Kind::Integer))
        .field("root_account_file", Kind::String)
        .field("root_account_file_hash", public_key())
        .field("seed_block_identifier", Kind::String)
        .optional("daily_confirmation_rate", Kind::Integer)
        .field("trust", trust())
        .allow_extra()
        .build()?;
    Ok(Spec::convert(fields, Target::of::<ValidatorDetails>()))
}

/// A bank's `/config`. Any other node type is rejected.
pub fn bank_config() -> Result<Spec, SchemaError> {
    let fields = Spec::dict()
        .field("account_number", public_key())
        .field("ip_address", Kind::String)
        .field("node_identifier", public_key())
        .optional("port", Kind::Integer)
        .field("protocol", protocol())
        .field("version", Kind::String)
        .field("default_transaction_fee", Spec::strict(Kind::Integer))
        .field("node_type", NodeType::Bank.as_str())
        .optional("primary_validator", validator_details()?)
        .allow_extra()
        .build()?;
    Ok(Spec::convert(fields, Target::of::<BankConfig>()))
}

/// Every record spec, built once and shared by the cursors of a client.
#[derive(Debug, Clone)]
pub struct RecordSchemas {
    pub account: Spec,
    pub block: Spec,
    pub bank_transaction: Spec,
    pub bank_details: Spec,
}

impl RecordSchemas {
    pub fn new() -> Result<Self, SchemaError> {
        Ok(Self {
            account: account()?,
            block: block()?,
            bank_transaction: bank_transaction()?,
            bank_details: bank_details()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{Ambient, ConversionContext};
    use crate::schema::SchemaErrorKind;
    use serde_json::json;

    const KEY: &str = "a37e2836805975f334108b55523634c995bd2a4db610062f404510617e83126f";

    fn raw_account() -> Value {
        json!({
            "id": "9eca00a5-d925-454c-a8d6-ecbb26ec2f76",
            "created_date": "2020-10-08T02:18:07.346849Z",
            "modified_date": "2020-10-08T02:18:07.346849Z",
            "account_number": KEY,
            "trust": "12.50"
        })
    }

    #[test]
    fn account_gets_bank_id_from_context() {
        let spec = account().expect("valid spec");
        let ctx = ConversionContext::new().with::<Account>(Ambient::new().kwarg("bank_id", "nid"));

        let account: Account = spec.decode_in(&ctx, &raw_account()).expect("decodes");

        assert_eq!(account.bank_id, "nid");
        assert_eq!(account.trust, 12.5);
        assert_eq!(account.account_number.as_str(), KEY);
    }

    #[test]
    fn account_without_bank_scope_fails_to_construct() {
        let error = account()
            .expect("valid spec")
            .transform(&raw_account())
            .expect_err("bank_id is required by Account");

        assert!(matches!(
            error.kind(),
            SchemaErrorKind::ConversionFailed { target, .. } if target == "Account"
        ));
    }

    #[test]
    fn trust_rejects_non_numeric_strings() {
        let error = trust().transform(&json!("lots")).expect_err("not a decimal");
        assert!(error.to_string().contains("trust must be a finite decimal"));
        assert_eq!(trust().transform(&json!(3)).expect("integer trust"), json!(3.0));
    }

    #[test]
    fn empty_fee_means_ordinary_transfer() {
        assert_eq!(fee().transform(&json!("")).expect("empty"), Value::Null);
        assert_eq!(fee().transform(&json!("BANK")).expect("bank"), json!("BANK"));
        assert!(!fee().validate(&json!("TREASURY")));
    }

    #[test]
    fn bank_details_accept_missing_port() {
        let spec = bank_details().expect("valid spec");
        let details: BankDetails = spec
            .decode_in(
                &ConversionContext::new(),
                &json!({
                    "account_number": KEY,
                    "ip_address": "20.188.33.93",
                    "node_identifier": KEY,
                    "protocol": "http",
                    "version": "v1.0",
                    "default_transaction_fee": 1,
                    "trust": "100.00"
                }),
            )
            .expect("decodes");

        assert_eq!(details.port, None);
        assert_eq!(details.protocol, UrlProtocol::Http);
    }

    fn raw_validator() -> Value {
        json!({
            "account_number": KEY,
            "ip_address": "54.219.183.128",
            "node_identifier": KEY,
            "port": null,
            "protocol": "http",
            "version": "v1.0",
            "default_transaction_fee": 1,
            "root_account_file": "http://54.219.183.128/media/root_account_file.json",
            "root_account_file_hash": KEY,
            "seed_block_identifier": "",
            "daily_confirmation_rate": null,
            "trust": "100.00"
        })
    }

    fn raw_bank_config(primary_validator: Value) -> Value {
        json!({
            "primary_validator": primary_validator,
            "account_number": KEY,
            "ip_address": "54.183.16.194",
            "node_identifier": KEY,
            "port": 8000,
            "protocol": "http",
            "version": "v1.0",
            "default_transaction_fee": 2,
            "node_type": "BANK"
        })
    }

    #[test]
    fn bank_config_decodes_nested_primary_validator() {
        let spec = bank_config().expect("valid spec");
        let config: BankConfig = spec
            .decode_in(&ConversionContext::new(), &raw_bank_config(raw_validator()))
            .expect("decodes");

        assert_eq!(config.node_type, NodeType::Bank);
        assert_eq!(config.address(), "http://54.183.16.194:8000");
        assert_eq!(config.default_transaction_fee, 2);
        let validator = config.primary_validator.expect("primary validator present");
        assert_eq!(validator.trust, 100.0);
        assert_eq!(validator.daily_confirmation_rate, None);
        assert_eq!(validator.address(), "http://54.219.183.128");
    }

    #[test]
    fn bank_config_rejects_other_node_types() {
        let spec = bank_config().expect("valid spec");
        let mut raw = raw_bank_config(Value::Null);
        assert!(spec.validate(&raw));

        raw["node_type"] = json!("PRIMARY_VALIDATOR");
        let error = spec.transform(&raw).expect_err("only banks");
        assert_eq!(error.path().to_string(), "$.node_type");
    }

    #[test]
    fn validator_trust_must_be_numeric() {
        let mut raw = raw_validator();
        raw["trust"] = json!("high");
        let error = validator_details()
            .expect("valid spec")
            .transform(&raw)
            .expect_err("not a decimal");
        assert_eq!(error.path().to_string(), "$.trust");
    }
}
