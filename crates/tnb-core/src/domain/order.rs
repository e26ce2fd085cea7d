//! `ordering` query values accepted by the node list endpoints. A leading
//! `-` sorts descending.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::ValidationError;

macro_rules! ordering {
    (
        $(#[$meta:meta])*
        $name:ident, default = $default:ident {
            $($variant:ident => $value:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$variant,)+];

            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $value,)+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|order| order.as_str() == value)
                    .ok_or_else(|| ValidationError::UnknownOrdering {
                        value: value.to_owned(),
                    })
            }
        }
    };
}

ordering! {
    AccountOrder, default = Created {
        Created => "created_date",
        CreatedDesc => "-created_date",
        Modified => "modified_date",
        ModifiedDesc => "-modified_date",
        Id => "id",
        IdDesc => "-id",
        AccountNumber => "account_number",
        AccountNumberDesc => "-account_number",
        Trust => "trust",
        TrustDesc => "-trust",
    }
}

ordering! {
    /// Transactions sort on their own fields or on the enclosing block's.
    TransactionOrder, default = BlockCreated {
        Amount => "amount",
        AmountDesc => "-amount",
        BlockCreated => "block__created_date",
        BlockCreatedDesc => "-block__created_date",
        BlockModified => "block__modified_date",
        BlockModifiedDesc => "-block__modified_date",
        BlockId => "block__id",
        BlockIdDesc => "-block__id",
        BlockSender => "block__sender",
        BlockSenderDesc => "-block__sender",
        Id => "id",
        IdDesc => "-id",
        Recipient => "recipient",
        RecipientDesc => "-recipient",
    }
}

ordering! {
    BlockOrder, default = Created {
        Created => "created_date",
        CreatedDesc => "-created_date",
        Modified => "modified_date",
        ModifiedDesc => "-modified_date",
        Id => "id",
        IdDesc => "-id",
        BalanceKey => "balance_key",
        BalanceKeyDesc => "-balance_key",
        Sender => "sender",
        SenderDesc => "-sender",
        Signature => "signature",
        SignatureDesc => "-signature",
    }
}

ordering! {
    BankOrder, default = Id {
        Id => "id",
        IdDesc => "-id",
        AccountNumber => "account_number",
        AccountNumberDesc => "-account_number",
        IpAddress => "ip_address",
        IpAddressDesc => "-ip_address",
        NodeIdentifier => "node_identifier",
        NodeIdentifierDesc => "-node_identifier",
        Port => "port",
        PortDesc => "-port",
        Protocol => "protocol",
        ProtocolDesc => "-protocol",
        Version => "version",
        VersionDesc => "-version",
        DefaultTransactionFee => "default_transaction_fee",
        DefaultTransactionFeeDesc => "-default_transaction_fee",
        Trust => "trust",
        TrustDesc => "-trust",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_descending_values() {
        assert_eq!("-trust".parse::<AccountOrder>(), Ok(AccountOrder::TrustDesc));
        assert_eq!(
            "-block__created_date".parse::<TransactionOrder>(),
            Ok(TransactionOrder::BlockCreatedDesc)
        );
    }

    #[test]
    fn rejects_values_of_another_endpoint() {
        let error = "block__id".parse::<BlockOrder>().expect_err("blocks sort by id");
        assert_eq!(
            error,
            ValidationError::UnknownOrdering {
                value: String::from("block__id")
            }
        );
    }

    #[test]
    fn every_variant_round_trips_through_its_wire_value() {
        for order in BankOrder::ALL {
            assert_eq!(order.as_str().parse::<BankOrder>(), Ok(*order));
        }
    }

    #[test]
    fn defaults_match_the_node_defaults() {
        assert_eq!(AccountOrder::default().as_str(), "created_date");
        assert_eq!(TransactionOrder::default().as_str(), "block__created_date");
        assert_eq!(BankOrder::default().as_str(), "id");
    }
}
