//! Read-only client for a bank node's list endpoints.

use std::sync::Arc;

use tracing::debug;

use crate::client::JsonClient;
use crate::config::DEFAULT_PAGE_LIMIT;
use crate::context::{Ambient, ConversionContext};
use crate::cursor::{Cursor, CursorConfig};
use crate::schema::SchemaError;
use crate::schemas::{self, RecordSchemas};
use crate::{
    Account, AccountNumber, AccountOrder, BankConfig, BankDetails, BankOrder, BankTransaction,
    Block, BlockOrder, NodeType, TnbError, TransactionOrder,
};

macro_rules! paging {
    ($name:ident, $order:ty $(, $filter:ident)*) => {
        impl $name {
            pub fn new() -> Self {
                Self::default()
            }

            /// Entries skipped on the server before the first page.
            pub fn offset(mut self, offset: u64) -> Self {
                self.offset = offset;
                self
            }

            /// Total number of items the cursor hands out.
            pub fn limit(mut self, limit: usize) -> Self {
                self.limit = Some(limit);
                self
            }

            pub fn ordering(mut self, ordering: $order) -> Self {
                self.ordering = ordering;
                self
            }

            /// Items requested per page.
            pub fn page_limit(mut self, page_limit: u32) -> Self {
                self.page_limit = page_limit;
                self
            }

            fn paging_params(&self) -> Vec<(String, String)> {
                vec![
                    (String::from("offset"), self.offset.to_string()),
                    (String::from("limit"), self.page_limit.to_string()),
                    (String::from("ordering"), self.ordering.as_str().to_owned()),
                ]
            }

            fn cursor_config(&self) -> CursorConfig {
                CursorConfig::default()
                    .with_limit(self.limit)
                    .with_page_size(usize::try_from(self.page_limit).ok())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    offset: 0,
                    limit: None,
                    ordering: <$order>::default(),
                    page_limit: DEFAULT_PAGE_LIMIT,
                    $($filter: None,)*
                }
            }
        }
    };
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountQuery {
    pub offset: u64,
    pub limit: Option<usize>,
    pub ordering: AccountOrder,
    pub page_limit: u32,
}

paging!(AccountQuery, AccountOrder);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionQuery {
    pub offset: u64,
    pub limit: Option<usize>,
    pub ordering: TransactionOrder,
    pub page_limit: u32,
    pub sender: Option<AccountNumber>,
    pub recipient: Option<AccountNumber>,
    pub fee: Option<NodeType>,
    pub account_number: Option<AccountNumber>,
}

paging!(TransactionQuery, TransactionOrder, sender, recipient, fee, account_number);

impl TransactionQuery {
    pub fn sender(mut self, sender: AccountNumber) -> Self {
        self.sender = Some(sender);
        self
    }

    pub fn recipient(mut self, recipient: AccountNumber) -> Self {
        self.recipient = Some(recipient);
        self
    }

    pub fn fee(mut self, fee: NodeType) -> Self {
        self.fee = Some(fee);
        self
    }

    /// Transactions where the account is either sender or recipient.
    pub fn account_number(mut self, account_number: AccountNumber) -> Self {
        self.account_number = Some(account_number);
        self
    }

    fn params(&self) -> Vec<(String, String)> {
        let mut params = self.paging_params();
        let filters = [
            ("block__sender", self.sender.as_ref().map(ToString::to_string)),
            ("recipient", self.recipient.as_ref().map(ToString::to_string)),
            ("fee", self.fee.map(|fee| fee.as_str().to_owned())),
            (
                "account_number",
                self.account_number.as_ref().map(ToString::to_string),
            ),
        ];
        params.extend(
            filters
                .into_iter()
                .filter_map(|(key, value)| value.map(|value| (key.to_owned(), value))),
        );
        params
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockQuery {
    pub offset: u64,
    pub limit: Option<usize>,
    pub ordering: BlockOrder,
    pub page_limit: u32,
    pub sender: Option<AccountNumber>,
}

paging!(BlockQuery, BlockOrder, sender);

impl BlockQuery {
    pub fn sender(mut self, sender: AccountNumber) -> Self {
        self.sender = Some(sender);
        self
    }

    fn params(&self) -> Vec<(String, String)> {
        let mut params = self.paging_params();
        if let Some(sender) = &self.sender {
            params.push((String::from("sender"), sender.to_string()));
        }
        params
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankQuery {
    pub offset: u64,
    pub limit: Option<usize>,
    pub ordering: BankOrder,
    pub page_limit: u32,
}

paging!(BankQuery, BankOrder);

/// Handle on one bank node.
#[derive(Clone)]
pub struct Bank {
    client: Arc<dyn JsonClient>,
    address: String,
    node_identifier: AccountNumber,
    config: Option<BankConfig>,
    schemas: RecordSchemas,
}

impl Bank {
    /// Bank at `address` (e.g. `http://54.183.16.194`) identified by `node_identifier`.
    pub fn new(
        client: Arc<dyn JsonClient>,
        address: impl Into<String>,
        node_identifier: AccountNumber,
    ) -> Result<Self, SchemaError> {
        let address = address.into().trim_end_matches('/').to_owned();
        Ok(Self {
            client,
            address,
            node_identifier,
            config: None,
            schemas: RecordSchemas::new()?,
        })
    }

    /// Reads the bank's `/config` and keeps it for [`Bank::config`].
    pub async fn connect(
        client: Arc<dyn JsonClient>,
        address: impl Into<String>,
    ) -> Result<Self, TnbError> {
        let address = address.into();
        let url = format!("{}/config", address.trim_end_matches('/'));
        let raw = client.fetch_json(&url, &[]).await?;

        let config: BankConfig =
            schemas::bank_config()?.decode_in(&ConversionContext::new(), &raw)?;
        debug!(
            %address,
            node_identifier = %config.node_identifier,
            version = %config.version,
            "connected to bank"
        );

        let mut bank = Self::new(client, address, config.node_identifier.clone())?;
        bank.config = Some(config);
        Ok(bank)
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn node_identifier(&self) -> &AccountNumber {
        &self.node_identifier
    }

    /// The `/config` read by [`Bank::connect`]; `None` for banks built with [`Bank::new`].
    pub fn config(&self) -> Option<&BankConfig> {
        self.config.as_ref()
    }

    /// Conversion context that stamps records from this bank with its identifier.
    pub fn context(&self) -> ConversionContext {
        let ambient = Ambient::new().kwarg("bank_id", self.node_identifier.as_str());
        ConversionContext::new()
            .with::<Account>(ambient.clone())
            .with::<BankTransaction>(ambient)
    }

    pub fn fetch_accounts(&self, query: AccountQuery) -> Result<Cursor<Account>, SchemaError> {
        Ok(
            Cursor::new(self.client.clone(), self.endpoint("accounts"), &self.schemas.account)?
                .with_query(query.paging_params())
                .with_context(self.context())
                .with_config(query.cursor_config()),
        )
    }

    pub fn fetch_transactions(
        &self,
        query: TransactionQuery,
    ) -> Result<Cursor<BankTransaction>, SchemaError> {
        Ok(Cursor::new(
            self.client.clone(),
            self.endpoint("bank_transactions"),
            &self.schemas.bank_transaction,
        )?
        .with_query(query.params())
        .with_context(self.context())
        .with_config(query.cursor_config()))
    }

    pub fn fetch_blocks(&self, query: BlockQuery) -> Result<Cursor<Block>, SchemaError> {
        Ok(
            Cursor::new(self.client.clone(), self.endpoint("blocks"), &self.schemas.block)?
                .with_query(query.params())
                .with_config(query.cursor_config()),
        )
    }

    pub fn fetch_banks(&self, query: BankQuery) -> Result<Cursor<BankDetails>, SchemaError> {
        Ok(Cursor::new(
            self.client.clone(),
            self.endpoint("banks"),
            &self.schemas.bank_details,
        )?
        .with_query(query.paging_params())
        .with_config(query.cursor_config()))
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.address)
    }
}

impl std::fmt::Debug for Bank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bank")
            .field("address", &self.address)
            .field("node_identifier", &self.node_identifier)
            .finish()
    }
}
