/// Applies the shared paging flags to a query built by the `tnb_core` query types.
macro_rules! paged_query {
    ($query:ty, $paging:expr, $page_limit:expr) => {{
        let paging: &$crate::cli::PagingArgs = $paging;
        let mut query = <$query>::new()
            .offset(paging.offset)
            .page_limit(paging.page_limit.unwrap_or($page_limit));
        if let Some(limit) = paging.limit {
            query = query.limit(limit);
        }
        if let Some(ordering) = &paging.ordering {
            query = query.ordering(ordering.parse()?);
        }
        query
    }};
}

pub(crate) use paged_query;

mod accounts;
mod banks;
mod blocks;
mod transactions;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tnb_core::{AccountNumber, Bank, ClientConfig, Cursor, HttpJsonClient, ReqwestHttpClient};
use tracing::debug;

use crate::cli::{Cli, Command};
use crate::error::CliError;

/// Connects to the node named on the command line and runs the selected command.
pub async fn run(cli: &Cli) -> Result<Vec<Value>, CliError> {
    let node = cli.node.as_deref().ok_or(CliError::MissingNode)?;

    let mut config = ClientConfig::from_env();
    if let Some(timeout_ms) = cli.timeout_ms {
        config = config.with_timeout_ms(timeout_ms);
    }
    let page_limit = config.page_limit;
    let client = Arc::new(HttpJsonClient::new(
        Arc::new(ReqwestHttpClient::new()),
        config,
    ));

    let bank = match &cli.node_identifier {
        Some(raw) => Bank::new(client, node, AccountNumber::parse(raw)?)?,
        None => Bank::connect(client, node).await?,
    };
    debug!(?bank, "bank ready");

    match &cli.command {
        Command::Accounts(args) => accounts::run(args, &bank, page_limit).await,
        Command::Blocks(args) => blocks::run(args, &bank, page_limit).await,
        Command::Transactions(args) => transactions::run(args, &bank, page_limit).await,
        Command::Banks(args) => banks::run(args, &bank, page_limit).await,
    }
}

/// Drains the cursor into JSON records.
async fn collect<T>(mut cursor: Cursor<T>) -> Result<Vec<Value>, CliError>
where
    T: Serialize + DeserializeOwned + Clone,
{
    let items = cursor.flatten().await?;
    debug!(count = items.len(), total = ?cursor.total_count(), "cursor drained");
    items
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()
        .map_err(CliError::from)
}

fn parse_key(raw: Option<&String>) -> Result<Option<AccountNumber>, CliError> {
    raw.map(|raw| AccountNumber::parse(raw))
        .transpose()
        .map_err(CliError::from)
}
