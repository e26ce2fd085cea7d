use serde_json::Value;
use tnb_core::{Bank, NodeType, TransactionQuery};

use crate::cli::TransactionsArgs;
use crate::error::CliError;

use super::{collect, paged_query, parse_key};

pub async fn run(
    args: &TransactionsArgs,
    bank: &Bank,
    page_limit: u32,
) -> Result<Vec<Value>, CliError> {
    let mut query = paged_query!(TransactionQuery, &args.paging, page_limit);
    if let Some(sender) = parse_key(args.sender.as_ref())? {
        query = query.sender(sender);
    }
    if let Some(recipient) = parse_key(args.recipient.as_ref())? {
        query = query.recipient(recipient);
    }
    if let Some(account) = parse_key(args.account.as_ref())? {
        query = query.account_number(account);
    }
    if let Some(fee) = &args.fee {
        query = query.fee(fee.parse::<NodeType>()?);
    }
    collect(bank.fetch_transactions(query)?).await
}
