use serde_json::Value;
use tnb_core::{Bank, BlockQuery};

use crate::cli::BlocksArgs;
use crate::error::CliError;

use super::{collect, paged_query, parse_key};

pub async fn run(
    args: &BlocksArgs,
    bank: &Bank,
    page_limit: u32,
) -> Result<Vec<Value>, CliError> {
    let mut query = paged_query!(BlockQuery, &args.paging, page_limit);
    if let Some(sender) = parse_key(args.sender.as_ref())? {
        query = query.sender(sender);
    }
    collect(bank.fetch_blocks(query)?).await
}
