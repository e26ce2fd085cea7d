use serde_json::Value;
use tnb_core::{AccountQuery, Bank};

use crate::cli::AccountsArgs;
use crate::error::CliError;

use super::{collect, paged_query};

pub async fn run(
    args: &AccountsArgs,
    bank: &Bank,
    page_limit: u32,
) -> Result<Vec<Value>, CliError> {
    let query = paged_query!(AccountQuery, &args.paging, page_limit);
    collect(bank.fetch_accounts(query)?).await
}
