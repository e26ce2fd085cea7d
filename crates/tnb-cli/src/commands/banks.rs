use serde_json::Value;
use tnb_core::{Bank, BankQuery};

use crate::cli::BanksArgs;
use crate::error::CliError;

use super::{collect, paged_query};

pub async fn run(
    args: &BanksArgs,
    bank: &Bank,
    page_limit: u32,
) -> Result<Vec<Value>, CliError> {
    let query = paged_query!(BankQuery, &args.paging, page_limit);
    collect(bank.fetch_banks(query)?).await
}
