//! CLI argument definitions for tnb.
//!
//! Every command walks one list endpoint of a bank node through a paged
//! cursor and prints the decoded records.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `accounts` | List accounts known to the bank |
//! | `blocks` | List blocks, optionally by sender |
//! | `transactions` | List bank transactions with filters |
//! | `banks` | List peer banks |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--node` | `$TNB_NODE` | Bank address, e.g. `http://54.183.16.194` |
//! | `--node-identifier` | read from `/config` | Skip the config lookup |
//! | `--format` | `json` | Output format (json, ndjson) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--timeout-ms` | `$TNB_TIMEOUT_MS` or `10000` | Request timeout in ms |
//!
//! # Examples
//!
//! ```bash
//! # Ten most trusted accounts
//! tnb --node http://54.183.16.194 accounts --ordering=-trust --limit 10 --pretty
//!
//! # Fee payments sent by one account, one record per line
//! tnb --node http://54.183.16.194 --format ndjson transactions --sender <key> --fee BANK
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Read-only client for TNB bank nodes.
#[derive(Debug, Parser)]
#[command(
    name = "tnb",
    author,
    version,
    about = "Typed client for TNB bank node list endpoints",
    long_about = "tnb pages through the list endpoints of a bank node, checks every \
record against its schema and prints the typed result as JSON.\n\
\n\
Use 'tnb <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Bank node address.
    #[arg(long, global = true, env = "TNB_NODE")]
    pub node: Option<String>,

    /// Node identifier of the bank; read from its /config when omitted.
    #[arg(long, global = true)]
    pub node_identifier: Option<String>,

    /// Output format for results.
    ///
    /// - json: A single JSON array
    /// - ndjson: One record per line
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Per-request timeout in milliseconds.
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Single JSON array output.
    Json,
    /// Newline-delimited JSON (one record per line).
    Ndjson,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List accounts.
    ///
    /// Orderings: created_date, modified_date, id, account_number, trust
    /// (prefix with '-' to sort descending).
    ///
    /// # Examples
    ///
    ///   tnb accounts --limit 20
    ///   tnb accounts --ordering=-trust --page-limit 50
    Accounts(AccountsArgs),

    /// List blocks.
    ///
    /// Orderings: created_date, modified_date, id, balance_key, sender,
    /// signature (prefix with '-' to sort descending).
    Blocks(BlocksArgs),

    /// List bank transactions.
    ///
    /// Orderings: amount, block__created_date, fee, id, memo, recipient,
    /// block__sender (prefix with '-' to sort descending).
    ///
    /// # Examples
    ///
    ///   tnb transactions --account <key> --limit 10
    ///   tnb transactions --fee PRIMARY_VALIDATOR
    Transactions(TransactionsArgs),

    /// List peer banks.
    Banks(BanksArgs),
}

/// Paging options shared by every list command.
#[derive(Debug, Clone, Args)]
pub struct PagingArgs {
    /// Maximum number of records to print.
    #[arg(long)]
    pub limit: Option<usize>,

    /// Records skipped on the server before the first page.
    #[arg(long, default_value_t = 0)]
    pub offset: u64,

    /// Server ordering value, e.g. `created_date` or `-trust`.
    #[arg(long, allow_hyphen_values = true)]
    pub ordering: Option<String>,

    /// Records requested per page.
    #[arg(long)]
    pub page_limit: Option<u32>,
}

#[derive(Debug, Args)]
pub struct AccountsArgs {
    #[command(flatten)]
    pub paging: PagingArgs,
}

#[derive(Debug, Args)]
pub struct BlocksArgs {
    #[command(flatten)]
    pub paging: PagingArgs,

    /// Only blocks signed by this account.
    #[arg(long)]
    pub sender: Option<String>,
}

#[derive(Debug, Args)]
pub struct TransactionsArgs {
    #[command(flatten)]
    pub paging: PagingArgs,

    /// Only transactions sent by this account.
    #[arg(long)]
    pub sender: Option<String>,

    /// Only transactions received by this account.
    #[arg(long)]
    pub recipient: Option<String>,

    /// Only fee payments to this node type (BANK, PRIMARY_VALIDATOR).
    #[arg(long)]
    pub fee: Option<String>,

    /// Transactions where this account is sender or recipient.
    #[arg(long)]
    pub account: Option<String>,
}

#[derive(Debug, Args)]
pub struct BanksArgs {
    #[command(flatten)]
    pub paging: PagingArgs,
}
