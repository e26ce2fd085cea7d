use std::io::{self, Write};

use serde_json::Value;

use crate::cli::OutputFormat;
use crate::error::CliError;

pub fn render(records: &[Value], format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    let stdout = io::stdout();
    write_records(&mut stdout.lock(), records, format, pretty)
}

fn write_records<W: Write>(
    out: &mut W,
    records: &[Value],
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(records)?
            } else {
                serde_json::to_string(records)?
            };
            writeln!(out, "{payload}")?;
        }
        OutputFormat::Ndjson => {
            for record in records {
                writeln!(out, "{}", serde_json::to_string(record)?)?;
            }
        }
    }

    out.flush()?;
    Ok(())
}
