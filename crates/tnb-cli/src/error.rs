use thiserror::Error;
use tnb_core::{CursorError, SchemaError, TnbError, ValidationError};

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("no bank node given; pass --node or set TNB_NODE")]
    MissingNode,

    #[error(transparent)]
    Node(#[from] TnbError),

    #[error(transparent)]
    Cursor(#[from] CursorError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) | Self::MissingNode => 2,
            Self::Node(TnbError::Validation(_)) => 2,
            Self::Node(TnbError::Client(_)) => 3,
            Self::Node(TnbError::Schema(_)) => 4,
            Self::Cursor(error) => cursor_exit_code(error),
            Self::Schema(_) | Self::Serialization(_) => 4,
            Self::Io(_) => 10,
        }
    }
}

const fn cursor_exit_code(error: &CursorError) -> u8 {
    match error {
        CursorError::Client(_) => 3,
        CursorError::Decode(_) => 4,
        CursorError::Exhausted => 10,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tnb_core::ClientError;

    #[test]
    fn upstream_failures_exit_with_three() {
        let error = CliError::from(CursorError::Client(ClientError::from_status(503, "")));
        assert_eq!(error.exit_code(), 3);

        let error = CliError::from(TnbError::Client(ClientError::transport("refused")));
        assert_eq!(error.exit_code(), 3);
    }

    #[test]
    fn decode_failures_exit_with_four() {
        let error = CliError::from(CursorError::Decode(SchemaError::missing_field("id")));
        assert_eq!(error.exit_code(), 4);
    }

    #[test]
    fn bad_input_exits_with_two() {
        let error = CliError::from(
            "zz".parse::<tnb_core::AccountOrder>()
                .expect_err("unknown ordering"),
        );
        assert_eq!(error.exit_code(), 2);
        assert_eq!(CliError::MissingNode.exit_code(), 2);
    }
}
