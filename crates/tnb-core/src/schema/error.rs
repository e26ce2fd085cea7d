use std::fmt::{Display, Formatter};

use serde_json::Value;
use thiserror::Error;

use super::Kind;

/// Boxed error carried by failed conversions.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// One step into a payload: an object key or an array index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Location of the value that failed, rendered as `$.results[1].trust`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath {
    // innermost segment first; errors gain their parents while unwinding
    reversed: Vec<PathSegment>,
}

impl FieldPath {
    pub fn is_root(&self) -> bool {
        self.reversed.is_empty()
    }

    pub fn segments(&self) -> impl Iterator<Item = &PathSegment> {
        self.reversed.iter().rev()
    }

    fn prepend(&mut self, segment: PathSegment) {
        self.reversed.push(segment);
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("$")?;
        for segment in self.segments() {
            match segment {
                PathSegment::Key(key) => write!(f, ".{key}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// Classification of validation and transform failures.
#[derive(Debug, Error)]
pub enum SchemaErrorKind {
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: String,
        found: &'static str,
    },

    #[error("expected constant {expected}, found {found}")]
    ConstMismatch { expected: Value, found: Value },

    #[error("missing required field '{field}'")]
    MissingField { field: String },

    #[error("unexpected field '{field}'")]
    UnexpectedField { field: String },

    #[error("expected {expected} elements, found {found}")]
    LengthMismatch { expected: usize, found: usize },

    #[error("conversion with '{target}' failed: {source}")]
    ConversionFailed {
        target: String,
        #[source]
        source: BoxError,
    },

    #[error("malformed spec: {reason}")]
    MalformedSpec { reason: String },
}

/// Structured engine error: what went wrong and where in the payload.
#[derive(Debug)]
pub struct SchemaError {
    kind: SchemaErrorKind,
    path: FieldPath,
}

impl SchemaError {
    pub fn new(kind: SchemaErrorKind) -> Self {
        Self {
            kind,
            path: FieldPath::default(),
        }
    }

    pub fn type_mismatch(kind: Kind, strict: bool, found: &Value) -> Self {
        let expected = if strict {
            format!("strict {}", kind.as_str())
        } else {
            kind.as_str().to_owned()
        };
        Self::new(SchemaErrorKind::TypeMismatch {
            expected,
            found: Kind::of(found).as_str(),
        })
    }

    pub fn const_mismatch(expected: &Value, found: &Value) -> Self {
        Self::new(SchemaErrorKind::ConstMismatch {
            expected: expected.clone(),
            found: found.clone(),
        })
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::new(SchemaErrorKind::MissingField {
            field: field.into(),
        })
    }

    pub fn unexpected_field(field: impl Into<String>) -> Self {
        Self::new(SchemaErrorKind::UnexpectedField {
            field: field.into(),
        })
    }

    pub fn length_mismatch(expected: usize, found: usize) -> Self {
        Self::new(SchemaErrorKind::LengthMismatch { expected, found })
    }

    pub fn conversion_failed(target: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::new(SchemaErrorKind::ConversionFailed {
            target: target.into(),
            source: source.into(),
        })
    }

    pub fn malformed_spec(reason: impl Into<String>) -> Self {
        Self::new(SchemaErrorKind::MalformedSpec {
            reason: reason.into(),
        })
    }

    pub fn kind(&self) -> &SchemaErrorKind {
        &self.kind
    }

    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    pub(crate) fn at(mut self, segment: PathSegment) -> Self {
        self.path.prepend(segment);
        self
    }

    pub(crate) fn at_key(self, key: &str) -> Self {
        self.at(PathSegment::Key(key.to_owned()))
    }

    pub(crate) fn at_index(self, index: usize) -> Self {
        self.at(PathSegment::Index(index))
    }
}

impl Display for SchemaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.path.is_root() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{} at {}", self.kind, self.path)
        }
    }
}

impl std::error::Error for SchemaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(&self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_nested_path_outermost_first() {
        let error = SchemaError::missing_field("trust")
            .at_index(1)
            .at_key("results");

        assert_eq!(error.path().to_string(), "$.results[1]");
        assert_eq!(
            error.to_string(),
            "missing required field 'trust' at $.results[1]"
        );
    }

    #[test]
    fn conversion_failure_exposes_its_cause() {
        let error = SchemaError::conversion_failed("parse_trust", String::from("not a number"));

        let source = std::error::Error::source(&error).expect("cause is kept");
        assert_eq!(source.to_string(), "not a number");
    }
}
