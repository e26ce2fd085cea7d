use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::{Kind, SchemaError, Spec};

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageEnvelope<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> PageEnvelope<T> {
    /// Envelope spec whose `results` are checked and converted by `item`.
    pub fn spec(item: &Spec) -> Result<Spec, SchemaError> {
        Spec::dict()
            .field("count", result_count())
            .optional("next", Kind::String)
            .optional("previous", Kind::String)
            .field("results", Spec::list([item]))
            .build()
    }
}

/// Total result count; a whole float or a negative number is not a count.
fn result_count() -> Spec {
    Spec::func("count", |value| match value.as_u64() {
        Some(count) => Ok(Value::from(count)),
        None => Err(format!("count must be a non-negative integer, got {value}").into()),
    })
}
