use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::{BoxError, SchemaError, Spec};
use crate::context::{Ambient, TargetKey};

type ConstructFn = dyn Fn(Value) -> Result<Value, BoxError> + Send + Sync;

/// Constructor that a `Convert` node calls with the transformed value.
#[derive(Clone)]
pub struct Target {
    key: TargetKey,
    name: String,
    construct: Arc<ConstructFn>,
}

impl Target {
    /// Builds `T` through serde: objects become named fields, arrays become
    /// positional fields. The record is serialized back into the output tree,
    /// so parents can embed it and decode it as a typed field.
    pub fn of<T>() -> Self
    where
        T: DeserializeOwned + Serialize + 'static,
    {
        Self {
            key: TargetKey::of::<T>(),
            name: short_type_name::<T>().to_owned(),
            construct: Arc::new(|arguments: Value| -> Result<Value, BoxError> {
                let record: T = serde_json::from_value(arguments)?;
                Ok(serde_json::to_value(record)?)
            }),
        }
    }

    /// Custom constructor, keyed by `name` for ambient lookups.
    pub fn named<F>(name: impl Into<String>, construct: F) -> Self
    where
        F: Fn(Value) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        let name = name.into();
        Self {
            key: TargetKey::named(name.clone()),
            name,
            construct: Arc::new(construct),
        }
    }

    pub fn key(&self) -> &TargetKey {
        &self.key
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// How the transformed value is handed to the constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Unpack {
    /// Objects are keyword arguments, arrays positional arguments, anything
    /// else a single argument.
    #[default]
    Auto,
    /// Always a single argument, whatever its shape.
    Single,
}

/// `Convert` node: inner spec, constructor and unpack mode.
#[derive(Clone)]
pub struct ConvertSpec {
    inner: Spec,
    target: Target,
    unpack: Unpack,
}

impl ConvertSpec {
    pub(crate) fn new(inner: Spec, target: Target, unpack: Unpack) -> Self {
        Self {
            inner,
            target,
            unpack,
        }
    }

    pub fn inner(&self) -> &Spec {
        &self.inner
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn unpack(&self) -> Unpack {
        self.unpack
    }

    /// Merges ambient arguments into `converted` and calls the constructor.
    pub(crate) fn construct(
        &self,
        converted: Value,
        ambient: Option<&Ambient>,
    ) -> Result<Value, SchemaError> {
        let arguments = merge_ambient(converted, self.unpack, ambient)
            .map_err(|reason| SchemaError::conversion_failed(self.target.name(), reason))?;

        (self.target.construct)(arguments)
            .map_err(|source| SchemaError::conversion_failed(self.target.name(), source))
    }
}

/// Payload keys win over ambient keywords; ambient positionals go last.
fn merge_ambient(
    converted: Value,
    unpack: Unpack,
    ambient: Option<&Ambient>,
) -> Result<Value, String> {
    let Some(ambient) = ambient.filter(|ambient| !ambient.is_empty()) else {
        return Ok(converted);
    };

    match (unpack, converted) {
        (Unpack::Auto, Value::Object(mut fields)) => {
            if !ambient.args().is_empty() {
                return Err(String::from(
                    "positional ambient arguments cannot be merged into keyword construction",
                ));
            }
            for (name, value) in ambient.kwargs() {
                if !fields.contains_key(name) {
                    fields.insert(name.clone(), value.clone());
                }
            }
            Ok(Value::Object(fields))
        }
        (Unpack::Auto, Value::Array(mut items)) => {
            if !ambient.kwargs().is_empty() {
                return Err(String::from(
                    "keyword ambient arguments cannot be merged into positional construction",
                ));
            }
            items.extend(ambient.args().iter().cloned());
            Ok(Value::Array(items))
        }
        (_, single) => {
            if !ambient.kwargs().is_empty() {
                return Err(String::from(
                    "keyword ambient arguments cannot be merged into single-argument construction",
                ));
            }
            let mut items = Vec::with_capacity(ambient.args().len() + 1);
            items.push(single);
            items.extend(ambient.args().iter().cloned());
            Ok(Value::Array(items))
        }
    }
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_fields_win_over_ambient_keywords() {
        let ambient = Ambient::new().kwarg("bank_id", "ambient").kwarg("extra", 1);

        let merged = merge_ambient(
            json!({"bank_id": "payload"}),
            Unpack::Auto,
            Some(&ambient),
        )
        .expect("keywords merge");

        assert_eq!(merged, json!({"bank_id": "payload", "extra": 1}));
    }

    #[test]
    fn ambient_positionals_follow_payload_elements() {
        let ambient = Ambient::new().arg(3);

        let merged =
            merge_ambient(json!([1, 2]), Unpack::Auto, Some(&ambient)).expect("positional merge");

        assert_eq!(merged, json!([1, 2, 3]));
    }

    #[test]
    fn single_argument_with_ambient_positionals_becomes_a_tuple() {
        let ambient = Ambient::new().arg("node");

        let merged = merge_ambient(json!({"a": 1}), Unpack::Single, Some(&ambient))
            .expect("single merge");

        assert_eq!(merged, json!([{"a": 1}, "node"]));
    }

    #[test]
    fn keywords_cannot_reach_a_positional_constructor() {
        let ambient = Ambient::new().kwarg("bank_id", "x");

        let result = merge_ambient(json!([1]), Unpack::Auto, Some(&ambient));
        assert!(result.is_err());
    }

    #[test]
    fn empty_ambient_leaves_value_untouched() {
        let ambient = Ambient::new();
        let merged = merge_ambient(json!("2.38"), Unpack::Auto, Some(&ambient)).expect("no-op");
        assert_eq!(merged, json!("2.38"));
    }

    #[test]
    fn target_name_is_the_short_type_name() {
        #[derive(serde::Serialize, serde::Deserialize)]
        struct Receipt {
            id: String,
        }

        assert_eq!(Target::of::<Receipt>().name(), "Receipt");
    }
}
