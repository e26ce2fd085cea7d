use serde_json::{Map, Value};

use super::{DictSpec, Kind, SchemaError, Spec, SpecNode};
use crate::context::ConversionContext;

/// Validation walks the same dispatch as [`transform`] and discards the
/// output, so a value that checks cleanly always transforms.
pub(crate) fn check(spec: &Spec, ctx: &ConversionContext, data: &Value) -> Result<(), SchemaError> {
    transform(spec, ctx, data).map(drop)
}

pub(crate) fn transform(
    spec: &Spec,
    ctx: &ConversionContext,
    data: &Value,
) -> Result<Value, SchemaError> {
    match spec.node() {
        SpecNode::Ignore => Ok(data.clone()),
        SpecNode::Const(expected) => {
            if expected == data {
                Ok(data.clone())
            } else {
                Err(SchemaError::const_mismatch(expected, data))
            }
        }
        SpecNode::Fn(func) => func.call(data),
        SpecNode::Type { kind, strict } => {
            if kind.matches(data, *strict) {
                Ok(data.clone())
            } else {
                Err(SchemaError::type_mismatch(*kind, *strict, data))
            }
        }
        SpecNode::Dict(dict) => transform_dict(dict, ctx, data),
        SpecNode::List(items) => transform_list(items, ctx, data),
        SpecNode::Nullable(inner) => {
            if data.is_null() {
                Ok(Value::Null)
            } else {
                transform(inner, ctx, data)
            }
        }
        SpecNode::Convert(convert) => {
            let converted = transform(convert.inner(), ctx, data)?;
            convert.construct(converted, ctx.lookup(convert.target().key()))
        }
    }
}

fn transform_dict(
    dict: &DictSpec,
    ctx: &ConversionContext,
    data: &Value,
) -> Result<Value, SchemaError> {
    let Value::Object(input) = data else {
        return Err(SchemaError::type_mismatch(Kind::Object, false, data));
    };

    if !dict.allows_extra() {
        if let Some(extra) = input.keys().find(|key| !dict.contains(key)) {
            return Err(SchemaError::unexpected_field(extra.as_str()));
        }
    }

    let mut slots: Vec<Option<Value>> = vec![None; dict.len()];
    for (position, name, field) in dict.check_order() {
        let value = match input.get(name) {
            Some(value) => transform(field, ctx, value).map_err(|error| error.at_key(name))?,
            None if field.is_nullable() => Value::Null,
            None => return Err(SchemaError::missing_field(name)),
        };
        slots[position] = Some(value);
    }

    let mut output = Map::with_capacity(dict.len());
    for ((name, _), slot) in dict.fields().zip(slots) {
        let Some(value) = slot else {
            return Err(SchemaError::missing_field(name));
        };
        output.insert(name.to_owned(), value);
    }
    Ok(Value::Object(output))
}

fn transform_list(
    items: &[Spec],
    ctx: &ConversionContext,
    data: &Value,
) -> Result<Value, SchemaError> {
    let Value::Array(elements) = data else {
        return Err(SchemaError::type_mismatch(Kind::Array, false, data));
    };

    match items {
        [item] => elements
            .iter()
            .enumerate()
            .map(|(index, element)| {
                transform(item, ctx, element).map_err(|error| error.at_index(index))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        positional => {
            if positional.len() != elements.len() {
                return Err(SchemaError::length_mismatch(
                    positional.len(),
                    elements.len(),
                ));
            }
            positional
                .iter()
                .zip(elements)
                .enumerate()
                .map(|(index, (item, element))| {
                    transform(item, ctx, element).map_err(|error| error.at_index(index))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array)
        }
    }
}
