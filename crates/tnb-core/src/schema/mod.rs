//! # Schema engine
//!
//! Resolved spec trees and the validate/transform walker that converts raw
//! JSON payloads into typed records.
//!
//! ## Nodes
//!
//! | Builder | Node | Accepts |
//! |---------|------|---------|
//! | [`Spec::ignore`] | `Ignore` | anything, passed through |
//! | [`Spec::constant`], `From<&str>`, `From<i64>`… | `Const` | exactly the literal |
//! | [`Spec::func`] | `Fn` | whatever the function accepts |
//! | [`Spec::kind`], [`Spec::strict`], `From<Kind>` | `Type` | values of a JSON kind |
//! | [`Spec::dict`] | `Dict` | objects with the declared fields |
//! | [`Spec::list`], `From<Vec<Spec>>` | `List` | homogeneous arrays or positional tuples |
//! | [`Spec::nullable`] | `Nullable` | `null`, an absent field, or the inner spec |
//! | [`Spec::convert`] | `Convert` | the inner spec, then constructs a [`Target`] |
//!
//! Builders produce resolved nodes directly. A tree is immutable and shares
//! its nodes, so a sub-schema can be embedded in any number of parents.
//!
//! ## Example
//!
//! ```rust
//! use serde_json::json;
//! use tnb_core::schema::{Kind, Spec};
//!
//! let spec = Spec::dict()
//!     .field("id", Kind::String)
//!     .optional("memo", Kind::String)
//!     .build()
//!     .expect("valid spec");
//!
//! let out = spec.transform(&json!({"id": "a"})).expect("conforms");
//! assert_eq!(out, json!({"id": "a", "memo": null}));
//! ```

mod convert;
mod dict;
mod engine;
mod error;

use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::context::ConversionContext;

pub use convert::{ConvertSpec, Target, Unpack};
pub use dict::{DictBuilder, DictSpec};
pub use error::{BoxError, FieldPath, PathSegment, SchemaError, SchemaErrorKind};

/// JSON value kinds understood by type checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    Bool,
    Integer,
    Number,
    String,
    Array,
    Object,
}

impl Kind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }

    /// Exact kind of a value. Numbers with an integer representation report `Integer`.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Bool,
            Value::Number(number) if number.is_i64() || number.is_u64() => Self::Integer,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }

    /// Instance check. Loose checks let any number pass as `Number` and whole
    /// floats pass as `Integer`; strict checks require the exact representation.
    pub fn matches(self, value: &Value, strict: bool) -> bool {
        match (self, value) {
            (Self::Integer, Value::Number(number)) => {
                number.is_i64()
                    || number.is_u64()
                    || (!strict
                        && number
                            .as_f64()
                            .is_some_and(|float| float.is_finite() && float.fract() == 0.0))
            }
            (Self::Number, Value::Number(number)) => !strict || number.is_f64(),
            _ => Self::of(value) == self,
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

type TransformFn = dyn Fn(&Value) -> Result<Value, BoxError> + Send + Sync;

/// Named value-to-value function node.
#[derive(Clone)]
pub struct FnSpec {
    name: String,
    func: Arc<TransformFn>,
}

impl FnSpec {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn call(&self, data: &Value) -> Result<Value, SchemaError> {
        (self.func)(data).map_err(|source| SchemaError::conversion_failed(&self.name, source))
    }
}

/// Resolved node of a spec tree.
pub enum SpecNode {
    Ignore,
    Const(Value),
    Fn(FnSpec),
    Type { kind: Kind, strict: bool },
    Dict(DictSpec),
    List(Vec<Spec>),
    Nullable(Spec),
    Convert(ConvertSpec),
}

/// Shared handle to a resolved spec tree.
#[derive(Clone)]
pub struct Spec {
    node: Arc<SpecNode>,
}

impl Spec {
    fn from_node(node: SpecNode) -> Self {
        Self {
            node: Arc::new(node),
        }
    }

    pub fn ignore() -> Self {
        Self::from_node(SpecNode::Ignore)
    }

    pub fn constant(value: impl Into<Value>) -> Self {
        Self::from_node(SpecNode::Const(value.into()))
    }

    pub fn func<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        Self::from_node(SpecNode::Fn(FnSpec {
            name: name.into(),
            func: Arc::new(func),
        }))
    }

    pub fn kind(kind: Kind) -> Self {
        Self::from_node(SpecNode::Type {
            kind,
            strict: false,
        })
    }

    pub fn strict(kind: Kind) -> Self {
        Self::from_node(SpecNode::Type { kind, strict: true })
    }

    pub fn dict() -> DictBuilder {
        DictBuilder::default()
    }

    /// One item spec describes a homogeneous array; several describe a
    /// positional tuple of exactly that length.
    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Spec>,
    {
        Self::from_node(SpecNode::List(items.into_iter().map(Into::into).collect()))
    }

    pub fn nullable(inner: impl Into<Spec>) -> Self {
        Self::from_node(SpecNode::Nullable(inner.into()))
    }

    pub fn convert(inner: impl Into<Spec>, target: Target) -> Self {
        Self::convert_with(inner, target, Unpack::Auto)
    }

    pub fn convert_with(inner: impl Into<Spec>, target: Target, unpack: Unpack) -> Self {
        Self::from_node(SpecNode::Convert(ConvertSpec::new(
            inner.into(),
            target,
            unpack,
        )))
    }

    pub(crate) fn from_dict(dict: DictSpec) -> Self {
        Self::from_node(SpecNode::Dict(dict))
    }

    pub fn node(&self) -> &SpecNode {
        &self.node
    }

    pub fn is_nullable(&self) -> bool {
        matches!(self.node(), SpecNode::Nullable(_))
    }

    /// Check-order rank inside a dict; a nullable node sorts right after its inner node.
    pub(crate) fn priority(&self) -> u8 {
        match self.node() {
            SpecNode::Ignore => 0,
            SpecNode::Const(_) => 2,
            SpecNode::Fn(_) => 4,
            SpecNode::Convert(_) => 6,
            SpecNode::Type { .. } => 8,
            SpecNode::Dict(_) => 10,
            SpecNode::List(_) => 12,
            SpecNode::Nullable(inner) => inner.priority() | 1,
        }
    }

    pub fn validate(&self, data: &Value) -> bool {
        self.validate_in(&ConversionContext::new(), data)
    }

    pub fn validate_in(&self, ctx: &ConversionContext, data: &Value) -> bool {
        self.check_in(ctx, data).is_ok()
    }

    /// Validation that reports the first failure instead of a bare `false`.
    pub fn check_in(&self, ctx: &ConversionContext, data: &Value) -> Result<(), SchemaError> {
        engine::check(self, ctx, data)
    }

    pub fn transform(&self, data: &Value) -> Result<Value, SchemaError> {
        self.transform_in(&ConversionContext::new(), data)
    }

    pub fn transform_in(&self, ctx: &ConversionContext, data: &Value) -> Result<Value, SchemaError> {
        engine::transform(self, ctx, data)
    }

    /// Transforms `data` and deserializes the result into `T`.
    pub fn decode_in<T>(&self, ctx: &ConversionContext, data: &Value) -> Result<T, SchemaError>
    where
        T: DeserializeOwned,
    {
        let value = self.transform_in(ctx, data)?;
        serde_json::from_value(value)
            .map_err(|error| SchemaError::conversion_failed(std::any::type_name::<T>(), error))
    }
}

impl Debug for Spec {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.node() {
            SpecNode::Ignore => f.write_str("Ignore"),
            SpecNode::Const(value) => write!(f, "Const[{value}]"),
            SpecNode::Fn(func) => write!(f, "Fn[{}]", func.name()),
            SpecNode::Type { kind, strict } => {
                write!(f, "Type[{}{kind}]", if *strict { "*" } else { "" })
            }
            SpecNode::Dict(dict) => {
                let mut map = f.debug_map();
                for (name, spec) in dict.fields() {
                    map.entry(&name, spec);
                }
                map.finish()
            }
            SpecNode::List(items) => f.debug_list().entries(items).finish(),
            SpecNode::Nullable(inner) => write!(f, "Nullable[{inner:?}]"),
            SpecNode::Convert(convert) => {
                write!(f, "Convert[{:?} -> {}]", convert.inner(), convert.target().name())
            }
        }
    }
}

impl From<Kind> for Spec {
    fn from(kind: Kind) -> Self {
        Self::kind(kind)
    }
}

impl From<&Spec> for Spec {
    fn from(spec: &Spec) -> Self {
        spec.clone()
    }
}

impl From<Vec<Spec>> for Spec {
    fn from(items: Vec<Spec>) -> Self {
        Self::list(items)
    }
}

impl From<Value> for Spec {
    fn from(value: Value) -> Self {
        Self::constant(value)
    }
}

impl From<&str> for Spec {
    fn from(value: &str) -> Self {
        Self::constant(value)
    }
}

impl From<String> for Spec {
    fn from(value: String) -> Self {
        Self::constant(value)
    }
}

impl From<i64> for Spec {
    fn from(value: i64) -> Self {
        Self::constant(value)
    }
}

impl From<u64> for Spec {
    fn from(value: u64) -> Self {
        Self::constant(value)
    }
}

impl From<bool> for Spec {
    fn from(value: bool) -> Self {
        Self::constant(value)
    }
}

/// Structural check of `data` against `spec` with an empty conversion context.
pub fn validate(spec: &Spec, data: &Value) -> bool {
    spec.validate(data)
}

/// Converts `data` through `spec` with an empty conversion context.
pub fn transform(spec: &Spec, data: &Value) -> Result<Value, SchemaError> {
    spec.transform(data)
}
