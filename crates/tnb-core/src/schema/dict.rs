use std::collections::HashMap;

use super::{SchemaError, Spec};

/// Object node: ordered fields plus the precomputed check order.
#[derive(Clone)]
pub struct DictSpec {
    fields: Vec<(String, Spec)>,
    index: HashMap<String, usize>,
    check_order: Vec<usize>,
    allow_extra: bool,
}

impl DictSpec {
    /// Fields in declared order, which is also the output key order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Spec)> {
        self.fields.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn allows_extra(&self) -> bool {
        self.allow_extra
    }

    /// Fields in check order, each with its declared position.
    pub(crate) fn check_order(&self) -> impl Iterator<Item = (usize, &str, &Spec)> {
        self.check_order.iter().map(|&position| {
            let (name, spec) = &self.fields[position];
            (position, name.as_str(), spec)
        })
    }
}

/// Builder for [`DictSpec`] nodes.
#[derive(Default)]
pub struct DictBuilder {
    fields: Vec<(String, Spec)>,
    allow_extra: bool,
}

impl DictBuilder {
    pub fn field(mut self, name: impl Into<String>, spec: impl Into<Spec>) -> Self {
        self.fields.push((name.into(), spec.into()));
        self
    }

    /// Shorthand for a field wrapped in [`Spec::nullable`].
    pub fn optional(self, name: impl Into<String>, spec: impl Into<Spec>) -> Self {
        self.field(name, Spec::nullable(spec))
    }

    /// Accept input keys that have no field; they are dropped from the output.
    pub fn allow_extra(mut self) -> Self {
        self.allow_extra = true;
        self
    }

    pub fn build(self) -> Result<Spec, SchemaError> {
        let mut index = HashMap::with_capacity(self.fields.len());
        for (position, (name, _)) in self.fields.iter().enumerate() {
            if name.is_empty() {
                return Err(SchemaError::malformed_spec(format!(
                    "field {position} has an empty name"
                )));
            }
            if index.insert(name.clone(), position).is_some() {
                return Err(SchemaError::malformed_spec(format!(
                    "field '{name}' is declared more than once"
                )));
            }
        }

        let mut check_order = (0..self.fields.len()).collect::<Vec<_>>();
        check_order.sort_by_key(|&position| self.fields[position].1.priority());

        Ok(Spec::from_dict(DictSpec {
            fields: self.fields,
            index,
            check_order,
            allow_extra: self.allow_extra,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Kind, SchemaErrorKind, SpecNode};

    fn dict_of(spec: &Spec) -> &DictSpec {
        match spec.node() {
            SpecNode::Dict(dict) => dict,
            _ => panic!("expected a dict node"),
        }
    }

    #[test]
    fn check_order_puts_nullable_after_plain_and_keeps_declared_ties() {
        let spec = Spec::dict()
            .optional("port", Kind::Integer)
            .field("nested", Spec::dict().build().expect("valid"))
            .field("version", Kind::String)
            .field("protocol", Kind::String)
            .field("node_type", "BANK")
            .build()
            .expect("valid");

        let order = dict_of(&spec)
            .check_order()
            .map(|(_, name, _)| name)
            .collect::<Vec<_>>();

        assert_eq!(
            order,
            vec!["node_type", "version", "protocol", "port", "nested"]
        );
    }

    #[test]
    fn declared_order_is_preserved_for_fields() {
        let spec = Spec::dict()
            .optional("b", Kind::String)
            .field("a", Kind::String)
            .build()
            .expect("valid");

        let names = dict_of(&spec)
            .fields()
            .map(|(name, _)| name)
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn duplicate_field_is_malformed() {
        let error = Spec::dict()
            .field("id", Kind::String)
            .field("id", Kind::Integer)
            .build()
            .err()
            .expect("duplicate must fail");

        assert!(matches!(error.kind(), SchemaErrorKind::MalformedSpec { .. }));
    }

    #[test]
    fn empty_field_name_is_malformed() {
        let error = Spec::dict()
            .field("", Kind::String)
            .build()
            .err()
            .expect("empty name must fail");

        assert!(matches!(error.kind(), SchemaErrorKind::MalformedSpec { .. }));
    }
}
