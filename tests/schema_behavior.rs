//! Behaviour tests for the validation/transform engine
//!
//! These tests check the guarantees callers rely on when they hand raw node
//! payloads to a spec tree: validation and transformation agree, optional
//! fields collapse to null, and ambient context reaches nested records.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tnb_core::schema::{self, Kind, SchemaErrorKind, Spec, Target, Unpack};
use tnb_core::{Ambient, ConversionContext};

fn trust_record() -> Spec {
    Spec::dict()
        .field("id", Kind::String)
        .field("trust", Kind::Number)
        .build()
        .expect("valid spec")
}

// =============================================================================
// Engine: Validate and Transform Agree
// =============================================================================

#[test]
fn when_validate_accepts_data_transform_succeeds() {
    // Given: A nested spec and a mix of conforming and broken payloads
    let spec = Spec::dict()
        .field("count", Kind::Integer)
        .optional("next", Kind::String)
        .field("results", Spec::list([trust_record()]))
        .build()
        .expect("valid spec");
    let payloads = [
        json!({"count": 1, "next": null, "results": [{"id": "a", "trust": 1.5}]}),
        json!({"count": 0, "results": []}),
        json!({"count": "1", "next": null, "results": []}),
        json!({"count": 1, "next": null, "results": [{"id": "a"}]}),
        json!({"count": 1, "next": null, "results": [], "extra": true}),
        json!([]),
    ];

    for payload in &payloads {
        // When: Both entry points see the same payload
        let valid = schema::validate(&spec, payload);
        let transformed = schema::transform(&spec, payload);

        // Then: They reach the same verdict
        assert_eq!(valid, transformed.is_ok(), "disagreement on {payload}");
    }
}

#[test]
fn when_nullable_receives_null_it_yields_null() {
    // Given: A nullable integer
    let spec = Spec::nullable(Kind::Integer);

    // When/Then: null is accepted and passed through
    assert!(spec.validate(&Value::Null));
    assert_eq!(spec.transform(&Value::Null).expect("null"), Value::Null);
    assert_eq!(spec.transform(&json!(4)).expect("inner"), json!(4));
}

#[test]
fn when_required_field_is_missing_transform_reports_it() {
    // Given: A record needing id and trust
    let spec = trust_record();

    // When: trust is absent
    let error = spec.transform(&json!({"id": "x"})).expect_err("must fail");

    // Then: The missing field is named
    assert!(matches!(
        error.kind(),
        SchemaErrorKind::MissingField { field } if field == "trust"
    ));
}

#[test]
fn when_homogeneous_list_transforms_it_keeps_every_element_in_order() {
    // Given: A list of records
    let spec = Spec::list([trust_record()]);
    let data = json!([
        {"id": "c", "trust": 3.0},
        {"id": "a", "trust": 1.0},
        {"id": "b", "trust": 2.0}
    ]);

    // When: It is transformed
    let out = spec.transform(&data).expect("conforms");

    // Then: Three elements come back in input order
    assert_eq!(out, data);
}

#[test]
fn when_strict_check_sees_another_representation_it_rejects_it() {
    // Given: Strict and loose number checks
    let strict = Spec::strict(Kind::Number);
    let loose = Spec::kind(Kind::Number);

    // When/Then: Integer literals fail only the strict check
    assert!(!strict.validate(&json!(2)));
    assert!(loose.validate(&json!(2)));
    assert!(strict.validate(&json!(2.5)));
}

// =============================================================================
// Engine: Conversion with Ambient Context
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Holder {
    id: String,
    bank_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Ledger {
    holders: Vec<Holder>,
}

#[test]
fn when_scope_supplies_bank_id_every_nested_instance_receives_it() {
    // Given: A ledger whose nested holders need a bank_id from the context
    let holder = Spec::convert(
        Spec::dict().field("id", Kind::String).build().expect("valid"),
        Target::of::<Holder>(),
    );
    let ledger = Spec::convert(
        Spec::dict()
            .field("holders", Spec::list([holder]))
            .build()
            .expect("valid"),
        Target::of::<Ledger>(),
    );
    let ctx = ConversionContext::new().with::<Holder>(Ambient::new().kwarg("bank_id", "X"));

    // When: The ledger is decoded
    let decoded: Ledger = ledger
        .decode_in(&ctx, &json!({"holders": [{"id": "a"}, {"id": "b"}]}))
        .expect("decodes");

    // Then: Every holder carries the ambient bank_id
    assert!(decoded.holders.iter().all(|holder| holder.bank_id == "X"));
    assert_eq!(decoded.holders.len(), 2);
}

#[test]
fn when_payload_and_scope_both_supply_a_key_the_payload_wins() {
    // Given: A payload that already names its bank
    let spec = Spec::convert(
        Spec::dict()
            .field("id", Kind::String)
            .field("bank_id", Kind::String)
            .build()
            .expect("valid"),
        Target::of::<Holder>(),
    );
    let ctx = ConversionContext::new().with::<Holder>(Ambient::new().kwarg("bank_id", "ambient"));

    // When: It is converted under a scope with a different bank_id
    let holder: Holder = spec
        .decode_in(&ctx, &json!({"id": "a", "bank_id": "payload"}))
        .expect("decodes");

    // Then: The payload value is kept
    assert_eq!(holder.bank_id, "payload");
}

#[test]
fn when_scope_is_left_ambient_arguments_no_longer_apply() {
    // Given: A conversion that needs a bank_id
    let spec = Spec::convert(
        Spec::dict().field("id", Kind::String).build().expect("valid"),
        Target::of::<Holder>(),
    );
    let root = ConversionContext::new();
    let data = json!({"id": "a"});

    // When: Converting inside and then outside a scope
    let inside = root.scoped(
        &Target::of::<Holder>(),
        Ambient::new().kwarg("bank_id", "X"),
        |ctx| spec.transform_in(ctx, &data),
    );
    let outside = spec.transform_in(&root, &data);

    // Then: Only the scoped call succeeds
    assert!(inside.is_ok());
    assert!(matches!(
        outside.expect_err("no scope").kind(),
        SchemaErrorKind::ConversionFailed { .. }
    ));
}

#[test]
fn when_single_unpack_is_used_the_whole_value_reaches_the_constructor() {
    // Given: A constructor that wraps whatever it receives
    let target = Target::named("wrap", |value| Ok(json!({ "wrapped": value })));
    let spec = Spec::convert_with(Kind::Object, target.clone(), Unpack::Single);
    let ctx = ConversionContext::new().with_scope(&target, Ambient::new().arg("node-1"));

    // When: An object is converted with an ambient positional argument
    let out = spec.transform_in(&ctx, &json!({"a": 1})).expect("converts");

    // Then: The constructor sees the object followed by the ambient argument
    assert_eq!(out, json!({"wrapped": [{"a": 1}, "node-1"]}));
}

#[test]
fn when_ambient_keywords_meet_a_positional_payload_conversion_fails() {
    // Given: A tuple payload and keyword ambient arguments
    let target = Target::named("pair", Ok);
    let spec = Spec::convert(
        Spec::list([Spec::kind(Kind::String), Spec::kind(Kind::Integer)]),
        target.clone(),
    );
    let ctx = ConversionContext::new().with_scope(&target, Ambient::new().kwarg("bank_id", "X"));

    // When/Then: The merge cannot be expressed
    assert!(!spec.validate_in(&ctx, &json!(["a", 1])));
    assert!(spec.validate(&json!(["a", 1])));
}
