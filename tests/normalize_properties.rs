//! Property tests for document normalization.

use proptest::prelude::*;
use scim_provisioner::resource::normalize::{prune_nulls, to_document, to_resource};
use scim_provisioner::resource::{Attributes, Meta, Resource};
use serde_json::{Map, Value, json};

fn arb_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        "[a-z]{0,8}".prop_map(Value::String),
    ]
}

fn arb_value() -> impl Strategy<Value = Value> {
    arb_leaf().prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                .prop_map(|entries| Value::Object(entries.into_iter().collect())),
        ]
    })
}

fn arb_attributes() -> impl Strategy<Value = Attributes> {
    prop::collection::btree_map("[a-zA-Z]{1,8}", arb_value(), 0..6)
        .prop_map(|entries| entries.into_iter().collect::<Map<String, Value>>())
}

/// True when an object reachable through objects, or through objects held in
/// arrays, carries a null value.
fn has_reachable_null(attributes: &Attributes) -> bool {
    attributes.values().any(|value| match value {
        Value::Null => true,
        Value::Object(nested) => has_reachable_null(nested),
        Value::Array(items) => items.iter().any(|item| match item {
            Value::Object(element) => has_reachable_null(element),
            _ => false,
        }),
        _ => false,
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prune_nulls_removes_every_reachable_null(mut attributes in arb_attributes()) {
        prune_nulls(&mut attributes);
        prop_assert!(!has_reachable_null(&attributes));
    }

    #[test]
    fn prune_nulls_is_idempotent(mut attributes in arb_attributes()) {
        prune_nulls(&mut attributes);
        let once = attributes.clone();
        prune_nulls(&mut attributes);
        prop_assert_eq!(once, attributes);
    }

    #[test]
    fn normalized_resources_never_carry_reserved_keys(attributes in arb_attributes()) {
        let mut document = attributes;
        document.insert("id".to_string(), json!("2819c223"));
        document.insert("_id".to_string(), json!(7));

        let resource = to_resource(document);
        prop_assert_eq!(resource.id.as_str(), "2819c223");
        for key in ["id", "externalId", "meta", "_id"] {
            prop_assert!(resource.get_attribute(key).is_none());
        }
        prop_assert!(!has_reachable_null(&resource.attributes));
    }

    #[test]
    fn document_round_trip_preserves_resources(mut attributes in arb_attributes()) {
        for key in ["id", "externalId", "meta", "_id"] {
            attributes.remove(key);
        }
        prune_nulls(&mut attributes);

        let resource = Resource {
            id: "2819c223".to_string(),
            external_id: Some("hr-1".to_string()),
            attributes,
            meta: Meta {
                resource_type: "User".to_string(),
                location: "Users/2819c223".to_string(),
                ..Meta::default()
            },
        };
        let restored = to_resource(to_document(&resource, "User"));
        prop_assert_eq!(restored, resource);
    }
}
