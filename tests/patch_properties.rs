//! Property tests for the patch and pagination paths of the handler.

mod common;

use common::{local_handler, user_attributes};
use proptest::prelude::*;
use scim_provisioner::error::ScimError;
use scim_provisioner::providers::{ListRequestParams, PatchOperation, ResourceHandler};
use serde_json::{Value, json};

fn patch_value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        "[a-zA-Z0-9 ]{0,20}".prop_map(|s| json!(s)),
        any::<i32>().prop_map(|n| json!(n)),
        any::<bool>().prop_map(|b| json!(b)),
        Just(json!({"givenName": "Barbara", "middleName": null})),
        Just(json!(["item1", "item2"])),
    ]
}

fn patch_operation_strategy() -> impl Strategy<Value = PatchOperation> {
    let path = prop_oneof![
        Just("displayName"),
        Just("nickName"),
        Just("title"),
        Just("name"),
        Just("id"),
        Just("meta.version"),
    ];
    (0..3u8, path, patch_value_strategy()).prop_map(|(op, path, value)| match op {
        0 => PatchOperation::add(path, value),
        1 => PatchOperation::replace(path, value),
        _ => PatchOperation::remove(path),
    })
}

fn touches_readonly(operations: &[PatchOperation]) -> bool {
    operations
        .iter()
        .any(|operation| operation.path == "id" || operation.path.starts_with("meta"))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_patch_is_all_or_nothing(
        operations in prop::collection::vec(patch_operation_strategy(), 1..5)
    ) {
        tokio_test::block_on(async {
            let handler = local_handler();
            let created = handler.create(user_attributes("bjensen")).await.unwrap();

            match handler.patch(&created.id, &operations).await {
                Ok(patched) => {
                    assert!(!touches_readonly(&operations));
                    assert_eq!(patched.id, created.id);
                    assert!(patched.meta.version.ends_with(".patch"));
                    assert!(patched.attributes.values().all(|value| !value.is_null()));

                    let fetched = handler.get(&created.id).await.unwrap();
                    assert_eq!(fetched.attributes, patched.attributes);
                }
                Err(error) => {
                    assert!(touches_readonly(&operations));
                    assert!(matches!(error, ScimError::InvalidPatch { .. }));

                    let fetched = handler.get(&created.id).await.unwrap();
                    assert_eq!(fetched.attributes, created.attributes);
                    assert_eq!(fetched.meta.version, created.meta.version);
                }
            }
        });
    }

    #[test]
    fn test_pagination_window(total in 0usize..25, start_index in 0usize..30, count in 0usize..15) {
        tokio_test::block_on(async {
            let handler = local_handler();
            for i in 0..total {
                handler.create(user_attributes(&format!("user{}", i))).await.unwrap();
            }

            let page = handler
                .get_all(&ListRequestParams::new(start_index, count))
                .await
                .unwrap();

            let from = start_index.saturating_sub(1);
            let expected = if from >= total { 0 } else { count.min(total - from) };
            assert_eq!(page.total_results, total);
            assert_eq!(page.resources.len(), expected);
            if expected > 0 {
                assert_eq!(
                    page.resources[0].get_username(),
                    Some(format!("user{}", from).as_str())
                );
            }
        });
    }
}
