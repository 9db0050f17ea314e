use super::*;
use serde_json::json;

fn registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    register_builtins(&mut registry, Arc::new(RecordStore::seeded()));
    registry
}

#[test]
fn test_all_tools_registered() {
    assert_eq!(
        registry().list_names(),
        vec![
            "create_ticket",
            "get_customer",
            "get_customer_history",
            "list_customers",
            "list_tickets",
            "reset_db",
            "update_customer",
        ]
    );
}

#[tokio::test]
async fn test_get_customer() {
    let result = registry()
        .call("get_customer", json!({"customer_id": 1}))
        .await;
    assert_eq!(result["status"], "ok");
    assert_eq!(result["customer"]["email"], "john.doe@example.com");

    let missing = registry()
        .call("get_customer", json!({"customer_id": 404}))
        .await;
    assert_eq!(
        missing,
        json!({"status": "error", "error": "customer 404 not found"})
    );
}

#[tokio::test]
async fn test_get_customer_requires_id() {
    let result = registry().call("get_customer", json!({})).await;
    assert_eq!(result["status"], "error");
    assert!(result["error"]
        .as_str()
        .unwrap()
        .starts_with("invalid input"));
}

#[tokio::test]
async fn test_list_customers_defaults_and_filters() {
    let registry = registry();

    let all = registry.call("list_customers", json!({})).await;
    assert_eq!(all["customers"].as_array().unwrap().len(), 6);

    let active_premium = registry
        .call("list_customers", json!({"status": "active", "tier": "premium"}))
        .await;
    assert_eq!(active_premium["customers"][0]["id"], 1);
    assert_eq!(active_premium["customers"].as_array().unwrap().len(), 1);

    let bad = registry
        .call("list_customers", json!({"status": "sleeping"}))
        .await;
    assert_eq!(bad["status"], "error");
}

#[tokio::test]
async fn test_update_customer_then_reset() {
    let registry = registry();

    let updated = registry
        .call(
            "update_customer",
            json!({"customer_id": 1, "data": {"email": "new@email.com", "tier": "enterprise"}}),
        )
        .await;
    assert_eq!(updated["status"], "ok");
    assert_eq!(updated["customer"]["email"], "new@email.com");
    assert_eq!(updated["customer"]["tier"], "enterprise");

    let reset = registry.call("reset_db", json!({})).await;
    assert_eq!(reset["message"], "Database reset completed");

    let fetched = registry
        .call("get_customer", json!({"customer_id": 1}))
        .await;
    assert_eq!(fetched["customer"]["email"], "john.doe@example.com");
}

#[tokio::test]
async fn test_ticket_tools() {
    let registry = registry();

    let created = registry
        .call(
            "create_ticket",
            json!({"customer_id": 3, "issue": "Refund for duplicate charge"}),
        )
        .await;
    assert_eq!(created["ticket"]["priority"], "medium");
    assert_eq!(created["ticket"]["status"], "open");

    let history = registry
        .call("get_customer_history", json!({"customer_id": 3}))
        .await;
    assert_eq!(history["history"].as_array().unwrap().len(), 1);

    let open = registry
        .call(
            "list_tickets",
            json!({"customer_ids": [1, 2, 3], "status": "open"}),
        )
        .await;
    let ids: Vec<i64> = open["tickets"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|t| t["id"].as_i64())
        .collect();
    assert_eq!(ids, vec![1, 7]);
}

#[test]
fn test_reset_restores_seed() {
    let store = Arc::new(RecordStore::seeded());
    let mut registry = ToolRegistry::new();
    register_builtins(&mut registry, store.clone());

    tokio_test::block_on(async {
        let updated = registry
            .call(
                "update_customer",
                json!({"customer_id": 2, "data": {"email": "changed@example.com"}}),
            )
            .await;
        assert_eq!(updated["customer"]["email"], "changed@example.com");

        let reset = registry.call("reset_db", json!({})).await;
        assert_eq!(reset["message"], "Database reset completed");

        let customer = tokio_test::assert_ok!(store.customer(2).await);
        assert_ne!(customer.email, "changed@example.com");
    });
}
