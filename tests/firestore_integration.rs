// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore round-trip tests (require the emulator).

use dayplan_tracker::models::{CatalogEntryDoc, CompletionDoc, PlanDoc, PlannedActivity};
use std::collections::HashMap;

mod common;

#[tokio::test]
async fn test_plan_upsert_round_trip() {
    require_emulator!();
    let db = common::test_db().await;
    let user_id = "it-plan-user";

    let doc = PlanDoc {
        user_id: user_id.to_string(),
        date: "2026-02-14".to_string(),
        activities: vec![
            PlannedActivity {
                id: "1".to_string(),
                name: "Run".to_string(),
            },
            PlannedActivity {
                id: "2".to_string(),
                name: "Read".to_string(),
            },
        ],
    };
    db.upsert_plan(&doc).await.expect("upsert plan");

    let plans = db.get_plans(user_id).await.expect("get plans");
    let stored = plans.iter().find(|p| p.date == "2026-02-14").unwrap();
    assert_eq!(stored.activities, doc.activities);

    // Upsert replaces the row for the same (user, date).
    let replaced = PlanDoc {
        activities: vec![doc.activities[1].clone()],
        ..doc.clone()
    };
    db.upsert_plan(&replaced).await.expect("replace plan");
    let plans = db.get_plans(user_id).await.expect("get plans again");
    let stored = plans.iter().find(|p| p.date == "2026-02-14").unwrap();
    assert_eq!(stored.activities.len(), 1);

    db.delete_plans_for_user(user_id).await.expect("cleanup");
}

#[tokio::test]
async fn test_completion_upsert_round_trip() {
    require_emulator!();
    let db = common::test_db().await;
    let user_id = "it-completion-user";

    let mut completion_data = HashMap::new();
    completion_data.insert("1".to_string(), true);
    completion_data.insert("2".to_string(), false);

    let doc = CompletionDoc {
        user_id: user_id.to_string(),
        date: "2026-02-14".to_string(),
        completion_data,
    };
    db.upsert_completion(&doc).await.expect("upsert completion");

    let rows = db.get_completions(user_id).await.expect("get completions");
    let stored = rows.iter().find(|c| c.date == "2026-02-14").unwrap();
    assert_eq!(stored.completion_data.get("1"), Some(&true));
    assert_eq!(stored.completion_data.get("2"), Some(&false));

    db.delete_completions_for_user(user_id)
        .await
        .expect("cleanup");
}

#[tokio::test]
async fn test_reset_deletes_all_three_tables() {
    require_emulator!();
    let db = common::test_db().await;
    let user_id = "it-reset-user";

    db.insert_catalog_entry(&CatalogEntryDoc {
        user_id: user_id.to_string(),
        activity_name: "Run".to_string(),
    })
    .await
    .expect("insert catalog");
    db.upsert_plan(&PlanDoc {
        user_id: user_id.to_string(),
        date: "2026-02-14".to_string(),
        activities: vec![],
    })
    .await
    .expect("upsert plan");
    db.upsert_completion(&CompletionDoc {
        user_id: user_id.to_string(),
        date: "2026-02-14".to_string(),
        completion_data: HashMap::new(),
    })
    .await
    .expect("upsert completion");

    assert!(db.delete_catalog_for_user(user_id).await.expect("catalog") >= 1);
    assert!(db.delete_plans_for_user(user_id).await.expect("plans") >= 1);
    assert!(
        db.delete_completions_for_user(user_id)
            .await
            .expect("completions")
            >= 1
    );

    assert!(db.get_catalog(user_id).await.expect("catalog").is_empty());
    assert!(db.get_plans(user_id).await.expect("plans").is_empty());
    assert!(db
        .get_completions(user_id)
        .await
        .expect("completions")
        .is_empty());
}

#[tokio::test]
async fn test_catalog_insert_is_idempotent() {
    require_emulator!();
    let db = common::test_db().await;
    let user_id = "it-catalog-user";

    let entry = CatalogEntryDoc {
        user_id: user_id.to_string(),
        activity_name: "Morning Run".to_string(),
    };
    db.insert_catalog_entry(&entry).await.expect("first insert");
    db.insert_catalog_entry(&entry).await.expect("second insert");

    let rows = db.get_catalog(user_id).await.expect("get catalog");
    assert_eq!(rows.len(), 1);

    db.delete_catalog_for_user(user_id).await.expect("cleanup");
}
