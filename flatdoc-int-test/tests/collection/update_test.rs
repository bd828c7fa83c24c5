use flatdoc::common::Value;
use flatdoc::doc;
use flatdoc_int_test::test_util::{
    cleanup, create_test_context, insert_test_documents, names, run_test,
};

#[test]
fn test_update_only_matched_records() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.db().collection("users")?;
            insert_test_documents(&coll)?;

            let result = coll.update(&doc! { age: { "$gte": 25 } }, &doc! { status: "senior" })?;
            assert_eq!(result.matched_count(), 2);
            assert_eq!(result.matched_count(), result.modified_count());

            let seniors = coll.find(&doc! { status: "senior" })?;
            assert_eq!(names(seniors.iter()), vec!["Alice", "Bob"]);

            let charlie = coll.find(&doc! { name: "Charlie" })?;
            assert_eq!(
                charlie.documents(),
                vec![doc! { name: "Charlie", age: 22, city: "Chicago" }]
            );
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_update_is_shallow_merge() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.db().collection("users")?;
            coll.insert(doc! { name: "Alice", address: { city: "Paris", zip: 75001 } })?;

            coll.update(&doc! { name: "Alice" }, &doc! { address: { city: "Lyon" } })?;
            let found = coll.find(&doc! { name: "Alice" })?;
            assert_eq!(found.documents(), vec![doc! { name: "Alice", address: { city: "Lyon" } }]);
            assert_eq!(
                found.first().map(|d| d.fields().to_vec()),
                Some(vec!["name".to_string(), "address".to_string()])
            );
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_update_counts_unchanged_matches() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.db().collection("users")?;
            insert_test_documents(&coll)?;

            let result = coll.update(&doc! { name: "Alice" }, &doc! { age: 25 })?;
            assert_eq!(result.matched_count(), 1);
            assert_eq!(result.modified_count(), 1);

            let result = coll.update(&doc! { name: "Nobody" }, &doc! { age: 1 })?;
            assert_eq!(result.matched_count(), 0);
            assert_eq!(result.modified_count(), 0);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_update_persists() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.db().collection("users")?;
            insert_test_documents(&coll)?;
            coll.update(&doc! { name: "Bob" }, &doc! { age: 31 })?;

            assert_eq!(ctx.file_json()["users"][1]["age"], 31);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_update_through_find_result() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.db().collection("users")?;
            insert_test_documents(&coll)?;

            let mut found = coll.find(&doc! { city: { "$in": ["Chicago", "New York"] } })?;
            let result = found.update(&doc! { region: "east" })?;
            assert_eq!(result.matched_count(), 2);
            assert_eq!(result.modified_count(), 2);
            assert!(found.iter().all(|d| d.get("region") == Some(&Value::from("east"))));

            let east = coll.find(&doc! { region: "east" })?;
            assert_eq!(names(east.iter()), vec!["Alice", "Charlie"]);
            assert_eq!(ctx.file_json()["users"][2]["region"], "east");
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}
