use flatdoc::doc;
use flatdoc::errors::ErrorKind;
use flatdoc_int_test::test_util::{
    cleanup, create_test_context, insert_test_documents, names, run_test,
};

#[test]
fn test_delete_all() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.db().collection("users")?;
            insert_test_documents(&coll)?;

            let result = coll.delete(&doc! {})?;
            assert_eq!(result.deleted_count(), 3);
            assert!(coll.find(&doc! {})?.is_empty());
            assert_eq!(ctx.file_json()["users"], serde_json::json!([]));
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_delete_by_operator() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.db().collection("users")?;
            insert_test_documents(&coll)?;

            let result = coll.delete(&doc! { age: { "$lt": 25 } })?;
            assert_eq!(result.deleted_count(), 1);
            assert_eq!(names(coll.find_all().iter()), vec!["Alice", "Bob"]);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_delete_any_operator_of_a_field() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.db().collection("users")?;
            insert_test_documents(&coll)?;

            let query = doc! { age: { "$lt": 23, "$gt": 29 } };
            assert!(coll.find(&query)?.is_empty());

            let result = coll.delete(&query)?;
            assert_eq!(result.deleted_count(), 2);
            assert_eq!(names(coll.find_all().iter()), vec!["Alice"]);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_delete_fields_still_combine_with_and() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.db().collection("users")?;
            insert_test_documents(&coll)?;

            let result = coll.delete(&doc! { age: { "$lt": 40 }, city: "Chicago" })?;
            assert_eq!(result.deleted_count(), 1);
            assert_eq!(names(coll.find_all().iter()), vec!["Alice", "Bob"]);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_delete_nothing() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.db().collection("users")?;
            insert_test_documents(&coll)?;

            let result = coll.delete(&doc! { name: "Nobody" })?;
            assert_eq!(result.deleted_count(), 0);
            assert_eq!(coll.size(), 3);

            let err = coll.delete(&doc! { age: { "$exists": true } }).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::UnsupportedOperator);
            assert_eq!(coll.size(), 3);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}
