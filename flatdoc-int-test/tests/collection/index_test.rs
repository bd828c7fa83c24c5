use flatdoc::doc;
use flatdoc_int_test::test_util::{
    cleanup, create_test_context, insert_test_documents, names, run_test,
};

#[test]
fn test_find_uses_index() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.db().collection("users")?;
            insert_test_documents(&coll)?;
            coll.create_index("city");
            assert!(coll.has_index("city"));

            let found = coll.find(&doc! { city: "Los Angeles" })?;
            assert_eq!(names(found.iter()), vec!["Bob"]);

            assert!(coll.find(&doc! { city: "Boston" })?.is_empty());
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_index_is_stale_until_rebuilt() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.db().collection("users")?;
            insert_test_documents(&coll)?;
            coll.create_index("city");

            coll.insert(doc! { name: "Dave", age: 40, city: "New York" })?;
            let found = coll.find(&doc! { city: "New York" })?;
            assert_eq!(names(found.iter()), vec!["Alice"]);

            coll.create_index("city");
            let found = coll.find(&doc! { city: "New York" })?;
            assert_eq!(names(found.iter()), vec!["Alice", "Dave"]);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_index_bucket_ignores_other_fields() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.db().collection("users")?;
            insert_test_documents(&coll)?;
            coll.create_index("city");

            let found = coll.find(&doc! { city: "Chicago", age: 99 })?;
            assert_eq!(names(found.iter()), vec!["Charlie"]);

            assert!(coll.drop_index("city"));
            assert!(coll.find(&doc! { city: "Chicago", age: 99 })?.is_empty());
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_index_shared_between_handles() {
    run_test(
        || create_test_context(),
        |ctx| {
            let first = ctx.db().collection("users")?;
            insert_test_documents(&first)?;
            first.create_index("name");

            let second = ctx.db().collection("users")?;
            assert!(second.has_index("name"));
            assert!(!ctx.db().collection("orders")?.has_index("name"));
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_operator_queries_scan() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.db().collection("users")?;
            insert_test_documents(&coll)?;
            coll.create_index("age");

            coll.insert(doc! { name: "Dave", age: 40 })?;
            let found = coll.find(&doc! { age: { "$gt": 29 } })?;
            assert_eq!(names(found.iter()), vec!["Bob", "Dave"]);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}
