use flatdoc::doc;
use flatdoc_int_test::test_util::{
    cleanup, create_test_context, insert_test_documents, names, run_test,
};

#[test]
fn test_insert_keeps_order() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.db().collection("users")?;
            insert_test_documents(&coll)?;

            assert_eq!(coll.size(), 3);
            let all = coll.find_all();
            assert_eq!(names(all.iter()), vec!["Alice", "Bob", "Charlie"]);
            assert_eq!(
                all.first().map(|d| d.fields().to_vec()),
                Some(vec!["name".to_string(), "age".to_string(), "city".to_string()])
            );
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_insert_returns_record() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.db().collection("users")?;
            let inserted = coll.insert(doc! { name: "Alice", tags: ["a", "b"] })?;
            assert_eq!(inserted, doc! { name: "Alice", tags: ["a", "b"] });
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_insert_flushes_to_file() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.db().collection("users")?;
            coll.insert(doc! { name: "Alice", age: 25 })?;

            let json = ctx.file_json();
            assert_eq!(json["users"][0]["name"], "Alice");
            assert_eq!(json["users"][0]["age"], 25);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_duplicates_are_allowed() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.db().collection("users")?;
            coll.insert(doc! { name: "Alice" })?;
            coll.insert(doc! { name: "Alice" })?;
            assert_eq!(coll.find(&doc! { name: "Alice" })?.len(), 2);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}
