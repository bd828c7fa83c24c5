use flatdoc::aggregate::Stage;
use flatdoc::common::SortOrder;
use flatdoc::doc;
use flatdoc::errors::ErrorKind;
use flatdoc_int_test::test_util::{
    cleanup, create_test_context, insert_test_documents, names, run_test,
};

#[test]
fn test_match_sort_project() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.db().collection("users")?;
            insert_test_documents(&coll)?;

            let out = coll.aggregate(&[
                doc! { "$match": { age: { "$gte": 22 } } },
                doc! { "$sort": { age: (-1) } },
                doc! { "$project": { city: 0 } },
            ])?;
            assert_eq!(
                out,
                vec![
                    doc! { name: "Bob", age: 30 },
                    doc! { name: "Alice", age: 25 },
                    doc! { name: "Charlie", age: 22 },
                ]
            );
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_limit_and_skip_partition_the_input() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.db().collection("users")?;
            insert_test_documents(&coll)?;
            let all = coll.find_all().documents();

            for k in 0..=all.len() {
                let mut head = coll.aggregate(&[doc! { "$limit": (k) }])?;
                let tail = coll.aggregate(&[doc! { "$skip": (k) }])?;
                head.extend(tail);
                assert_eq!(head, all);
            }

            assert!(coll.aggregate(&[doc! { "$limit": (-2) }])?.is_empty());
            assert_eq!(coll.aggregate(&[doc! { "$skip": (-2) }])?.len(), 3);
            assert_eq!(coll.aggregate(&[doc! { "$limit": 10 }])?.len(), 3);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_unwind_and_count() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.db().collection("orders")?;
            coll.insert(doc! { id: 1, items: ["apple", "pear"] })?;
            coll.insert(doc! { id: 2, items: [] })?;
            coll.insert(doc! { id: 3 })?;

            let out = coll.aggregate(&[doc! { "$unwind": "$items" }])?;
            assert_eq!(
                out,
                vec![doc! { id: 1, items: "apple" }, doc! { id: 1, items: "pear" }]
            );

            let out = coll.aggregate(&[
                doc! { "$unwind": { path: "items" } },
                doc! { "$count": "lines" },
            ])?;
            assert_eq!(out, vec![doc! { lines: 2 }]);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_typed_stages() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.db().collection("users")?;
            insert_test_documents(&coll)?;

            let out = coll.aggregate_stages(&[
                Stage::Sort(vec![("name".to_string(), SortOrder::Descending)]),
                Stage::Limit(2),
            ]);
            assert_eq!(names(out.iter()), vec!["Charlie", "Bob"]);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_pipeline_does_not_mutate() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.db().collection("users")?;
            insert_test_documents(&coll)?;
            let before = std::fs::read_to_string(ctx.path()).unwrap_or_default();

            coll.aggregate(&[doc! { "$project": { name: 0, age: 0, city: 0 } }])?;
            assert_eq!(coll.find(&doc! { name: "Alice" })?.len(), 1);
            assert_eq!(std::fs::read_to_string(ctx.path()).unwrap_or_default(), before);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_unknown_stage_fails_whole_pipeline() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.db().collection("users")?;
            insert_test_documents(&coll)?;

            let err = coll
                .aggregate(&[doc! { "$limit": 1 }, doc! { "$bucket": { groupBy: "age" } }])
                .unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::UnknownStage);

            let err = coll
                .aggregate(&[doc! { "$limit": 1, "$skip": 1 }])
                .unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::InvalidOperation);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}
