use flatdoc::common::Value;
use flatdoc::doc;
use flatdoc::errors::ErrorKind;
use flatdoc_int_test::test_util::{cleanup, create_test_context, insert_test_documents, run_test};

#[test]
fn test_group_count_per_city() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.db().collection("users")?;
            insert_test_documents(&coll)?;

            let out = coll.aggregate(&[doc! { "$group": { _id: "city", count: { "$sum": 1 } } }])?;
            assert_eq!(
                out,
                vec![
                    doc! { _id: "New York", count: 1 },
                    doc! { _id: "Los Angeles", count: 1 },
                    doc! { _id: "Chicago", count: 1 },
                ]
            );
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_group_total_equals_input_size() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.db().collection("users")?;
            insert_test_documents(&coll)?;
            coll.insert(doc! { name: "Dave", age: 41, city: "Chicago" })?;

            let out = coll.aggregate(&[
                doc! { "$group": { _id: "city", count: { "$sum": 1 } } },
                doc! { "$group": { _id: (Value::Null), totalUsers: { "$sum": "count" } } },
            ])?;
            assert_eq!(out, vec![doc! { _id: (Value::Null), totalUsers: 4 }]);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_group_accumulators() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.db().collection("users")?;
            insert_test_documents(&coll)?;
            coll.insert(doc! { name: "Dave", age: 40, city: "Chicago" })?;

            let out = coll.aggregate(&[doc! {
                "$group": {
                    _id: "$city",
                    total: { "$sum": "$age" },
                    average: { "$avg": "age" },
                    youngest: { "$min": "age" },
                    oldest: { "$max": "age" },
                    members: { "$count": {} },
                }
            }])?;

            let chicago = out
                .iter()
                .find(|d| d.get("_id") == Some(&Value::from("Chicago")))
                .cloned()
                .unwrap_or_default();
            assert_eq!(chicago.get("total"), Some(&Value::I64(62)));
            assert_eq!(chicago.get("average"), Some(&Value::F64(31.0)));
            assert_eq!(
                chicago.get("youngest"),
                Some(&Value::from(doc! { name: "Charlie", age: 22, city: "Chicago" }))
            );
            assert_eq!(
                chicago.get("oldest"),
                Some(&Value::from(doc! { name: "Dave", age: 40, city: "Chicago" }))
            );
            assert_eq!(chicago.get("members"), Some(&Value::I64(2)));
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_group_errors() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.db().collection("users")?;
            insert_test_documents(&coll)?;

            let err = coll
                .aggregate(&[doc! { "$group": { _id: "city", n: { "$push": "name" } } }])
                .unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::UnsupportedOperator);

            let err = coll
                .aggregate(&[doc! { "$group": { _id: 5, n: { "$sum": 1 } } }])
                .unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::InvalidOperation);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}
