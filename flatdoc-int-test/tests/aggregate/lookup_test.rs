use flatdoc::common::Value;
use flatdoc::doc;
use flatdoc_int_test::test_util::{cleanup, create_test_context, run_test};

#[test]
fn test_lookup_joins_matching_records() {
    run_test(
        || create_test_context(),
        |ctx| {
            let users = ctx.db().collection("users")?;
            let orders = ctx.db().collection("orders")?;
            users.insert(doc! { user_id: 1, name: "Alice" })?;
            users.insert(doc! { user_id: 2, name: "Bob" })?;
            orders.insert(doc! { order: "a", owner: 1 })?;
            orders.insert(doc! { order: "b", owner: 1 })?;
            orders.insert(doc! { order: "c", owner: 3 })?;

            let out = users.aggregate(&[doc! {
                "$lookup": {
                    from: "orders",
                    localField: "owner",
                    foreignField: "user_id",
                    "as": "orders",
                }
            }])?;
            assert_eq!(
                out,
                vec![
                    doc! {
                        user_id: 1,
                        name: "Alice",
                        orders: [{ order: "a", owner: 1 }, { order: "b", owner: 1 }]
                    },
                    doc! { user_id: 2, name: "Bob", orders: [] },
                ]
            );
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_lookup_against_missing_collection() {
    run_test(
        || create_test_context(),
        |ctx| {
            let users = ctx.db().collection("users")?;
            users.insert(doc! { user_id: 1 })?;

            let out = users.aggregate(&[doc! {
                "$lookup": {
                    from: "ghosts",
                    localField: "owner",
                    foreignField: "user_id",
                    "as": "haunts",
                }
            }])?;
            assert_eq!(out[0].get("haunts"), Some(&Value::Array(vec![])));
            assert!(!ctx.db().has_collection("ghosts"));
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_lookup_then_unwind() {
    run_test(
        || create_test_context(),
        |ctx| {
            let users = ctx.db().collection("users")?;
            let orders = ctx.db().collection("orders")?;
            users.insert(doc! { user_id: 1, name: "Alice" })?;
            orders.insert(doc! { order: "a", owner: 1 })?;
            orders.insert(doc! { order: "b", owner: 1 })?;

            let out = users.aggregate(&[
                doc! {
                    "$lookup": {
                        from: "orders",
                        localField: "owner",
                        foreignField: "user_id",
                        "as": "order",
                    }
                },
                doc! { "$unwind": "order" },
                doc! { "$project": { user_id: 0 } },
            ])?;
            assert_eq!(
                out,
                vec![
                    doc! { name: "Alice", order: { order: "a", owner: 1 } },
                    doc! { name: "Alice", order: { order: "b", owner: 1 } },
                ]
            );
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}
