use flatdoc::common::Value;
use flatdoc::doc;
use flatdoc::schema::Schema;
use flatdoc_int_test::test_util::{
    cleanup, create_test_context, insert_test_documents, names, run_test,
};

#[test]
fn test_users_walkthrough() {
    run_test(
        || create_test_context(),
        |ctx| {
            let users = ctx.db().collection("users")?;
            insert_test_documents(&users)?;

            let adults = users.find(&doc! { age: { "$gte": 25 } })?;
            assert_eq!(
                adults.documents(),
                vec![
                    doc! { name: "Alice", age: 25, city: "New York" },
                    doc! { name: "Bob", age: 30, city: "Los Angeles" },
                ]
            );

            let by_city =
                users.aggregate(&[doc! { "$group": { _id: "city", count: { "$sum": 1 } } }])?;
            assert_eq!(by_city.len(), 3);
            assert!(by_city.iter().all(|g| g.get("count") == Some(&Value::I64(1))));

            let deleted = users.delete(&doc! { age: { "$lt": 25 } })?;
            assert_eq!(deleted.deleted_count(), 1);
            assert_eq!(names(users.find_all().iter()), vec!["Alice", "Bob"]);

            let reopened = ctx.reopen()?;
            assert_eq!(
                names(reopened.collection("users")?.find_all().iter()),
                vec!["Alice", "Bob"]
            );
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_modelled_signup_flow() {
    run_test(
        || create_test_context(),
        |ctx| {
            let schema = Schema::from_document(&doc! {
                name: { type: "string", required: true },
                age: { type: "number", required: true, args: ["integer", 18] },
                city: { type: "string" },
            })?;
            let users = ctx.db().model("users", schema)?;

            users.insert(doc! { name: "Alice", age: 25, city: "New York" })?;
            users.insert(doc! { name: "Bob", age: 30, city: "New York" })?;
            assert!(users.insert(doc! { name: "Kid", age: 12 }).is_err());

            users.collection().create_index("city");
            let new_yorkers = users.find(&doc! { city: "New York" })?;
            assert_eq!(new_yorkers.len(), 2);

            let stats = users.aggregate(&[
                doc! { "$match": { city: "New York" } },
                doc! {
                    "$group": {
                        _id: "city",
                        avg_age: { "$avg": "age" },
                        oldest: { "$max": "age" },
                    }
                },
                doc! { "$project": { oldest: 0 } },
            ])?;
            assert_eq!(stats, vec![doc! { _id: "New York", avg_age: 27.5 }]);

            ctx.db().drop_collection("users")?;
            assert!(ctx.reopen()?.collection_names().is_empty());
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}
