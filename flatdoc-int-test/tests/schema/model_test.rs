use flatdoc::collection::UpdateOptions;
use flatdoc::doc;
use flatdoc::errors::{ErrorKind, FlatdocResult};
use flatdoc::schema::{FieldDefinition, FieldType, Model, Schema};
use flatdoc_int_test::test_util::{cleanup, create_test_context, run_test, TestContext};

fn user_model(ctx: &TestContext) -> FlatdocResult<Model> {
    let schema = Schema::from_document(&doc! {
        name: { type: "string", required: true },
        age: { type: "number", required: true, args: ["integer", 18] },
        email: { type: "string" },
        tags: { type: "array", args: [1] },
    })?;
    ctx.db().model("users", schema)
}

#[test]
fn test_valid_insert_is_persisted() {
    run_test(
        || create_test_context(),
        |ctx| {
            let users = user_model(&ctx)?;
            users.insert(doc! { name: "Alice", age: 25, tags: ["admin"] })?;

            assert_eq!(users.find_all().len(), 1);
            assert_eq!(ctx.file_json()["users"][0]["name"], "Alice");
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_invalid_insert_leaves_no_trace() {
    run_test(
        || create_test_context(),
        |ctx| {
            let users = user_model(&ctx)?;
            let before = std::fs::read_to_string(ctx.path()).unwrap_or_default();

            for (record, message) in [
                (doc! { age: 25 }, "Validation failed: \"name\" is required"),
                (
                    doc! { name: "Bob", age: 17 },
                    "Validation failed: \"age\" must be greater than or equal to 18",
                ),
                (doc! { name: "Bob", age: 20.5 }, "Validation failed: \"age\" must be an integer"),
                (
                    doc! { name: "Bob", age: 20, tags: [] },
                    "Validation failed: \"tags\" must contain at least 1 items",
                ),
                (
                    doc! { name: "Bob", age: 20, role: "x" },
                    "Validation failed: \"role\" is not allowed",
                ),
            ] {
                let err = users.insert(record).unwrap_err();
                assert_eq!(err.kind(), &ErrorKind::ValidationError);
                assert_eq!(err.message(), message);
            }

            assert!(users.find_all().is_empty());
            assert_eq!(std::fs::read_to_string(ctx.path()).unwrap_or_default(), before);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_update_validation() {
    run_test(
        || create_test_context(),
        |ctx| {
            let users = user_model(&ctx)?;
            users.insert(doc! { name: "Alice", age: 25 })?;

            let result =
                users.update(&doc! { name: "Alice" }, &doc! { email: "alice@example.com" })?;
            assert_eq!(result.modified_count(), 1);

            let err = users.update(&doc! { name: "Alice" }, &doc! { email: 5 }).unwrap_err();
            assert_eq!(err.message(), "Validation failed: \"email\" must be a string");

            let result = users.update_with_options(
                &doc! { name: "Alice" },
                &doc! { email: 5 },
                &UpdateOptions::new(false),
            )?;
            assert_eq!(result.matched_count(), 1);
            assert_eq!(ctx.file_json()["users"][0]["email"], 5);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_schema_declaration_errors() {
    run_test(
        || create_test_context(),
        |ctx| {
            let err = Schema::from_document(&doc! { when: { type: "date" } }).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::SchemaError);

            let err = Schema::from_document(&doc! { age: { type: "number", args: ["even"] } })
                .unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::SchemaError);

            assert!(!ctx.db().has_collection("users"));
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_open_schema() {
    run_test(
        || create_test_context(),
        |ctx| {
            let schema = Schema::new()
                .field("name", FieldDefinition::new(FieldType::String).required())
                .allow_unknown(true);
            let notes = ctx.db().model("notes", schema)?;

            notes.insert(doc! { name: "n1", body: "anything", extra: { nested: true } })?;
            let deleted = notes.delete(&doc! { name: "n1" })?;
            assert_eq!(deleted.deleted_count(), 1);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}
