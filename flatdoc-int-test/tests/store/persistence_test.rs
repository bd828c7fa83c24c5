use flatdoc::doc;
use flatdoc::errors::ErrorKind;
use flatdoc::store::{FileSnapshotStore, SnapshotStore, SnapshotStoreProvider};
use flatdoc::Database;
use flatdoc_int_test::test_util::{
    cleanup, create_test_context, insert_test_documents, names, random_path, run_test,
};
use std::fs;

#[test]
fn test_open_creates_empty_file() {
    run_test(
        || create_test_context(),
        |ctx| {
            assert!(ctx.path().exists());
            assert_eq!(fs::read_to_string(ctx.path()).unwrap_or_default(), "{}\n");
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_reopen_restores_records() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.db().collection("users")?;
            insert_test_documents(&coll)?;
            ctx.db().collection("empty")?;

            let reopened = ctx.reopen()?;
            assert_eq!(reopened.collection_names(), vec!["users".to_string(), "empty".to_string()]);
            let users = reopened.collection("users")?;
            assert_eq!(names(users.find_all().iter()), vec!["Alice", "Bob", "Charlie"]);
            assert_eq!(
                users.find_all().first().map(|d| d.fields().to_vec()),
                Some(vec!["name".to_string(), "age".to_string(), "city".to_string()])
            );
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_save_of_load_is_stable() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.db().collection("users")?;
            insert_test_documents(&coll)?;
            coll.insert(doc! {
                name: "Dave",
                score: 1.5,
                tags: ["x"],
                address: { city: "Oslo" },
                note: (flatdoc::common::Value::Null),
            })?;
            let before = fs::read_to_string(ctx.path()).unwrap_or_default();

            let gateway = FileSnapshotStore::new(ctx.path(), true);
            let snapshot = gateway.load()?;
            assert!(snapshot.is_some());
            if let Some(snapshot) = snapshot {
                gateway.save(&snapshot)?;
            }
            assert_eq!(fs::read_to_string(ctx.path()).unwrap_or_default(), before);

            ctx.reopen()?.flush()?;
            assert_eq!(fs::read_to_string(ctx.path()).unwrap_or_default(), before);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_pretty_and_compact_format() {
    let path = random_path();
    let db = Database::builder().file_path(&path).open().unwrap();
    db.collection("users").unwrap().insert(doc! { name: "Alice" }).unwrap();
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "{\n  \"users\": [\n    {\n      \"name\": \"Alice\"\n    }\n  ]\n}\n"
    );
    let _ = fs::remove_file(&path);

    let path = random_path();
    let db = Database::builder().file_path(&path).pretty_print(false).open().unwrap();
    db.collection("users").unwrap().insert(doc! { name: "Alice" }).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "{\"users\":[{\"name\":\"Alice\"}]}\n");
    let _ = fs::remove_file(&path);
}

#[test]
fn test_corrupted_file() {
    let path = random_path();
    fs::write(&path, "{ not json").unwrap();

    let err = Database::builder().file_path(&path).open().unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::EncodingError);
    assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
    let _ = fs::remove_file(&path);
}

#[test]
fn test_missing_parent_directory() {
    let path = random_path().join("nested").join("db.json");
    let err = Database::builder().file_path(&path).open().unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::FileNotFound);
    assert!(!path.exists());
}

#[test]
fn test_io_failure_keeps_memory_state() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.db().collection("users")?;
            insert_test_documents(&coll)?;
            let durable = fs::read_to_string(ctx.path()).unwrap_or_default();

            // A directory where the file was makes every save fail.
            fs::remove_file(ctx.path()).ok();
            fs::create_dir(ctx.path()).ok();

            let err = coll.insert(doc! { name: "Dave" }).unwrap_err();
            assert!(err.cause().is_some());
            assert_eq!(coll.size(), 4);
            assert_eq!(ctx.db().snapshot().collection("users").map(|c| c.len()), Some(4));

            fs::remove_dir(ctx.path()).ok();
            fs::write(ctx.path(), &durable).ok();
            let reopened = ctx.reopen()?;
            assert_eq!(reopened.collection("users")?.size(), 3);

            ctx.db().flush()?;
            assert_eq!(ctx.reopen()?.collection("users")?.size(), 4);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_custom_gateway() {
    let path = random_path();
    let db = Database::builder()
        .snapshot_store(SnapshotStore::new(FileSnapshotStore::new(&path, false)))
        .open()
        .unwrap();
    db.collection("users").unwrap();
    assert!(db.config().file_path().is_none());
    assert_eq!(fs::read_to_string(&path).unwrap(), "{\"users\":[]}\n");
    let _ = fs::remove_file(&path);
}
