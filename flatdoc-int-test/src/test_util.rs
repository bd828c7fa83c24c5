use flatdoc::collection::{Collection, Document};
use flatdoc::doc;
use flatdoc::errors::FlatdocResult;
use flatdoc::Database;
use std::backtrace::Backtrace;
use std::path::{Path, PathBuf};
use std::time::Instant;
use std::{env, fs};

/// Runs a test between a setup and a teardown step.
///
/// `after` always runs when `before` succeeded, also when the test body
/// fails. Any failure or panic fails the test with its message and backtrace.
pub fn run_test<T, B, A>(before: B, test: T, after: A)
where
    T: Fn(TestContext) -> FlatdocResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
    B: Fn() -> FlatdocResult<TestContext> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
    A: Fn(TestContext) -> FlatdocResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
{
    let start_time = Instant::now();

    let result = std::panic::catch_unwind(|| {
        let backtrace = Backtrace::capture();
        match before() {
            Ok(ctx) => match test(ctx.clone()) {
                Ok(_) => after(ctx)
                    .map_err(|e| (format!("After run failed: {:?}", e), backtrace.to_string())),
                Err(e) => {
                    let _ = after(ctx);
                    Err((format!("Test failed: {:?}", e), backtrace.to_string()))
                }
            },
            Err(e) => Err((format!("Before run failed: {:?}", e), backtrace.to_string())),
        }
    });

    let error = match result {
        Ok(Ok(_)) => return,
        Ok(Err((e, bt))) => {
            if !bt.is_empty() && !bt.contains("disabled") {
                eprintln!("\nBacktrace:\n{}", bt);
            }
            e
        }
        Err(panic_err) => {
            if let Some(s) = panic_err.downcast_ref::<&str>() {
                format!("Panic: {}", s)
            } else if let Some(s) = panic_err.downcast_ref::<String>() {
                format!("Panic: {}", s)
            } else {
                "Panic: unknown payload".to_string()
            }
        }
    };

    panic!("Test failed after {:?}: {}", start_time.elapsed(), error);
}

#[derive(Clone)]
pub struct TestContext {
    path: PathBuf,
    db: Database,
}

impl TestContext {
    pub fn new(path: PathBuf, db: Database) -> Self {
        Self { path, db }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn db(&self) -> Database {
        self.db.clone()
    }

    /// Opens a second database on the same file, as a restarted process would.
    pub fn reopen(&self) -> FlatdocResult<Database> {
        Database::builder().file_path(&self.path).open()
    }

    /// Reads the snapshot file as raw JSON.
    pub fn file_json(&self) -> serde_json::Value {
        let content = fs::read_to_string(&self.path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or(serde_json::Value::Null)
    }
}

pub fn random_path() -> PathBuf {
    let id = uuid::Uuid::new_v4();
    env::temp_dir().join(format!("flatdoc-{}.json", id))
}

/// Creates a file-backed database at a fresh temp path.
pub fn create_test_context() -> FlatdocResult<TestContext> {
    let path = random_path();
    if path.exists() {
        let _ = fs::remove_file(&path);
    }

    let db = Database::builder().file_path(&path).open()?;
    Ok(TestContext::new(path, db))
}

pub fn cleanup(ctx: TestContext) -> FlatdocResult<()> {
    match fs::remove_file(ctx.path()) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => {
            eprintln!("Warning: Failed to remove test file {:?}: {:?}", ctx.path(), e);
            Ok(())
        }
    }
}

pub fn create_test_docs() -> Vec<Document> {
    vec![
        doc! { name: "Alice", age: 25, city: "New York" },
        doc! { name: "Bob", age: 30, city: "Los Angeles" },
        doc! { name: "Charlie", age: 22, city: "Chicago" },
    ]
}

pub fn insert_test_documents(collection: &Collection) -> FlatdocResult<()> {
    for doc in create_test_docs() {
        collection.insert(doc)?;
    }
    Ok(())
}

/// Collects the `name` field of each record, for terse order assertions.
pub fn names<'a>(docs: impl IntoIterator<Item = &'a Document>) -> Vec<String> {
    docs.into_iter()
        .filter_map(|doc| doc.get("name").and_then(|v| v.as_str()).map(|s| s.to_string()))
        .collect()
}
