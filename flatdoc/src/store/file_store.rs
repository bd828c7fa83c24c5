use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use crate::common::SNAPSHOT_INDENT;
use crate::errors::{ErrorKind, FlatdocError, FlatdocResult};
use crate::store::{SnapshotStoreProvider, StoreSnapshot};

/// Persists the store as a single JSON file.
///
/// Every save rewrites the whole file. By default the JSON is pretty printed
/// with a two-space indent and a trailing newline.
#[derive(Clone)]
pub struct FileSnapshotStore {
    inner: Arc<FileSnapshotStoreInner>,
}

impl FileSnapshotStore {
    pub fn new<P: AsRef<Path>>(path: P, pretty_print: bool) -> Self {
        FileSnapshotStore {
            inner: Arc::new(FileSnapshotStoreInner {
                path: path.as_ref().to_path_buf(),
                pretty_print,
            }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }
}

impl SnapshotStoreProvider for FileSnapshotStore {
    fn load(&self) -> FlatdocResult<Option<StoreSnapshot>> {
        self.inner.load()
    }

    fn save(&self, snapshot: &StoreSnapshot) -> FlatdocResult<()> {
        self.inner.save(snapshot)
    }

    fn describe(&self) -> String {
        format!("file:{}", self.inner.path.display())
    }
}

struct FileSnapshotStoreInner {
    path: PathBuf,
    pretty_print: bool,
}

impl FileSnapshotStoreInner {
    fn load(&self) -> FlatdocResult<Option<StoreSnapshot>> {
        if !self.path.exists() {
            log::debug!("No snapshot found at {}", self.path.display());
            return Ok(None);
        }

        let file = File::open(&self.path).map_err(|e| {
            log::error!("Failed to open snapshot {}: {}", self.path.display(), e);
            FlatdocError::from(e)
        })?;

        match serde_json::from_reader(BufReader::new(file)) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(e) => {
                log::error!("Failed to decode snapshot {}: {}", self.path.display(), e);
                Err(FlatdocError::new_with_cause(
                    &format!("Corrupted snapshot file {}", self.path.display()),
                    ErrorKind::EncodingError,
                    e.into(),
                ))
            }
        }
    }

    fn save(&self, snapshot: &StoreSnapshot) -> FlatdocResult<()> {
        let file = File::create(&self.path).map_err(|e| {
            log::error!("Failed to create snapshot {}: {}", self.path.display(), e);
            FlatdocError::from(e)
        })?;

        let mut writer = BufWriter::new(file);
        let result = if self.pretty_print {
            let formatter = serde_json::ser::PrettyFormatter::with_indent(SNAPSHOT_INDENT);
            let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
            snapshot.serialize(&mut serializer)
        } else {
            serde_json::to_writer(&mut writer, snapshot)
        };

        if let Err(e) = result {
            log::error!("Failed to encode snapshot {}: {}", self.path.display(), e);
            return Err(e.into());
        }

        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}
