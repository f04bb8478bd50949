//! [`JsonFileStore`] — the flat-file implementation of [`BirthdayStore`].

use std::{
  ffi::OsString,
  io::ErrorKind,
  path::{Path, PathBuf},
  sync::Arc,
};

use birthdays_core::{BirthdayRecord, store::BirthdayStore};
use serde::Deserialize;
use tokio::{fs, io::AsyncWriteExt as _, sync::Mutex};

use crate::{Error, Result};

// ─── Load policy ─────────────────────────────────────────────────────────────

/// What to do with an entry that cannot be decoded when the file is loaded.
///
/// A file that is not a JSON array at all is always fatal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadPolicy {
  /// Refuse to start.
  #[default]
  Strict,
  /// Drop the entry and log a warning.
  ///
  /// The next append rewrites the file without the dropped entries, so the
  /// file as loaded is first copied to `<file>.bak`. Only one backup is kept;
  /// a later lossy load overwrites it.
  SkipMalformed,
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A birthday store backed by a single JSON file.
///
/// One mutex guards both the in-memory sequence and the file rewrite, so
/// concurrent appends never interleave. Cloning is cheap; clones share state.
#[derive(Clone)]
pub struct JsonFileStore {
  inner: Arc<Inner>,
}

struct Inner {
  path:  PathBuf,
  state: Mutex<State>,
}

struct State {
  records:        Vec<BirthdayRecord>,
  /// Set when load dropped entries; the file is copied to `<file>.bak`
  /// before it is first overwritten.
  backup_pending: bool,
}

impl JsonFileStore {
  /// Open the store at `path`, loading any existing records.
  ///
  /// A missing file is a cold start and yields an empty store. The file is
  /// not created until the first append.
  pub async fn open(path: impl Into<PathBuf>, policy: LoadPolicy) -> Result<Self> {
    let path = path.into();
    let loaded = load(&path, policy).await?;
    Ok(Self {
      inner: Arc::new(Inner {
        path,
        state: Mutex::new(State {
          records:        loaded.records,
          backup_pending: loaded.skipped > 0,
        }),
      }),
    })
  }

  pub fn path(&self) -> &Path { &self.inner.path }

  pub async fn len(&self) -> usize { self.inner.state.lock().await.records.len() }

  pub async fn is_empty(&self) -> bool { self.len().await == 0 }
}

// ─── Load ────────────────────────────────────────────────────────────────────

struct Loaded {
  records: Vec<BirthdayRecord>,
  skipped: usize,
}

async fn load(path: &Path, policy: LoadPolicy) -> Result<Loaded> {
  let bytes = match fs::read(path).await {
    Ok(bytes) => bytes,
    Err(e) if e.kind() == ErrorKind::NotFound => {
      tracing::info!(path = %path.display(), "no store file yet, starting empty");
      return Ok(Loaded { records: Vec::new(), skipped: 0 });
    }
    Err(source) => {
      return Err(Error::Read {
        path: path.to_path_buf(),
        source,
      });
    }
  };

  if bytes.iter().all(u8::is_ascii_whitespace) {
    return Ok(Loaded { records: Vec::new(), skipped: 0 });
  }

  let entries: Vec<serde_json::Value> =
    serde_json::from_slice(&bytes).map_err(|source| Error::Corrupt {
      path: path.to_path_buf(),
      source,
    })?;

  let mut records = Vec::with_capacity(entries.len());
  let mut skipped = 0usize;
  for (index, entry) in entries.into_iter().enumerate() {
    match decode_entry(entry) {
      Ok(record) => records.push(record),
      Err(reason) => match policy {
        LoadPolicy::Strict => {
          return Err(Error::MalformedEntry {
            path: path.to_path_buf(),
            index,
            reason,
          });
        }
        LoadPolicy::SkipMalformed => {
          tracing::warn!(path = %path.display(), index, %reason, "skipping malformed entry");
          skipped += 1;
        }
      },
    }
  }

  tracing::info!(
    path = %path.display(),
    loaded = records.len(),
    skipped,
    "loaded birthday store"
  );
  Ok(Loaded { records, skipped })
}

fn decode_entry(entry: serde_json::Value) -> std::result::Result<BirthdayRecord, String> {
  let record: BirthdayRecord =
    serde_json::from_value(entry).map_err(|e| e.to_string())?;
  record.validate().map_err(|e| e.to_string())?;
  Ok(record)
}

// ─── Persist ─────────────────────────────────────────────────────────────────

/// `<file><suffix>` next to the target, so renames stay on one filesystem.
fn sibling(path: &Path, suffix: &str) -> PathBuf {
  let mut name = path
    .file_name()
    .map(OsString::from)
    .unwrap_or_else(|| OsString::from("birthdays.json"));
  name.push(suffix);
  path.with_file_name(name)
}

pub(crate) fn parent_dir(path: &Path) -> &Path {
  match path.parent() {
    Some(p) if !p.as_os_str().is_empty() => p,
    _ => Path::new("."),
  }
}

async fn persist(path: &Path, records: &[BirthdayRecord]) -> std::io::Result<()> {
  let json = serde_json::to_vec_pretty(records)?;

  let dir = parent_dir(path);
  fs::create_dir_all(dir).await?;

  let tmp = sibling(path, ".tmp");
  let written = async {
    let mut file = fs::File::create(&tmp).await?;
    file.write_all(&json).await?;
    file.sync_all().await?;
    drop(file);
    fs::rename(&tmp, path).await
  }
  .await;

  if written.is_err() {
    let _ = fs::remove_file(&tmp).await;
    return written;
  }

  // The rename has landed, so a failed directory sync does not fail the append.
  if let Err(e) = sync_dir(dir).await {
    tracing::warn!(dir = %dir.display(), error = %e, "failed to sync store directory");
  }
  Ok(())
}

#[cfg(unix)]
pub(crate) async fn sync_dir(dir: &Path) -> std::io::Result<()> {
  fs::File::open(dir).await?.sync_all().await
}

#[cfg(not(unix))]
pub(crate) async fn sync_dir(_dir: &Path) -> std::io::Result<()> { Ok(()) }

/// Write a candidate sequence, then commit it to memory.
///
/// Spawned by [`BirthdayStore::append`] so that dropping the caller's future
/// cannot stop it between the file write and the commit.
async fn append_committed(inner: Arc<Inner>, record: BirthdayRecord) -> Result<BirthdayRecord> {
  let mut state = inner.state.lock().await;

  if state.backup_pending {
    let backup = sibling(&inner.path, ".bak");
    fs::copy(&inner.path, &backup)
      .await
      .map_err(|source| Error::Persistence {
        path: backup.clone(),
        source,
      })?;
    tracing::warn!(backup = %backup.display(), "kept a copy of the store file before dropping skipped entries");
    state.backup_pending = false;
  }

  let mut next = Vec::with_capacity(state.records.len() + 1);
  next.extend_from_slice(&state.records);
  next.push(record.clone());

  if let Err(source) = persist(&inner.path, &next).await {
    tracing::error!(
      path = %inner.path.display(),
      error = %source,
      "failed to persist store, insertion not applied"
    );
    return Err(Error::Persistence {
      path: inner.path.clone(),
      source,
    });
  }

  state.records = next;
  tracing::debug!(name = %record.name, total = state.records.len(), "appended birthday");
  Ok(record)
}

// ─── BirthdayStore impl ──────────────────────────────────────────────────────

impl BirthdayStore for JsonFileStore {
  type Error = Error;

  async fn append(&self, record: BirthdayRecord) -> Result<BirthdayRecord> {
    record.validate()?;
    tokio::spawn(append_committed(Arc::clone(&self.inner), record)).await?
  }

  async fn all_records(&self) -> Result<Vec<BirthdayRecord>> {
    Ok(self.inner.state.lock().await.records.clone())
  }
}
