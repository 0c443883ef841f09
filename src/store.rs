//! Trade data store: source resolution, sandboxed file access, and the
//! per-source record cache.
//!
//! The store owns the cache map instead of leaning on process globals, so
//! tests construct a fresh instance per test. Cache entries hold raw parsed
//! records (source-shaped); year filtering happens on every request.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::RwLock;
use tracing::warn;

use crate::aggregate::aggregate;
use crate::ingest;
use crate::types::{TradeDataForYear, TradeRecord};

/// File name of the bundled sample CSV inside the data directory.
pub const DEFAULT_FIXTURE: &str = "dummy.csv";

const DEFAULT_CACHE_KEY: &str = "default";

/// Where a CSV comes from.
///
/// Inline content has no stable identity and is reparsed on every call;
/// the default fixture and explicit paths are cached.
#[derive(Debug, Clone)]
pub enum CsvSource {
    Default,
    Path(String),
    Inline(String),
}

#[derive(Debug, Error)]
pub enum SourceError {
    /// The requested path escapes the data directory. This is the one
    /// ingestion failure that propagates instead of degrading to no data.
    #[error("csv path {path:?} resolves outside the data directory")]
    PathOutsideRoot { path: String },
}

/// Loads, parses and caches trade records per CSV source.
pub struct TradeStore {
    data_dir: PathBuf,
    cache: RwLock<HashMap<String, Arc<Vec<TradeRecord>>>>,
}

impl TradeStore {
    /// `data_dir` is the only directory file sources may resolve into.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Aggregated calendar data for one year from the given source.
    pub async fn trade_data_for_year(
        &self,
        source: &CsvSource,
        year: i32,
    ) -> Result<TradeDataForYear, SourceError> {
        let records = self.load_records(source).await?;
        Ok(aggregate(&records, year))
    }

    /// Load canonical records for a source, hitting the cache for file-backed
    /// sources. A source that cannot be read degrades to an empty record
    /// list (logged once per cache key); only path traversal is an error.
    pub async fn load_records(
        &self,
        source: &CsvSource,
    ) -> Result<Arc<Vec<TradeRecord>>, SourceError> {
        let path = match source {
            CsvSource::Inline(content) => {
                return Ok(Arc::new(ingest::parse_trade_csv_text(content)));
            }
            CsvSource::Default => self.data_dir.join(DEFAULT_FIXTURE),
            CsvSource::Path(raw) if raw.trim().is_empty() => self.data_dir.join(DEFAULT_FIXTURE),
            CsvSource::Path(raw) => self.resolve_path(raw)?,
        };
        let key = match source {
            CsvSource::Path(raw) if !raw.trim().is_empty() => format!("path:{}", path.display()),
            _ => DEFAULT_CACHE_KEY.to_string(),
        };

        if let Some(records) = self.cache.read().await.get(&key) {
            return Ok(Arc::clone(records));
        }

        let records = match tokio::fs::read(&path).await {
            Ok(bytes) if !bytes.is_empty() => ingest::parse_trade_csv_bytes(&bytes),
            Ok(_) => {
                warn!(path = %path.display(), "trade csv is empty, treating as no trades");
                Vec::new()
            }
            Err(error) => {
                warn!(path = %path.display(), %error, "failed to read trade csv, treating as no trades");
                Vec::new()
            }
        };

        // First writer wins; a concurrent fill produced the same records.
        let mut cache = self.cache.write().await;
        let entry = cache.entry(key).or_insert(Arc::new(records));
        Ok(Arc::clone(entry))
    }

    /// Resolve a user-supplied path against the data directory, rejecting
    /// anything that escapes it. Purely lexical, so missing files are still
    /// resolvable (they degrade to empty data later, not to an error here).
    fn resolve_path(&self, raw: &str) -> Result<PathBuf, SourceError> {
        let requested = Path::new(raw.trim());
        let joined = if requested.is_absolute() {
            requested.to_path_buf()
        } else {
            self.data_dir.join(requested)
        };

        let normalized = normalize_lexically(&joined);
        let root = normalize_lexically(&self.data_dir);
        if !normalized.starts_with(&root) {
            return Err(SourceError::PathOutsideRoot {
                path: raw.to_string(),
            });
        }
        Ok(normalized)
    }
}

/// Collapse `.` and `..` components without touching the filesystem. A `..`
/// that cannot be popped is kept, which makes the containment check fail.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::{env, fs};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    const SAMPLE_CSV: &str = "\
成立日,成立時間,売買,取引数量（枚）,確定損益
2024/1/15,9:05,買,1,-77
2024/1/15,10:40,売,1,\"2,846\"
2024/2/2,9:00,買,2,500
";

    fn temp_data_dir() -> PathBuf {
        let id = TEST_COUNTER.fetch_add(1, Ordering::Relaxed);
        let dir = env::temp_dir().join(format!("trade_calendar_test_{}_{id}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[tokio::test]
    async fn test_default_fixture_loads_and_aggregates() {
        let dir = temp_data_dir();
        fs::write(dir.join(DEFAULT_FIXTURE), SAMPLE_CSV).unwrap();
        let store = TradeStore::new(&dir);

        let data = store
            .trade_data_for_year(&CsvSource::Default, 2024)
            .await
            .unwrap();
        assert_eq!(data.summaries.len(), 2);
        assert_eq!(data.summaries["2024-01-15"].trade_count, 2);
        assert!((data.summaries["2024-01-15"].net_profit - 2769.0).abs() < 1e-9);

        let _ = fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_missing_file_yields_empty_and_caches() {
        let dir = temp_data_dir();
        let store = TradeStore::new(&dir);
        let source = CsvSource::Path("absent.csv".to_string());

        let data = store.trade_data_for_year(&source, 2024).await.unwrap();
        assert!(data.summaries.is_empty());
        assert!(data.trades_by_date.is_empty());

        // Creating the file afterwards must not change anything: the empty
        // result is cached and the source is not re-read.
        fs::write(dir.join("absent.csv"), SAMPLE_CSV).unwrap();
        let data = store.trade_data_for_year(&source, 2024).await.unwrap();
        assert!(data.summaries.is_empty());

        let _ = fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = temp_data_dir();
        let store = TradeStore::new(&dir);

        let err = store
            .load_records(&CsvSource::Path("../outside.csv".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::PathOutsideRoot { .. }));

        let err = store
            .load_records(&CsvSource::Path("/etc/passwd".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::PathOutsideRoot { .. }));

        // Sneaking back out through an intermediate directory is also caught.
        let err = store
            .load_records(&CsvSource::Path("sub/../../outside.csv".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::PathOutsideRoot { .. }));

        let _ = fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_nested_path_inside_root_allowed() {
        let dir = temp_data_dir();
        fs::create_dir_all(dir.join("exports")).unwrap();
        fs::write(dir.join("exports/jan.csv"), SAMPLE_CSV).unwrap();
        let store = TradeStore::new(&dir);

        let records = store
            .load_records(&CsvSource::Path("exports/jan.csv".to_string()))
            .await
            .unwrap();
        assert_eq!(records.len(), 3);

        let _ = fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_inline_content_is_not_cached() {
        let dir = temp_data_dir();
        let store = TradeStore::new(&dir);

        let first = store
            .load_records(&CsvSource::Inline(SAMPLE_CSV.to_string()))
            .await
            .unwrap();
        assert_eq!(first.len(), 3);

        // Different inline content parses fresh rather than hitting a cache.
        let second = store
            .load_records(&CsvSource::Inline(
                "成立日,売買,取引数量（枚）,確定損益\n2023/3/3,買,1,10\n".to_string(),
            ))
            .await
            .unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].iso_date, "2023-03-03");

        let _ = fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_blank_path_falls_back_to_default_fixture() {
        let dir = temp_data_dir();
        fs::write(dir.join(DEFAULT_FIXTURE), SAMPLE_CSV).unwrap();
        let store = TradeStore::new(&dir);

        let records = store
            .load_records(&CsvSource::Path("   ".to_string()))
            .await
            .unwrap();
        assert_eq!(records.len(), 3);

        let _ = fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_concurrent_loads_agree() {
        let dir = temp_data_dir();
        fs::write(dir.join(DEFAULT_FIXTURE), SAMPLE_CSV).unwrap();
        let store = Arc::new(TradeStore::new(&dir));

        let (a, b) = tokio::join!(
            store.load_records(&CsvSource::Default),
            store.load_records(&CsvSource::Default),
        );
        assert_eq!(*a.unwrap(), *b.unwrap());

        let _ = fs::remove_dir_all(&dir);
    }
}
