use atomic_write_file::AtomicWriteFile;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use super::error::{StoreError, StoreResult};
use super::RecordStore;
use crate::actions::ActionError;
use crate::records::{Record, TripRecords};

pub const FORMAT_VERSION: u32 = 1;
const MAX_WRITE_ATTEMPTS: u32 = 3;

/// On-disk trip data.
///
/// `revision` goes up by one on every successful write and is what
/// concurrent writers compare against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripDocument {
    pub format: u32,
    #[serde(default)]
    pub revision: u64,
    #[serde(default)]
    pub records: TripRecords,
}

impl Default for TripDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl TripDocument {
    pub fn new() -> Self {
        Self {
            format: FORMAT_VERSION,
            revision: 0,
            records: TripRecords::new(),
        }
    }
}

/// Get the default trip data path (~/.config/white-jersey/trip.json)
pub fn get_data_path() -> PathBuf {
    crate::config::get_config_dir().join("trip.json")
}

/// Trip data kept in a single JSON file.
///
/// Reads never lock. Writes are read-modify-write with an optimistic
/// revision check, so two writers racing on the same file cannot silently
/// drop each other's changes.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// Load the document. A missing file is an empty trip at revision 0.
    pub fn load(&self) -> StoreResult<TripDocument> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no trip data yet");
            return Ok(TripDocument::new());
        }

        let file = File::open(&self.path).map_err(|e| self.io_error(e))?;
        let document: TripDocument =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })?;

        if document.format != FORMAT_VERSION {
            return Err(StoreError::UnsupportedFormat(document.format));
        }

        tracing::debug!(
            path = %self.path.display(),
            revision = document.revision,
            "trip data loaded"
        );
        Ok(document)
    }

    /// Apply `mutation` to the current records and save the result.
    ///
    /// If another writer saved in between, the mutation is re-run on their
    /// version, up to `MAX_WRITE_ATTEMPTS` times. A rejected action aborts
    /// without writing.
    pub fn update<T, F>(&self, mut mutation: F) -> StoreResult<T>
    where
        F: FnMut(&mut TripRecords) -> Result<T, ActionError>,
    {
        for attempt in 1..=MAX_WRITE_ATTEMPTS {
            let mut document = self.load()?;
            let base_revision = document.revision;

            let outcome = mutation(&mut document.records)?;
            document.revision = base_revision + 1;

            if self.commit(&document, base_revision)? {
                tracing::debug!(revision = document.revision, attempt, "trip data saved");
                return Ok(outcome);
            }
            tracing::warn!(attempt, base_revision, "trip data changed underneath us, retrying");
        }

        Err(StoreError::Conflict {
            attempts: MAX_WRITE_ATTEMPTS,
        })
    }

    /// Write `document` atomically if the file is still at `base_revision`.
    /// Returns false (and writes nothing) when it is not.
    fn commit(&self, document: &TripDocument, base_revision: u64) -> StoreResult<bool> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }

        let mut file = AtomicWriteFile::open(&self.path).map_err(|e| self.io_error(e))?;

        // Dropping the uncommitted file discards it
        if self.load()?.revision != base_revision {
            return Ok(false);
        }

        serde_json::to_writer_pretty(&mut file, document)
            .map_err(|e| self.io_error(e.into()))?;
        file.commit().map_err(|e| self.io_error(e))?;

        Ok(true)
    }
}

impl RecordStore for JsonStore {
    fn read_all<R: Record>(&self) -> StoreResult<Vec<R>> {
        let document = self.load()?;
        let rows = R::collection(&document.records).to_vec();
        tracing::debug!(kind = %R::KIND, rows = rows.len(), "read records");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{log_drink, submit_rule};
    use crate::records::{DrinkType, Rule};
    use crate::store::load_records;
    use chrono::{TimeZone, Utc};
    use std::cell::Cell;
    use std::env;

    fn temp_store(name: &str) -> JsonStore {
        let path = env::temp_dir().join(format!("white_jersey_test_{}.json", name));
        let _ = fs::remove_file(&path);
        JsonStore::new(path)
    }

    fn now() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_load_missing_file_returns_empty() {
        let store = temp_store("missing");
        let document = store.load().unwrap();
        assert_eq!(document.format, FORMAT_VERSION);
        assert_eq!(document.revision, 0);
        assert_eq!(document.records, TripRecords::new());
    }

    #[test]
    fn test_update_and_reload() {
        let store = temp_store("roundtrip");

        store
            .update(|records| submit_rule(records, "alice", "No work emails after 6pm", now()))
            .unwrap();
        store
            .update(|records| log_drink(records, "alice", "The Oak", DrinkType::Jameson, now()))
            .unwrap();

        let document = store.load().unwrap();
        assert_eq!(document.revision, 2);
        assert_eq!(document.records.rules.len(), 1);
        assert_eq!(document.records.drinks[0].drink_type, DrinkType::Jameson);

        let records = load_records(&store).unwrap();
        assert_eq!(records, document.records);

        let _ = fs::remove_file(store.path());
    }

    #[test]
    fn test_rejected_action_writes_nothing() {
        let store = temp_store("rejected");
        let result = store.update(|records| log_drink(records, "ghost", "The Oak", DrinkType::Guinness, now()));
        assert!(matches!(result, Err(StoreError::Action(ActionError::NotParticipant(_)))));
        assert!(!store.path().exists());
    }

    #[test]
    fn test_concurrent_write_is_retried_not_lost() {
        let store = temp_store("race");
        let rival = JsonStore::new(store.path());
        let attempts = Cell::new(0);

        store
            .update(|records| {
                attempts.set(attempts.get() + 1);
                if attempts.get() == 1 {
                    // Someone else saves while we are mid-update
                    rival
                        .update(|r| submit_rule(r, "bob", "Rounds go clockwise", now()))
                        .unwrap();
                }
                submit_rule(records, "alice", "No work emails after 6pm", now())
            })
            .unwrap();

        assert_eq!(attempts.get(), 2);
        let document = store.load().unwrap();
        assert_eq!(document.revision, 2);
        let authors: Vec<_> = document.records.rules.iter().map(|r| r.author.as_str()).collect();
        assert_eq!(authors, vec!["bob", "alice"]);

        let _ = fs::remove_file(store.path());
    }

    #[test]
    fn test_persistent_conflict_gives_up() {
        let store = temp_store("conflict");
        let rival = JsonStore::new(store.path());
        let counter = Cell::new(0);

        let result = store.update(|records| {
            counter.set(counter.get() + 1);
            let name = format!("rival{}", counter.get());
            rival
                .update(|r| submit_rule(r, &name, "Rounds go clockwise", now()))
                .unwrap();
            records.rules.push(Rule {
                author: "alice".to_string(),
                text: "No work emails after 6pm".to_string(),
                timestamp: None,
            });
            Ok(())
        });

        assert!(matches!(result, Err(StoreError::Conflict { attempts: 3 })));
        let document = store.load().unwrap();
        assert!(!document.records.has_rule("alice"));
        assert_eq!(document.records.rules.len(), 3);

        let _ = fs::remove_file(store.path());
    }

    #[test]
    fn test_unsupported_format_rejected() {
        let store = temp_store("format");
        fs::write(store.path(), r#"{"format": 7, "revision": 1, "records": {}}"#).unwrap();
        assert!(matches!(store.load(), Err(StoreError::UnsupportedFormat(7))));
        let _ = fs::remove_file(store.path());
    }

    #[test]
    fn test_legacy_rows_load() {
        let store = temp_store("legacy");
        fs::write(
            store.path(),
            r#"{"format": 1, "records": {
                "rules": [{"user_id": "alice", "rule": "No work emails after 6pm"}],
                "drinks": [{"user_id": "alice", "pub": "The Oak"}],
                "photos": [{"uploader": "alice", "likes": "lots"}]
            }}"#,
        )
        .unwrap();

        let document = store.load().unwrap();
        assert_eq!(document.revision, 0);
        assert_eq!(document.records.drinks[0].drink_type, DrinkType::Guinness);
        assert_eq!(document.records.photos[0].likes, 0);
        let _ = fs::remove_file(store.path());
    }

    #[test]
    fn test_out_of_range_amounts_load_as_zero() {
        let store = temp_store("amounts");
        fs::write(
            store.path(),
            r#"{"format": 1, "records": {
                "rules": [{"author": "bob", "text": "Rounds go clockwise"}],
                "bets": [
                    {"bettor": "bob", "stake": "-1e300", "payout": "1e300", "result": "WIN"},
                    {"bettor": "bob", "stake": "-5", "result": "LOSS"}
                ],
                "side_bets": [{"creator": "bob", "taker": "eve", "stake": 1e12, "result": "WIN"}]
            }}"#,
        )
        .unwrap();

        let records = load_records(&store).unwrap();
        assert!(records.bets.iter().all(|b| b.stake == 0.0 && b.payout == 0.0));
        assert_eq!(records.side_bets[0].stake, 0.0);

        let board = crate::scoring::calculate_leaderboard(&records, &Default::default());
        assert_eq!(board[0].score, 10);

        let _ = fs::remove_file(store.path());
    }
}
