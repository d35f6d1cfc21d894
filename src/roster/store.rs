use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::error::RosterError;
use crate::roster::models::{Member, MemberRecord, Roster, RosterStats};
use crate::utils::logging::{log_roster_error, log_roster_operation};

const TEMP_FILE_SUFFIX: &str = ".tmp";

/// File-backed member roster shared by every handler and scheduled job.
///
/// Every write persists the whole roster with a temp-file-and-rename so a
/// crash mid-write leaves the previous file intact. The mutex covers the
/// reload-modify-persist cycle.
pub struct RosterStore {
    path: PathBuf,
    roster: Mutex<Roster>,
    last_persist_ok: AtomicBool,
}

impl RosterStore {
    /// Opens the roster at `path`. A missing or unreadable file yields an
    /// empty roster.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let roster = match read_roster(&path) {
            Ok(Some(roster)) => {
                let stats = roster.stats();
                info!(
                    "Loaded roster from {} ({} chats, {} members)",
                    path.display(),
                    stats.chats,
                    stats.members
                );
                roster
            }
            Ok(None) => {
                info!("No roster at {}, starting empty", path.display());
                Roster::default()
            }
            Err(e) => {
                warn!("Failed to load roster from {}: {}, starting empty", path.display(), e);
                Roster::default()
            }
        };

        Self {
            path,
            roster: Mutex::new(roster),
            last_persist_ok: AtomicBool::new(true),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Inserts or overwrites one member and persists the whole roster.
    ///
    /// The in-memory roster is updated even when persisting fails; the error
    /// is returned so the caller can decide whether to surface it.
    pub fn upsert(
        &self,
        chat_id: i64,
        member_id: i64,
        handle: Option<&str>,
        display_name: &str,
    ) -> Result<(), RosterError> {
        let mut roster = self.lock();
        self.refresh(&mut roster);
        roster.upsert(chat_id, member_id, MemberRecord::new(handle, display_name));
        log_roster_operation(
            "upsert",
            chat_id,
            Some(&format!("member {member_id}")),
        );
        self.persist(&roster)
    }

    /// All known members of a chat, ordered by member id.
    pub fn get_all(&self, chat_id: i64) -> Vec<Member> {
        let mut roster = self.lock();
        self.refresh(&mut roster);
        roster.members(chat_id)
    }

    /// Merges a whole roster in with a single persist. Returns the number of
    /// records written.
    pub fn merge(&self, incoming: Roster) -> Result<usize, RosterError> {
        let mut roster = self.lock();
        self.refresh(&mut roster);
        let merged = roster.merge(incoming);
        self.persist(&roster)?;
        Ok(merged)
    }

    /// Replaces the in-memory roster with the file contents.
    pub fn reload(&self) -> Result<(), RosterError> {
        let mut roster = self.lock();
        *roster = read_roster(&self.path)?.unwrap_or_default();
        Ok(())
    }

    /// Snapshot of the in-memory roster.
    pub fn snapshot(&self) -> Roster {
        self.lock().clone()
    }

    pub fn stats(&self) -> RosterStats {
        self.lock().stats()
    }

    /// Runs `op` on the blocking thread pool. Async callers go through this
    /// so the file I/O of a store operation never stalls a runtime worker.
    pub async fn run_blocking<T, F>(self: &Arc<Self>, op: F) -> Result<T, RosterError>
    where
        F: FnOnce(&RosterStore) -> T + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(self);
        Ok(tokio::task::spawn_blocking(move || op(&store)).await?)
    }

    /// Whether the most recent write reached disk.
    pub fn last_persist_ok(&self) -> bool {
        self.last_persist_ok.load(Ordering::Relaxed)
    }

    fn lock(&self) -> MutexGuard<'_, Roster> {
        self.roster.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Picks up external edits to the file. Skipped while the last write
    /// failed, since the file is then older than memory.
    fn refresh(&self, roster: &mut Roster) {
        if !self.last_persist_ok() {
            debug!("Skipping roster reload, last persist failed");
            return;
        }
        match read_roster(&self.path) {
            Ok(Some(fresh)) => *roster = fresh,
            Ok(None) => {}
            Err(e) => warn!("Keeping in-memory roster, reload failed: {}", e),
        }
    }

    fn persist(&self, roster: &Roster) -> Result<(), RosterError> {
        let result = roster
            .to_json()
            .map_err(RosterError::from)
            .and_then(|json| write_atomic(&self.path, json.as_bytes()));

        match &result {
            Ok(()) => self.last_persist_ok.store(true, Ordering::Relaxed),
            Err(e) => {
                self.last_persist_ok.store(false, Ordering::Relaxed);
                log_roster_error("persist", &e.to_string(), Some(&self.path.display().to_string()));
            }
        }
        result
    }
}

/// Reads a roster file. `Ok(None)` when the file does not exist.
pub fn read_roster(path: &Path) -> Result<Option<Roster>, RosterError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    if text.trim().is_empty() {
        return Ok(Some(Roster::default()));
    }
    Ok(Some(Roster::from_json(&text)?))
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), RosterError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(TEMP_FILE_SUFFIX);
    let tmp = PathBuf::from(tmp);
    let written = std::fs::write(&tmp, bytes).and_then(|()| std::fs::rename(&tmp, path));
    if let Err(e) = written {
        if let Err(cleanup) = std::fs::remove_file(&tmp) {
            debug!("Could not remove {}: {}", tmp.display(), cleanup);
        }
        return Err(e.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> RosterStore {
        RosterStore::open(dir.path().join("members.json"))
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(store.get_all(100).is_empty());
        assert!(store.last_persist_ok());
    }

    #[test]
    fn test_malformed_file_is_empty() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("members.json"), "{ not json").unwrap();
        let store = store_in(&dir);
        assert_eq!(store.stats(), RosterStats::default());
    }

    #[test]
    fn test_upsert_persists_and_reopens() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.upsert(100, 7, Some("alice"), "Alice A").unwrap();

        let reopened = store_in(&dir);
        let members = reopened.get_all(100);
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].mention(), "@alice");
        assert!(!dir.path().join("members.json.tmp").exists());
    }

    #[test]
    fn test_upsert_sees_external_edits() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.upsert(1, 1, None, "One").unwrap();

        std::fs::write(
            store.path(),
            r#"{"1": {"1": {"handle": null, "display_name": "One"}, "2": {"handle": "two", "display_name": "Two"}}}"#,
        )
        .unwrap();
        store.upsert(1, 3, None, "Three").unwrap();

        let ids: Vec<i64> = store.get_all(1).iter().map(|m| m.member_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_persist_failure_keeps_memory() {
        let dir = TempDir::new().unwrap();
        // A directory at the target path makes the rename fail.
        let path = dir.path().join("members.json");
        std::fs::create_dir(&path).unwrap();
        let store = RosterStore::open(&path);

        assert!(store.upsert(5, 1, None, "Kept").is_err());
        assert!(!store.last_persist_ok());
        assert_eq!(store.get_all(5)[0].display_name, "Kept");
        assert!(!dir.path().join("members.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_run_blocking_from_async_context() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(store_in(&dir));

        store
            .run_blocking(|s| s.upsert(3, 4, Some("dana"), "Dana"))
            .await
            .unwrap()
            .unwrap();
        let members = store.run_blocking(|s| s.get_all(3)).await.unwrap();

        assert_eq!(members.len(), 1);
        assert_eq!(members[0].mention(), "@dana");
        assert!(dir.path().join("members.json").exists());
    }

    #[test]
    fn test_reload_replaces_memory_with_file() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.upsert(1, 1, None, "One").unwrap();

        std::fs::write(
            store.path(),
            r#"{"2": {"9": {"handle": "nine", "display_name": "Nine"}}}"#,
        )
        .unwrap();
        store.reload().unwrap();

        let snapshot = store.snapshot();
        assert_eq!(snapshot.chat_ids(), vec![2]);
        assert_eq!(snapshot.members(2)[0].mention(), "@nine");
        assert!(snapshot.members(1).is_empty());
    }

    #[test]
    fn test_reload_reports_malformed_file_and_keeps_memory() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.upsert(1, 1, None, "One").unwrap();

        std::fs::write(store.path(), "{ not json").unwrap();
        assert!(matches!(store.reload(), Err(RosterError::Format(_))));
        assert_eq!(store.snapshot().stats().members, 1);
    }

    #[test]
    fn test_creates_parent_directory() {
        let dir = TempDir::new().unwrap();
        let store = RosterStore::open(dir.path().join("nested/data/members.json"));
        store.upsert(1, 2, None, "Nested").unwrap();
        assert!(dir.path().join("nested/data/members.json").exists());
    }
}
