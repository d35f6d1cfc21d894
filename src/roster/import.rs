use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::RosterError;
use crate::roster::store::{read_roster, RosterStore};

/// Suffix appended to an import file once it has been merged.
pub const IMPORTED_SUFFIX: &str = ".imported";

/// What happened to a pending import file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// No import file was present.
    NothingToImport,
    /// The file was merged and renamed.
    Imported {
        /// Records merged into the roster.
        records: usize,
        /// Where the processed file now lives.
        archived_to: PathBuf,
    },
}

/// Path an import file is renamed to after processing.
pub fn imported_marker_path(import_path: &Path) -> PathBuf {
    let mut marker = import_path.as_os_str().to_owned();
    marker.push(IMPORTED_SUFFIX);
    PathBuf::from(marker)
}

/// Merges a one-time import file into the roster and renames it so it is
/// not processed again. Existing records are overwritten.
///
/// A malformed file is left in place and reported as an error.
pub fn import_pending(store: &RosterStore, import_path: &Path) -> Result<ImportOutcome, RosterError> {
    let Some(incoming) = read_roster(import_path)? else {
        return Ok(ImportOutcome::NothingToImport);
    };

    let records = store.merge(incoming)?;
    let archived_to = imported_marker_path(import_path);
    std::fs::rename(import_path, &archived_to)?;

    info!(
        "Imported {} roster records from {} (archived to {})",
        records,
        import_path.display(),
        archived_to.display()
    );
    Ok(ImportOutcome::Imported { records, archived_to })
}

/// Startup wrapper: import failures are logged and startup continues.
pub fn import_on_startup(store: &RosterStore, import_path: &Path) {
    if let Err(e) = import_pending(store, import_path) {
        warn!(
            "Skipping roster import from {}: {}",
            import_path.display(),
            e
        );
    }
}
