pub mod import;
pub mod models;
pub mod store;

pub use import::{import_on_startup, import_pending, ImportOutcome};
pub use models::{Member, MemberRecord, Roster, RosterStats};
pub use store::RosterStore;
