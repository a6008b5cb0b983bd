//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    pub const ACTIVITY_CATALOG: &str = "activity_catalog";
    /// Per-date ordered plans, upserted by `(user_id, date)`
    pub const PLANS: &str = "plans";
    /// Per-date completion maps, upserted by `(user_id, date)`
    pub const COMPLETIONS: &str = "completions";
}
