//! Salsa database for incremental phase builds

/// Database trait for phase queries
pub trait Db: salsa::Database {}

/// Main Salsa database implementation
///
/// Holds the schema document and per-phase rule inputs and memoizes:
/// - raw schema parsing
/// - phase schema builds
/// - schema fingerprints
#[salsa::db]
#[derive(Default, Clone)]
pub struct PhasegenDatabase {
    storage: salsa::Storage<Self>,
}

#[salsa::db]
impl salsa::Database for PhasegenDatabase {}

impl Db for PhasegenDatabase {}
