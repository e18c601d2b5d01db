//! In-memory license catalog with snapshot-swap refresh
//!
//! The catalog keeps an immutable snapshot of all known licenses and
//! conflict pairs behind an `Arc`. Readers clone the `Arc` and work on a
//! consistent view; refresh and registration build a new snapshot and
//! swap it in under a short write lock.

use crate::catalog::types::{ConflictPair, License};
use crate::store::LicenseStore;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use strum_macros::{Display, EnumString};

/// Where conflict pairs come from: the persistent store, or the
/// scanner's own conflict reporting at scan time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize, Deserialize)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ConflictSource {
    #[default]
    #[strum(serialize = "db")]
    #[serde(rename = "db")]
    Store,
    #[strum(serialize = "scanner")]
    Scanner,
}

/// One consistent view of the catalog contents
#[derive(Debug, Default)]
pub struct CatalogSnapshot {
    pub licenses: Vec<License>,
    pub conflicts: Vec<ConflictPair>,
}

pub struct LicenseCatalog {
    store: Arc<dyn LicenseStore>,
    snapshot: RwLock<Arc<CatalogSnapshot>>,
    conflict_source: ConflictSource,
}

impl LicenseCatalog {
    pub fn new(store: Arc<dyn LicenseStore>, conflict_source: ConflictSource) -> Self {
        Self {
            store,
            snapshot: RwLock::new(Arc::new(CatalogSnapshot::default())),
            conflict_source,
        }
    }

    pub fn conflict_source(&self) -> ConflictSource {
        self.conflict_source
    }

    /// Reload licenses and conflict pairs from the store. Load failures
    /// are logged and leave that part of the snapshot empty rather than
    /// failing startup; a catalog-less run still scans, it just cannot
    /// classify or match conflicts.
    pub fn load(&self) {
        let licenses = match self.store.load_licenses() {
            Ok(licenses) => licenses,
            Err(e) => {
                log::warn!("failed to load licenses: {e}");
                Vec::new()
            }
        };
        let conflicts = if self.conflict_source == ConflictSource::Store {
            match self.store.load_conflicts() {
                Ok(pairs) => {
                    let mut unique: Vec<ConflictPair> = Vec::with_capacity(pairs.len());
                    for pair in pairs {
                        if !unique.contains(&pair) {
                            unique.push(pair);
                        }
                    }
                    unique
                }
                Err(e) => {
                    log::warn!("failed to load license conflicts: {e}");
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };
        log::info!(
            "license catalog loaded: {} licenses, {} conflict pairs",
            licenses.len(),
            conflicts.len()
        );
        let next = Arc::new(CatalogSnapshot { licenses, conflicts });
        *self
            .snapshot
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = next;
    }

    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        Arc::clone(
            &self
                .snapshot
                .read()
                .unwrap_or_else(|poisoned| poisoned.into_inner()),
        )
    }

    /// Exact SPDX identifier lookup, case-insensitive.
    pub fn find_by_spdx(&self, spdx_id: &str) -> Option<License> {
        let snapshot = self.snapshot();
        snapshot
            .licenses
            .iter()
            .find(|l| l.spdx_id.eq_ignore_ascii_case(spdx_id))
            .cloned()
    }

    /// Lookup by full license name, falling back to each license's
    /// alternative names, all case-insensitive.
    pub fn find_by_name(&self, name: &str) -> Option<License> {
        let snapshot = self.snapshot();
        for license in &snapshot.licenses {
            if license.name.eq_ignore_ascii_case(name) {
                return Some(license.clone());
            }
            if license
                .alternative_name_iter()
                .any(|alt| alt.eq_ignore_ascii_case(name))
            {
                return Some(license.clone());
            }
        }
        None
    }

    /// Resolve a scanner-reported SPDX identifier. A trailing `+`
    /// (older scanner convention for "this version or any later") is
    /// retried as the modern `-or-later` suffix, then as `-only`.
    pub fn check_license(&self, spdx_id: &str) -> Option<License> {
        if let Some(license) = self.find_by_spdx(spdx_id) {
            return Some(license);
        }
        if let Some(base) = spdx_id.strip_suffix('+') {
            if let Some(license) = self.find_by_spdx(&format!("{base}-or-later")) {
                return Some(license);
            }
            if let Some(license) = self.find_by_spdx(&format!("{base}-only")) {
                return Some(license);
            }
        }
        None
    }

    /// Record a scanner-reported conflict pair. Already-known pairs
    /// (in either orientation) are ignored.
    pub fn add_conflict(&self, first: &str, second: &str) {
        let pair = ConflictPair::new(first, second);
        let mut guard = self
            .snapshot
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if guard.conflicts.contains(&pair) {
            return;
        }
        let mut next = CatalogSnapshot {
            licenses: guard.licenses.clone(),
            conflicts: guard.conflicts.clone(),
        };
        next.conflicts.push(pair);
        *guard = Arc::new(next);
    }

    /// Look up a license by SPDX identifier, registering it as an
    /// unreviewed entry when unknown so later scans resolve it
    /// consistently. Persistence failures are logged; the unpersisted
    /// license is still added to the snapshot for this run.
    pub fn register_license(&self, spdx_id: &str, name: &str) -> License {
        if let Some(license) = self.find_by_spdx(spdx_id) {
            return license;
        }
        let candidate = License::unreviewed(spdx_id, name);
        let saved = match self.store.save_license(&candidate) {
            Ok(saved) => saved,
            Err(e) => {
                log::error!("failed to persist new license {spdx_id}: {e}");
                candidate
            }
        };
        log::info!(
            "new license detected and added to the catalog: {}",
            saved.spdx_id
        );
        let mut guard = self
            .snapshot
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        // a concurrent register may have won the race for the same id
        if let Some(existing) = guard
            .licenses
            .iter()
            .find(|l| l.spdx_id.eq_ignore_ascii_case(spdx_id))
        {
            return existing.clone();
        }
        let mut next = CatalogSnapshot {
            licenses: guard.licenses.clone(),
            conflicts: guard.conflicts.clone(),
        };
        next.licenses.push(saved.clone());
        *guard = Arc::new(next);
        saved
    }
}
