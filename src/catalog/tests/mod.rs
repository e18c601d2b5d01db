mod matcher_tests;

use crate::catalog::types::{ConflictPair, License, LicenseAccess};
use crate::store::{LicenseStore, StoreResult};
use std::sync::Mutex;

/// In-memory license store for catalog tests
pub(crate) struct MemoryLicenseStore {
    pub licenses: Mutex<Vec<License>>,
    pub conflicts: Mutex<Vec<ConflictPair>>,
    pub fail_loads: bool,
}

impl MemoryLicenseStore {
    pub fn new(licenses: Vec<License>, conflicts: Vec<ConflictPair>) -> Self {
        Self {
            licenses: Mutex::new(licenses),
            conflicts: Mutex::new(conflicts),
            fail_loads: false,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new())
    }
}

impl LicenseStore for MemoryLicenseStore {
    fn load_licenses(&self) -> StoreResult<Vec<License>> {
        if self.fail_loads {
            return Err(crate::store::StoreError::Io {
                path: "licenses.json".into(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
            });
        }
        Ok(self.licenses.lock().unwrap().clone())
    }

    fn load_conflicts(&self) -> StoreResult<Vec<ConflictPair>> {
        if self.fail_loads {
            return Err(crate::store::StoreError::Io {
                path: "conflicts.json".into(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
            });
        }
        Ok(self.conflicts.lock().unwrap().clone())
    }

    fn save_license(&self, license: &License) -> StoreResult<License> {
        let mut licenses = self.licenses.lock().unwrap();
        let next_id = licenses.iter().filter_map(|l| l.id).max().unwrap_or(0) + 1;
        let mut saved = license.clone();
        saved.id = Some(next_id);
        licenses.push(saved.clone());
        Ok(saved)
    }
}

pub(crate) fn license(spdx_id: &str, name: &str, access: LicenseAccess) -> License {
    License {
        id: None,
        name: name.to_string(),
        spdx_id: spdx_id.to_string(),
        access,
        alternative_names: None,
        checklist_url: None,
    }
}
