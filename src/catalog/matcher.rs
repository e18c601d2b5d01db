//! Conflict matching between detected licenses and the repository license

use crate::catalog::catalog::LicenseCatalog;
use crate::catalog::types::ConflictPair;
use crate::scanner::types::ScannedFile;

impl LicenseCatalog {
    /// Match every detected license against the repository license and
    /// against every other detected license, returning each known
    /// conflict pair at most once. An empty scan or an empty conflict
    /// table short-circuits to no conflicts.
    pub fn find_conflicts(
        &self,
        repository_license: Option<&str>,
        scan_results: &[ScannedFile],
    ) -> Vec<ConflictPair> {
        let snapshot = self.snapshot();
        if scan_results.is_empty() || snapshot.conflicts.is_empty() {
            return Vec::new();
        }

        // dedupe detected identifiers, preserving first-seen order
        let mut detected: Vec<String> = Vec::new();
        for file in scan_results {
            for license in &file.licenses {
                if !detected.iter().any(|d| d == &license.spdx_id) {
                    detected.push(license.spdx_id.clone());
                }
            }
        }

        // re-resolve the repository license so name-form values ("MIT
        // License") compare by SPDX identifier like detected ones do
        let repo_spdx = repository_license.map(|raw| {
            self.find_by_spdx(raw)
                .or_else(|| self.find_by_name(raw))
                .map(|l| l.spdx_id)
                .unwrap_or_else(|| raw.to_string())
        });

        let mut found: Vec<ConflictPair> = Vec::new();
        let known = |pair: &ConflictPair| snapshot.conflicts.contains(pair);

        if let Some(repo) = &repo_spdx {
            for spdx_id in &detected {
                let pair = ConflictPair::new(spdx_id, repo);
                if known(&pair) && !found.contains(&pair) {
                    found.push(pair);
                }
            }
        }

        for i in 0..detected.len() {
            for j in (i + 1)..detected.len() {
                let pair = ConflictPair::new(&detected[i], &detected[j]);
                if known(&pair) && !found.contains(&pair) {
                    found.push(pair);
                }
            }
        }

        found
    }
}
