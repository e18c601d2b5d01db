use super::{license, MemoryLicenseStore};
use crate::catalog::catalog::{ConflictSource, LicenseCatalog};
use crate::catalog::types::{ConflictPair, License, LicenseAccess};
use crate::scanner::types::{ComponentInfo, ScannedFile};
use std::sync::Arc;

fn scanned(path: &str, licenses: Vec<License>) -> ScannedFile {
    ScannedFile {
        path: path.to_string(),
        absolute_path: format!("/tmp/{path}").into(),
        snippet_type: Some("file".to_string()),
        snippet_match: Some("100%".to_string()),
        matched_lines: "all".to_string(),
        licenses,
        component: ComponentInfo::default(),
    }
}

fn catalog() -> LicenseCatalog {
    let store = MemoryLicenseStore::new(
        vec![
            license("MIT", "MIT License", LicenseAccess::Permitted),
            license("Apache-2.0", "Apache License 2.0", LicenseAccess::Permitted),
            license("GPL-3.0-only", "GNU GPL v3.0 only", LicenseAccess::Prohibited),
            license("Proprietary", "Proprietary License", LicenseAccess::Prohibited),
        ],
        vec![
            ConflictPair::new("GPL-3.0-only", "Apache-2.0"),
            ConflictPair::new("GPL-3.0-only", "Proprietary"),
        ],
    );
    let catalog = LicenseCatalog::new(Arc::new(store), ConflictSource::Store);
    catalog.load();
    catalog
}

#[test]
fn empty_scan_yields_no_conflicts() {
    let catalog = catalog();
    assert!(catalog.find_conflicts(Some("Proprietary"), &[]).is_empty());
}

#[test]
fn empty_conflict_table_short_circuits() {
    let store = MemoryLicenseStore::new(
        vec![license("GPL-3.0-only", "GNU GPL v3.0 only", LicenseAccess::Prohibited)],
        vec![],
    );
    let catalog = LicenseCatalog::new(Arc::new(store), ConflictSource::Store);
    catalog.load();
    let files = [scanned(
        "src/a.c",
        vec![license("GPL-3.0-only", "GNU GPL v3.0 only", LicenseAccess::Prohibited)],
    )];
    assert!(catalog.find_conflicts(Some("Proprietary"), &files).is_empty());
}

#[test]
fn detected_license_conflicting_with_repository_license_is_reported() {
    let catalog = catalog();
    let files = [scanned(
        "src/a.c",
        vec![license("GPL-3.0-only", "GNU GPL v3.0 only", LicenseAccess::Prohibited)],
    )];
    let conflicts = catalog.find_conflicts(Some("Proprietary"), &files);
    assert_eq!(conflicts, vec![ConflictPair::new("GPL-3.0-only", "Proprietary")]);
}

#[test]
fn repository_license_given_by_name_is_resolved_to_spdx() {
    let catalog = catalog();
    let files = [scanned(
        "src/a.c",
        vec![license("GPL-3.0-only", "GNU GPL v3.0 only", LicenseAccess::Prohibited)],
    )];
    let conflicts = catalog.find_conflicts(Some("Proprietary License"), &files);
    assert_eq!(conflicts, vec![ConflictPair::new("GPL-3.0-only", "Proprietary")]);
}

#[test]
fn pairwise_conflicts_between_detected_licenses_are_reported_once() {
    let catalog = catalog();
    let files = [
        scanned(
            "src/a.c",
            vec![license("GPL-3.0-only", "GNU GPL v3.0 only", LicenseAccess::Prohibited)],
        ),
        scanned(
            "src/b.c",
            vec![license("Apache-2.0", "Apache License 2.0", LicenseAccess::Permitted)],
        ),
        scanned(
            "src/c.c",
            vec![
                license("GPL-3.0-only", "GNU GPL v3.0 only", LicenseAccess::Prohibited),
                license("Apache-2.0", "Apache License 2.0", LicenseAccess::Permitted),
            ],
        ),
    ];
    let conflicts = catalog.find_conflicts(None, &files);
    assert_eq!(conflicts, vec![ConflictPair::new("GPL-3.0-only", "Apache-2.0")]);
}

#[test]
fn conflict_detection_is_orientation_independent() {
    let catalog = catalog();
    let gpl = license("GPL-3.0-only", "GNU GPL v3.0 only", LicenseAccess::Prohibited);
    let apache = license("Apache-2.0", "Apache License 2.0", LicenseAccess::Permitted);
    let forward = catalog.find_conflicts(
        None,
        &[scanned("a.c", vec![gpl.clone()]), scanned("b.c", vec![apache.clone()])],
    );
    let reverse = catalog.find_conflicts(
        None,
        &[scanned("a.c", vec![apache]), scanned("b.c", vec![gpl])],
    );
    assert_eq!(forward.len(), 1);
    assert_eq!(reverse.len(), 1);
    assert_eq!(forward[0], reverse[0]);
}

#[test]
fn permissive_mix_without_table_entry_is_clean() {
    // MIT alongside Apache-2.0 with no conflict row between them
    let catalog = catalog();
    let files = [
        scanned("a.rs", vec![license("MIT", "MIT License", LicenseAccess::Permitted)]),
        scanned(
            "b.rs",
            vec![license("Apache-2.0", "Apache License 2.0", LicenseAccess::Permitted)],
        ),
    ];
    assert!(catalog.find_conflicts(Some("MIT"), &files).is_empty());
}
