use crate::catalog::tests::license;
use crate::catalog::types::{ConflictPair, LicenseAccess};
use crate::queue::tests::task;
use crate::scanner::types::{ComponentInfo, ScannedFile};
use crate::scm::github::report_status;
use crate::scm::report::ScanReport;

fn scanned(path: &str, matched_lines: &str, access: LicenseAccess) -> ScannedFile {
    ScannedFile {
        path: path.to_string(),
        absolute_path: format!("/work/{path}").into(),
        snippet_type: Some("snippet".to_string()),
        snippet_match: Some("80%".to_string()),
        matched_lines: matched_lines.to_string(),
        licenses: vec![license("MIT", "MIT License", access)],
        component: ComponentInfo {
            name: Some("zlib".to_string()),
            file_path: Some("zlib/inflate.c".to_string()),
            url: Some("https://github.com/madler/zlib".to_string()),
            ..ComponentInfo::default()
        },
    }
}

#[test]
fn empty_report_has_no_issue_and_no_body() {
    let report = ScanReport::default();
    assert!(report.is_empty());
    assert!(!report.has_issue());
    assert!(report.to_markdown(&task(1)).is_empty());
}

#[test]
fn permitted_licenses_without_conflicts_are_clean() {
    let report = ScanReport {
        files: vec![scanned("src/a.c", "all", LicenseAccess::Permitted)],
        conflicts: vec![],
        repository_license: Some("MIT".to_string()),
        ..ScanReport::default()
    };
    assert!(!report.has_issue());
}

#[test]
fn flagged_access_classifications_raise_an_issue() {
    for access in [
        LicenseAccess::Prohibited,
        LicenseAccess::Restricted,
        LicenseAccess::Unreviewed,
    ] {
        let report = ScanReport {
            files: vec![scanned("src/a.c", "all", access.clone())],
            conflicts: vec![],
            repository_license: None,
            ..ScanReport::default()
        };
        assert!(report.has_issue(), "{access:?} should flag an issue");
    }
}

#[test]
fn commit_status_tells_no_files_apart_from_a_clean_scan() {
    assert_eq!(
        report_status(&ScanReport::without_files()),
        ("success", "Files are not found")
    );
    assert_eq!(
        report_status(&ScanReport::default()),
        ("success", "No license issues detected")
    );
    let flagged = ScanReport {
        conflicts: vec![ConflictPair::new("MIT", "GPL-3.0-only")],
        ..ScanReport::default()
    };
    assert_eq!(report_status(&flagged), ("failure", "License issues detected"));
}

#[test]
fn any_conflict_raises_an_issue() {
    let report = ScanReport {
        files: vec![scanned("src/a.c", "all", LicenseAccess::Permitted)],
        conflicts: vec![ConflictPair::new("MIT", "GPL-3.0-only")],
        repository_license: Some("GPL-3.0-only".to_string()),
        ..ScanReport::default()
    };
    assert!(report.has_issue());
}

#[test]
fn markdown_links_whole_file_matches_to_the_head_commit() {
    let report = ScanReport {
        files: vec![scanned("src/a.c", "all", LicenseAccess::Permitted)],
        conflicts: vec![],
        repository_license: None,
        ..ScanReport::default()
    };
    let body = report.to_markdown(&task(1));
    assert!(body.contains("**File:** src/a.c"));
    assert!(body.contains("**Component:** zlib (zlib/inflate.c)"));
    assert!(body.contains(
        "[all](https://github.com/acme/widget/blob/0123abcd/src/a.c)"
    ));
}

#[test]
fn markdown_links_each_line_range_with_an_anchor() {
    let report = ScanReport {
        files: vec![scanned("src/a.c", "12-30,45-60", LicenseAccess::Permitted)],
        conflicts: vec![],
        repository_license: None,
        ..ScanReport::default()
    };
    let body = report.to_markdown(&task(1));
    assert!(body.contains(
        "[12-30](https://github.com/acme/widget/blob/0123abcd/src/a.c#L12L30)"
    ));
    assert!(body.contains(
        "[45-60](https://github.com/acme/widget/blob/0123abcd/src/a.c#L45L60)"
    ));
}

#[test]
fn markdown_lists_conflicts_and_the_repository_license() {
    let report = ScanReport {
        files: vec![],
        conflicts: vec![
            ConflictPair::new("GPL-3.0-only", "Apache-2.0"),
            ConflictPair::new("GPL-3.0-only", "Proprietary"),
        ],
        repository_license: Some("Proprietary".to_string()),
        ..ScanReport::default()
    };
    let body = report.to_markdown(&task(1));
    assert!(body.contains("**Detected license conflicts:**"));
    assert!(body.contains("<li>GPL-3.0-only and Apache-2.0</li>"));
    assert!(body.contains("<li>GPL-3.0-only and Proprietary</li>"));
    assert!(body.contains("Repository license: Proprietary"));
}
