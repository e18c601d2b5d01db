//! License catalog types
//!
//! `License` mirrors one row of the license catalog, `LicenseAccess` is the
//! policy classification attached to it, and `ConflictPair` is an unordered
//! pair of SPDX identifiers declared mutually incompatible.

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Policy classification attached to a license.
///
/// The well-known classifications are enumerated; anything else the backing
/// store carries (including the empty string) is preserved as `Other`.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    strum_macros::Display,
    strum_macros::EnumString,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive, serialize_all = "UPPERCASE")]
#[serde(from = "String", into = "String")]
pub enum LicenseAccess {
    Permitted,
    Restricted,
    Prohibited,
    Unreviewed,
    #[strum(default)]
    Other(String),
}

impl LicenseAccess {
    /// Whether a detected license with this classification flags the pull
    /// request as having an issue. An empty classification counts as
    /// unreviewed for this purpose.
    pub fn flags_issue(&self) -> bool {
        match self {
            LicenseAccess::Permitted => false,
            LicenseAccess::Restricted | LicenseAccess::Prohibited | LicenseAccess::Unreviewed => {
                true
            }
            LicenseAccess::Other(s) => s.trim().is_empty(),
        }
    }
}

impl From<String> for LicenseAccess {
    fn from(s: String) -> Self {
        s.parse().unwrap_or(LicenseAccess::Other(s))
    }
}

impl From<LicenseAccess> for String {
    fn from(access: LicenseAccess) -> Self {
        access.to_string()
    }
}

/// One known license from the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct License {
    /// Store-assigned identifier; None until first persisted
    pub id: Option<i64>,
    /// Display name, e.g. "MIT License"
    pub name: String,
    /// SPDX identifier, e.g. "MIT"
    pub spdx_id: String,
    /// Policy classification driving the issue flag
    pub access: LicenseAccess,
    /// Comma/semicolon separated alternative names, as stored
    pub alternative_names: Option<String>,
    /// Reference document describing the license obligations
    pub checklist_url: Option<String>,
}

impl License {
    /// Minimal license record for an identifier first seen in scanner output
    pub fn unreviewed(spdx_id: &str, name: &str) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            spdx_id: spdx_id.to_string(),
            access: LicenseAccess::Unreviewed,
            alternative_names: None,
            checklist_url: None,
        }
    }

    /// Iterate the alternative names, trimmed, split on `,` and `;`
    pub fn alternative_name_iter(&self) -> impl Iterator<Item = &str> {
        self.alternative_names
            .as_deref()
            .unwrap_or("")
            .split([',', ';'])
            .map(str::trim)
            .filter(|n| !n.is_empty())
    }
}

/// Unordered pair of SPDX identifiers declared incompatible.
///
/// Equality and hashing are symmetric: (A,B) == (B,A). A degenerate (A,A)
/// entry is permitted and still matches symmetrically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictPair {
    l1: String,
    l2: String,
}

impl ConflictPair {
    pub fn new<A: Into<String>, B: Into<String>>(l1: A, l2: B) -> Self {
        Self {
            l1: l1.into(),
            l2: l2.into(),
        }
    }

    pub fn first(&self) -> &str {
        &self.l1
    }

    pub fn second(&self) -> &str {
        &self.l2
    }

    /// The pair with sides in lexicographic order, used for hashing
    fn ordered(&self) -> (&str, &str) {
        if self.l1 <= self.l2 {
            (&self.l1, &self.l2)
        } else {
            (&self.l2, &self.l1)
        }
    }
}

impl PartialEq for ConflictPair {
    fn eq(&self, other: &Self) -> bool {
        (self.l1 == other.l1 && self.l2 == other.l2)
            || (self.l1 == other.l2 && self.l2 == other.l1)
    }
}

impl Eq for ConflictPair {}

impl Hash for ConflictPair {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Hash the ordered pair so hash agrees with the symmetric equality
        let (a, b) = self.ordered();
        a.hash(state);
        b.hash(state);
    }
}

impl std::fmt::Display for ConflictPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} and {}", self.l1, self.l2)
    }
}
