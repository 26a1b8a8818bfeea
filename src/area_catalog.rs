// 🗾 Area Catalog - Flatten the JMA area directory
//
// The directory document carries two tiers keyed by code:
// - "centers": regional forecast centers
// - "offices": prefectural forecast offices
//
// Both are flattened into one list sorted by display name.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;

// ============================================================================
// AREA KIND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaKind {
    /// Regional forecast center
    Center,

    /// Prefectural forecast office
    Office,
}

impl AreaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AreaKind::Center => "center",
            AreaKind::Office => "office",
        }
    }

    /// Key of the directory mapping this kind is read from
    fn directory_key(&self) -> &'static str {
        match self {
            AreaKind::Center => "centers",
            AreaKind::Office => "offices",
        }
    }
}

// ============================================================================
// AREA ENTRY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaEntry {
    /// Directory code, also the forecast document key
    pub code: String,

    /// Display name (Japanese)
    pub name: String,

    pub kind: AreaKind,
}

impl AreaEntry {
    pub fn new(code: impl Into<String>, name: impl Into<String>, kind: AreaKind) -> Self {
        AreaEntry {
            code: code.into(),
            name: name.into(),
            kind,
        }
    }

    /// Label shown in pickers: "東京都 (130000)"
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.code)
    }

    fn display_order(&self, other: &Self) -> Ordering {
        self.name
            .cmp(&other.name)
            .then_with(|| self.code.cmp(&other.code))
            .then_with(|| self.kind.cmp(&other.kind))
    }
}

// ============================================================================
// BUILD
// ============================================================================

/// Flatten a raw area directory into entries sorted by name.
///
/// Missing or mistyped mappings contribute nothing; entries without a
/// non-empty string `name` are skipped. Never fails.
pub fn build_catalog(directory: &Value) -> Vec<AreaEntry> {
    let mut entries: Vec<AreaEntry> = [AreaKind::Center, AreaKind::Office]
        .iter()
        .flat_map(|kind| entries_of_kind(directory, *kind))
        .collect();

    entries.sort_by(|a, b| a.display_order(b));
    entries
}

fn entries_of_kind(directory: &Value, kind: AreaKind) -> Vec<AreaEntry> {
    let mapping = match directory.get(kind.directory_key()).and_then(Value::as_object) {
        Some(mapping) => mapping,
        None => return Vec::new(),
    };

    mapping
        .iter()
        .filter_map(|(code, info)| {
            let name = info.get("name").and_then(Value::as_str)?;
            if name.is_empty() {
                return None;
            }
            Some(AreaEntry::new(code.as_str(), name, kind))
        })
        .collect()
}

// ============================================================================
// CATALOG
// ============================================================================

/// Sorted, read-only area list for one selection session
#[derive(Debug, Clone, Default)]
pub struct AreaCatalog {
    entries: Vec<AreaEntry>,
}

impl AreaCatalog {
    pub fn from_directory(directory: &Value) -> Self {
        AreaCatalog {
            entries: build_catalog(directory),
        }
    }

    pub fn entries(&self) -> &[AreaEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find an entry by its directory code
    pub fn find(&self, code: &str) -> Option<&AreaEntry> {
        self.entries.iter().find(|e| e.code == code)
    }

    /// Entries whose name contains `query` or whose code starts with it.
    /// An empty query matches everything.
    pub fn search(&self, query: &str) -> Vec<&AreaEntry> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.entries.iter().collect();
        }

        self.entries
            .iter()
            .filter(|e| e.name.to_lowercase().contains(&query) || e.code.starts_with(&query))
            .collect()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_center_and_office_sorted_by_name() {
        let directory = json!({
            "centers": { "A": { "name": "Tokyo" } },
            "offices": { "B": { "name": "Osaka" } }
        });

        let catalog = build_catalog(&directory);

        assert_eq!(
            catalog,
            vec![
                AreaEntry::new("B", "Osaka", AreaKind::Office),
                AreaEntry::new("A", "Tokyo", AreaKind::Center),
            ]
        );
    }

    #[test]
    fn test_missing_mappings_yield_empty_catalog() {
        assert!(build_catalog(&json!({})).is_empty());
        assert!(build_catalog(&json!({ "class10s": { "X": { "name": "ignored" } } })).is_empty());
    }

    #[test]
    fn test_only_one_mapping_present() {
        let directory = json!({ "offices": { "130000": { "name": "東京都" } } });
        let catalog = build_catalog(&directory);

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].kind, AreaKind::Office);
        assert_eq!(catalog[0].code, "130000");
    }

    #[test]
    fn test_entries_without_usable_name_are_skipped() {
        let directory = json!({
            "centers": {
                "010100": { "name": "北海道地方" },
                "010200": { "enName": "Tohoku" },
                "010300": { "name": "" },
                "010400": { "name": 42 }
            },
            "offices": "not a mapping"
        });

        let catalog = build_catalog(&directory);

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].name, "北海道地方");
    }

    #[test]
    fn test_equal_names_ordered_by_code() {
        let directory = json!({
            "centers": { "200": { "name": "Same" } },
            "offices": { "100": { "name": "Same" } }
        });

        let catalog = build_catalog(&directory);
        let codes: Vec<&str> = catalog.iter().map(|e| e.code.as_str()).collect();

        assert_eq!(codes, vec!["100", "200"]);
        assert_eq!(build_catalog(&directory), catalog);
    }

    #[test]
    fn test_catalog_find_and_search() {
        let directory = json!({
            "centers": { "010300": { "name": "関東甲信地方" } },
            "offices": {
                "130000": { "name": "東京都" },
                "140000": { "name": "神奈川県" },
                "270000": { "name": "大阪府" }
            }
        });
        let catalog = AreaCatalog::from_directory(&directory);

        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.find("270000").map(|e| e.name.as_str()), Some("大阪府"));
        assert!(catalog.find("999999").is_none());

        let tokyo = catalog.search("東京");
        assert_eq!(tokyo.len(), 1);
        assert_eq!(tokyo[0].label(), "東京都 (130000)");

        assert_eq!(catalog.search("1").len(), 2);
        assert_eq!(catalog.search("  ").len(), 4);
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(AreaKind::Center.as_str(), "center");
        assert_eq!(AreaKind::Office.as_str(), "office");
    }
}
