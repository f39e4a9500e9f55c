use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::warn;

/// The default bucket for transactions no keyword matches.
///
/// This category is always present in a [`CategoryStore`] and cannot be removed.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Possible errors to occur during category store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("there is no category named '{0}'")]
    UnknownCategory(String),
    #[error("unable to access the category file at {path}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("the category file at {path} does not contain a valid category mapping")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A user-defined label for grouping transactions, backed by the list of
/// keywords used for automatic matching.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Category {
    name: String,
    keywords: Vec<String>,
}

impl Category {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            keywords: Vec::new(),
        }
    }

    /// The unique name of the category, also used as its display label
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The keywords associated with this category, in the order they were added
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }
}

/// The collection of all known categories and their keywords
///
/// Categories are kept in insertion order. That order is significant: the
/// classifier returns the first category holding a matching keyword, so the
/// order must survive a save/load round trip. The persisted form is a JSON
/// object mapping category names to keyword arrays, written and read in
/// entry order.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CategoryStore {
    categories: Vec<Category>,
}

impl Default for CategoryStore {
    fn default() -> Self {
        Self {
            categories: vec![Category::new(UNCATEGORIZED)],
        }
    }
}

impl CategoryStore {
    /// Loads the store from the persisted category file
    ///
    /// A missing file yields the default store. A file that cannot be read or
    /// parsed is reported as a warning and also yields the default store; the
    /// bad file is left in place untouched.
    pub fn load(path: impl AsRef<Path>) -> CategoryStore {
        let path = path.as_ref();
        if !path.exists() {
            return CategoryStore::default();
        }
        match Self::read(path) {
            Ok(store) => store,
            Err(e) => {
                warn!("unable to load the category file, using the default categories: {e}");
                CategoryStore::default()
            }
        }
    }

    fn read(path: &Path) -> Result<CategoryStore, StoreError> {
        let contents =
            std::fs::read_to_string(path).map_err(|source| StoreError::Persistence {
                path: path.to_path_buf(),
                source,
            })?;
        let mut store: CategoryStore =
            serde_json::from_str(&contents).map_err(|source| StoreError::Malformed {
                path: path.to_path_buf(),
                source,
            })?;
        if !store.contains(UNCATEGORIZED) {
            store.categories.insert(0, Category::new(UNCATEGORIZED));
        }
        Ok(store)
    }

    /// Serializes the full mapping to the category file, overwriting it
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        let path = path.as_ref();
        let contents =
            serde_json::to_string_pretty(self).map_err(|source| StoreError::Malformed {
                path: path.to_path_buf(),
                source,
            })?;
        std::fs::write(path, contents).map_err(|source| StoreError::Persistence {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Inserts a new category with an empty keyword list
    ///
    /// Returns whether the insertion occurred. Empty (or whitespace-only)
    /// names and names already present are rejected with `false`.
    pub fn add_category(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.contains(name) {
            return false;
        }
        self.categories.push(Category::new(name));
        true
    }

    /// Appends a keyword to an existing category
    ///
    /// The keyword is trimmed before it is stored, the same rule the
    /// classifier applies at lookup time. Returns `Ok(false)` without
    /// mutating when the trimmed keyword is empty or already present.
    pub fn add_keyword(&mut self, category: &str, keyword: &str) -> Result<bool, StoreError> {
        let index = self
            .position(category)
            .ok_or_else(|| StoreError::UnknownCategory(category.to_string()))?;
        let keyword = keyword.trim();
        let keywords = &mut self.categories[index].keywords;
        if keyword.is_empty() || keywords.iter().any(|k| k == keyword) {
            return Ok(false);
        }
        keywords.push(keyword.to_string());
        Ok(true)
    }

    /// Whether a category with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// The known category names, in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(Category::name)
    }

    /// The categories in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.categories.iter().position(|c| c.name == name)
    }
}

impl Serialize for CategoryStore {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.categories.len()))?;
        for category in &self.categories {
            map.serialize_entry(&category.name, &category.keywords)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CategoryStore {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct StoreVisitor;

        impl<'de> Visitor<'de> for StoreVisitor {
            type Value = CategoryStore;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "a map of category names to keyword lists")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                // entries arrive in document order, which is the order we keep
                let mut store = CategoryStore {
                    categories: Vec::new(),
                };
                while let Some((name, keywords)) = access.next_entry::<String, Vec<String>>()? {
                    if store.contains(&name) {
                        return Err(serde::de::Error::custom(format!(
                            "duplicate category '{name}'"
                        )));
                    }
                    store.categories.push(Category { name, keywords });
                }
                Ok(store)
            }
        }

        deserializer.deserialize_map(StoreVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_store_holds_only_uncategorized() {
        let store = CategoryStore::default();
        assert_eq!(store.names().collect::<Vec<_>>(), vec![UNCATEGORIZED]);
        assert!(store.contains(UNCATEGORIZED));
    }

    #[test]
    fn add_category() {
        let mut store = CategoryStore::default();
        assert!(store.add_category("Food"));
        assert!(store.contains("Food"));
        assert_eq!(
            store.names().collect::<Vec<_>>(),
            vec![UNCATEGORIZED, "Food"]
        );
    }

    #[test]
    fn add_category_rejects_duplicates_and_empty_names() {
        let mut store = CategoryStore::default();
        assert!(store.add_category("Food"));
        assert!(!store.add_category("Food"));
        assert!(!store.add_category(""));
        assert!(!store.add_category("   "));
        assert_eq!(store.names().count(), 2);
    }

    #[test]
    fn add_keyword_trims_and_deduplicates() {
        let mut store = CategoryStore::default();
        store.add_category("Food");
        assert!(store.add_keyword("Food", "  Coffee Shop  ").unwrap());
        assert!(!store.add_keyword("Food", "Coffee Shop").unwrap());
        assert!(!store.add_keyword("Food", "   ").unwrap());

        let food = store.iter().find(|c| c.name() == "Food").unwrap();
        assert_eq!(food.keywords(), ["Coffee Shop"]);
    }

    #[test]
    fn add_keyword_to_unknown_category_fails_without_mutation() {
        let mut store = CategoryStore::default();
        let before = store.clone();
        let err = store.add_keyword("Food", "Coffee Shop").unwrap_err();
        assert!(matches!(err, StoreError::UnknownCategory(name) if name == "Food"));
        assert_eq!(store, before);
    }

    #[test]
    fn save_load_round_trip_preserves_order() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("categories.json");

        let mut store = CategoryStore::default();
        store.add_category("Travel");
        store.add_category("Food");
        store.add_keyword("Food", "Coffee Shop").unwrap();
        store.add_keyword("Food", "Bakery").unwrap();
        store.save(&path).unwrap();

        let loaded = CategoryStore::load(&path);
        assert_eq!(loaded, store);
        assert_eq!(
            loaded.names().collect::<Vec<_>>(),
            vec![UNCATEGORIZED, "Travel", "Food"]
        );
    }

    #[test]
    fn load_missing_file_yields_default() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = CategoryStore::load(dir.path().join("nope.json"));
        assert_eq!(store, CategoryStore::default());
    }

    #[test]
    fn load_malformed_file_falls_back_to_default() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("categories.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = CategoryStore::load(&path);
        assert_eq!(store, CategoryStore::default());
        // the bad file must not be overwritten by the fallback
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn load_injects_uncategorized_when_absent() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("categories.json");
        std::fs::write(&path, r#"{"Food": ["Coffee Shop"]}"#).unwrap();

        let store = CategoryStore::load(&path);
        assert_eq!(
            store.names().collect::<Vec<_>>(),
            vec![UNCATEGORIZED, "Food"]
        );
    }

    #[test]
    fn duplicate_category_in_file_is_malformed() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("categories.json");
        std::fs::write(&path, r#"{"Food": [], "Food": ["x"]}"#).unwrap();

        let store = CategoryStore::load(&path);
        assert_eq!(store, CategoryStore::default());
    }

    #[test]
    fn serialized_form_is_a_json_object_in_insertion_order() {
        let mut store = CategoryStore::default();
        store.add_category("Travel");
        store.add_category("Food");

        let json = serde_json::to_string(&store).unwrap();
        assert_eq!(json, r#"{"Uncategorized":[],"Travel":[],"Food":[]}"#);
    }
}
