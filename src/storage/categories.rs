//! Category repository for JSON storage
//!
//! Manages loading and saving categories to categories.json and enforces
//! that no two categories share a title.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::TallyError;
use crate::models::{Category, CategoryId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable category data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct CategoryData {
    categories: Vec<Category>,
}

#[derive(Debug, Clone, Default)]
struct CategoryTable {
    categories: HashMap<CategoryId, Category>,
    /// Index: exact title -> id
    by_title: HashMap<String, CategoryId>,
}

impl CategoryTable {
    fn insert(&mut self, category: Category) -> Result<(), TallyError> {
        if self.by_title.contains_key(&category.title) {
            return Err(TallyError::Duplicate {
                entity_type: "Category",
                identifier: category.title,
            });
        }
        self.by_title.insert(category.title.clone(), category.id);
        self.categories.insert(category.id, category);
        Ok(())
    }

    fn sorted(&self) -> Vec<Category> {
        let mut list: Vec<_> = self.categories.values().cloned().collect();
        list.sort_by(|a, b| a.title.cmp(&b.title));
        list
    }

    fn to_data(&self) -> CategoryData {
        CategoryData {
            categories: self.sorted(),
        }
    }
}

/// Repository for category persistence
pub struct CategoryRepository {
    path: PathBuf,
    table: RwLock<CategoryTable>,
}

impl CategoryRepository {
    /// Create a new category repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            table: RwLock::new(CategoryTable::default()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, CategoryTable>, TallyError> {
        self.table
            .read()
            .map_err(|e| TallyError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, CategoryTable>, TallyError> {
        self.table
            .write()
            .map_err(|e| TallyError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    /// Load categories from disk
    pub fn load(&self) -> Result<(), TallyError> {
        let file_data: CategoryData = read_json(&self.path)?;

        let mut loaded = CategoryTable::default();
        for category in file_data.categories {
            loaded.insert(category).map_err(|e| {
                TallyError::Storage(format!("{} in {}", e, self.path.display()))
            })?;
        }

        *self.write()? = loaded;
        Ok(())
    }

    /// Save categories to disk
    pub fn save(&self) -> Result<(), TallyError> {
        let table = self.read()?;
        write_json_atomic(&self.path, &table.to_data())
    }

    /// Get a category by ID
    pub fn get(&self, id: CategoryId) -> Result<Option<Category>, TallyError> {
        Ok(self.read()?.categories.get(&id).cloned())
    }

    /// Get a category by its exact title
    pub fn get_by_title(&self, title: &str) -> Result<Option<Category>, TallyError> {
        let table = self.read()?;
        Ok(table
            .by_title
            .get(title)
            .and_then(|id| table.categories.get(id))
            .cloned())
    }

    /// Look up every category whose title is in `titles`, in one pass
    pub fn find_by_titles(&self, titles: &HashSet<String>) -> Result<Vec<Category>, TallyError> {
        let table = self.read()?;
        Ok(titles
            .iter()
            .filter_map(|title| table.by_title.get(title))
            .filter_map(|id| table.categories.get(id).cloned())
            .collect())
    }

    /// Get all categories ordered by title
    pub fn get_all(&self) -> Result<Vec<Category>, TallyError> {
        Ok(self.read()?.sorted())
    }

    /// Insert and persist new categories as one unit
    ///
    /// Fails with `Duplicate` without writing anything if any title is
    /// already taken, including by another category in the same batch.
    pub fn insert_batch(&self, categories: Vec<Category>) -> Result<(), TallyError> {
        if categories.is_empty() {
            return Ok(());
        }

        let mut table = self.write()?;
        let mut candidate = table.clone();
        for category in categories {
            candidate.insert(category)?;
        }

        write_json_atomic(&self.path, &candidate.to_data())?;
        *table = candidate;
        Ok(())
    }

    /// Count categories
    pub fn count(&self) -> Result<usize, TallyError> {
        Ok(self.read()?.categories.len())
    }
}
