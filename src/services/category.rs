//! Category service
//!
//! Resolves category titles to category records, creating the missing ones.
//! Both the single-transaction path and bulk import go through
//! [`CategoryService::resolve_or_create`], so a title is never created twice
//! within one call no matter how often it repeats.

use std::collections::{HashMap, HashSet};

use crate::error::{TallyError, TallyResult};
use crate::models::category::validate_title;
use crate::models::{Category, Money};
use crate::storage::{CategoryRepository, Storage, TransactionRepository};

/// Service for category resolution and reporting
pub struct CategoryService<'a> {
    categories: &'a CategoryRepository,
    transactions: &'a TransactionRepository,
}

/// A category with the transactions filed under it summarized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryUsage {
    pub category: Category,
    pub transaction_count: usize,
    /// Income minus outcome within this category
    pub net: Money,
}

impl<'a> CategoryService<'a> {
    /// Create a new category service
    pub fn new(categories: &'a CategoryRepository, transactions: &'a TransactionRepository) -> Self {
        Self {
            categories,
            transactions,
        }
    }

    /// Create a category service over the repositories of `storage`
    pub fn from_storage(storage: &'a Storage) -> Self {
        Self::new(&storage.categories, &storage.transactions)
    }

    /// Map every requested title to a category, creating missing ones
    ///
    /// Titles are trimmed and deduplicated first; the returned map is keyed
    /// by the trimmed title. Existing categories are found in one lookup and
    /// all missing ones are written in one batch. An empty input writes
    /// nothing.
    pub fn resolve_or_create<I, S>(&self, titles: I) -> TallyResult<HashMap<String, Category>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut wanted = HashSet::new();
        for title in titles {
            let title = title.as_ref().trim();
            validate_title(title).map_err(|e| TallyError::Validation(e.to_string()))?;
            wanted.insert(title.to_string());
        }

        if wanted.is_empty() {
            return Ok(HashMap::new());
        }

        let mut resolved: HashMap<String, Category> = self
            .categories
            .find_by_titles(&wanted)?
            .into_iter()
            .map(|c| (c.title.clone(), c))
            .collect();

        let mut missing: Vec<&String> = wanted
            .iter()
            .filter(|title| !resolved.contains_key(*title))
            .collect();
        missing.sort();

        if !missing.is_empty() {
            let created: Vec<Category> = missing.into_iter().map(Category::new).collect();
            self.categories.insert_batch(created.clone())?;

            tracing::info!(
                created = created.len(),
                reused = resolved.len(),
                "categories created"
            );
            resolved.extend(created.into_iter().map(|c| (c.title.clone(), c)));
        }

        Ok(resolved)
    }

    /// Resolve a single title, creating the category if needed
    pub fn resolve_one(&self, title: &str) -> TallyResult<Category> {
        let mut resolved = self.resolve_or_create([title])?;
        resolved
            .remove(title.trim())
            .ok_or_else(|| TallyError::category_not_found(title.trim()))
    }

    /// List all categories ordered by title
    pub fn list(&self) -> TallyResult<Vec<Category>> {
        self.categories.get_all()
    }

    /// Find a category by exact title or by ID
    pub fn find(&self, identifier: &str) -> TallyResult<Option<Category>> {
        if let Some(category) = self.categories.get_by_title(identifier.trim())? {
            return Ok(Some(category));
        }

        Ok(self
            .categories
            .get_all()?
            .into_iter()
            .find(|c| c.id.matches(identifier)))
    }

    /// Every category with its transaction count and net amount
    pub fn usage(&self) -> TallyResult<Vec<CategoryUsage>> {
        self.categories
            .get_all()?
            .into_iter()
            .map(|category| self.usage_of(category))
            .collect()
    }

    /// Transaction count and net amount for one category
    pub fn usage_of(&self, category: Category) -> TallyResult<CategoryUsage> {
        let txns = self.transactions.get_by_category(category.id)?;
        let net = txns
            .iter()
            .try_fold(Money::zero(), |net, t| net.checked_add(t.signed_value()))
            .ok_or_else(|| {
                TallyError::Storage(format!("Net amount overflows for category {}", category.title))
            })?;

        Ok(CategoryUsage {
            transaction_count: txns.len(),
            net,
            category,
        })
    }
}
