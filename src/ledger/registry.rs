//! Category registry: lookup structures built from the chart of accounts

use bigdecimal::BigDecimal;
use std::collections::HashMap;

use crate::types::*;

/// Running per-category change values for one calculation
///
/// Only ids known to the registry have an entry; updates for any other id
/// are refused rather than creating a new one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Accumulator {
    values: HashMap<String, BigDecimal>,
}

impl Accumulator {
    /// Add `delta` to the running value of `id`; returns false for unknown ids
    pub fn apply(&mut self, id: &str, delta: &BigDecimal) -> bool {
        match self.values.get_mut(id) {
            Some(value) => {
                *value += delta;
                true
            }
            None => false,
        }
    }

    /// Current change value of a category
    pub fn value(&self, id: &str) -> Option<&BigDecimal> {
        self.values.get(id)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Lookup structures over the chart of accounts
///
/// Category ids are expected to be unique. When an id is declared more than
/// once, the later declaration overwrites the earlier one in every map.
#[derive(Debug, Clone)]
pub struct CategoryRegistry {
    categories: Vec<Category>,
    /// Recorded change values, seeding each fresh accumulator
    seed: HashMap<String, BigDecimal>,
    starting: HashMap<String, BigDecimal>,
    sections: HashMap<String, Section>,
    /// Index (into `categories`) of the declaration that owns each id
    owners: HashMap<String, usize>,
    duplicates: Vec<String>,
}

impl CategoryRegistry {
    /// Build the registry from the chart of accounts
    pub fn new(categories: &[Category]) -> Self {
        let mut seed = HashMap::with_capacity(categories.len());
        let mut starting = HashMap::with_capacity(categories.len());
        let mut sections = HashMap::with_capacity(categories.len());
        let mut owners = HashMap::with_capacity(categories.len());
        let mut duplicates = Vec::new();

        for (index, category) in categories.iter().enumerate() {
            if owners.insert(category.id.clone(), index).is_some() {
                tracing::warn!(category = %category.id, "duplicate category id, later definition wins");
                duplicates.push(category.id.clone());
            }
            seed.insert(category.id.clone(), category.balance.change.clone());
            starting.insert(category.id.clone(), category.balance.starting.clone());
            sections.insert(category.id.clone(), category.section);
        }

        Self {
            categories: categories.to_vec(),
            seed,
            starting,
            sections,
            owners,
            duplicates,
        }
    }

    /// A fresh accumulator seeded with every category's recorded change value
    pub fn accumulator(&self) -> Accumulator {
        Accumulator {
            values: self.seed.clone(),
        }
    }

    /// Section of a category
    pub fn section(&self, id: &str) -> Option<Section> {
        self.sections.get(id).copied()
    }

    /// Opening balance of a category
    pub fn starting(&self, id: &str) -> Option<&BigDecimal> {
        self.starting.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sections.contains_key(id)
    }

    /// Ids declared more than once, one entry per overwritten declaration
    pub fn duplicates(&self) -> &[String] {
        &self.duplicates
    }

    /// Categories in declaration order, keeping only the winning declaration
    /// of each id
    pub fn effective(&self) -> impl Iterator<Item = &Category> + '_ {
        self.categories
            .iter()
            .enumerate()
            .filter(|(index, category)| self.owners.get(&category.id) == Some(index))
            .map(|(_, category)| category)
    }

    /// Number of distinct category ids
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: &str, section: Section, starting: i64) -> Category {
        Category::new(
            id.to_string(),
            section,
            id.to_uppercase(),
            BigDecimal::from(starting),
        )
    }

    #[test]
    fn test_accumulator_starts_from_recorded_change() {
        let mut cash = category("cash", Section::Assets, 100);
        cash.balance.change = BigDecimal::from(5);
        let registry = CategoryRegistry::new(&[cash, category("rent", Section::Expenses, 0)]);

        let acc = registry.accumulator();
        assert_eq!(acc.value("cash"), Some(&BigDecimal::from(5)));
        assert_eq!(acc.value("rent"), Some(&BigDecimal::from(0)));
        assert_eq!(registry.starting("cash"), Some(&BigDecimal::from(100)));
        assert_eq!(registry.section("rent"), Some(Section::Expenses));
    }

    #[test]
    fn test_accumulator_refuses_unknown_ids() {
        let registry = CategoryRegistry::new(&[category("cash", Section::Assets, 0)]);
        let mut acc = registry.accumulator();

        assert!(!acc.apply("nowhere", &BigDecimal::from(10)));
        assert!(acc.value("nowhere").is_none());
        assert_eq!(acc.len(), 1);
    }

    #[test]
    fn test_duplicate_ids_last_write_wins() {
        let registry = CategoryRegistry::new(&[
            category("x", Section::Assets, 10),
            category("y", Section::Assets, 1),
            category("x", Section::Equity, 20),
        ]);

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.section("x"), Some(Section::Equity));
        assert_eq!(registry.starting("x"), Some(&BigDecimal::from(20)));
        assert_eq!(registry.duplicates(), ["x".to_string()]);

        let ids: Vec<_> = registry
            .effective()
            .map(|c| (c.id.as_str(), c.section))
            .collect();
        assert_eq!(ids, vec![("y", Section::Assets), ("x", Section::Equity)]);
    }
}
