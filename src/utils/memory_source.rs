//! In-memory input source for testing and embedding

use crate::traits::*;
use crate::types::*;

/// In-memory chart and record source
#[derive(Debug, Default)]
pub struct MemorySource {
    categories: Vec<Category>,
    transactions: Vec<Transaction>,
    warnings: Vec<(ErrorKind, String)>,
    failure: Option<(ErrorKind, String)>,
}

impl MemorySource {
    /// Create a new memory source
    pub fn new(categories: Vec<Category>, transactions: Vec<Transaction>) -> Self {
        Self {
            categories,
            transactions,
            ..Self::default()
        }
    }

    /// Report a warning of the given kind alongside the loaded chart
    pub fn with_warning(mut self, kind: ErrorKind, hint: impl Into<String>) -> Self {
        self.warnings.push((kind, hint.into()));
        self
    }

    /// Make loading the records fail (useful for testing)
    pub fn failing_records(mut self, kind: ErrorKind, hint: impl Into<String>) -> Self {
        self.failure = Some((kind, hint.into()));
        self
    }

    /// Append a category
    pub fn push_category(&mut self, category: Category) {
        self.categories.push(category);
    }

    /// Append a transaction
    pub fn push_transaction(&mut self, transaction: Transaction) {
        self.transactions.push(transaction);
    }
}

impl ChartSource for MemorySource {
    fn categories(&self) -> LedgerResult<Loaded<Vec<Category>>> {
        Ok(Loaded {
            value: self.categories.clone(),
            warnings: self
                .warnings
                .iter()
                .map(|(kind, hint)| LedgerError::new(*kind, hint.clone()))
                .collect(),
        })
    }
}

impl RecordSource for MemorySource {
    fn transactions(&self) -> LedgerResult<Loaded<Vec<Transaction>>> {
        match &self.failure {
            Some((kind, hint)) => {
                Err(LedgerError::new(*kind, hint.clone()).crumb("memory_transactions"))
            }
            None => Ok(Loaded::clean(self.transactions.clone())),
        }
    }
}
