//! Traits for input sources and extensibility

use crate::ledger::registry::CategoryRegistry;
use crate::types::*;

/// Source of the chart of accounts
///
/// This trait lets the engine work with any input collaborator (CSV files
/// described by a schema, in-memory lists, a database, etc.). Non-fatal
/// problems met while loading are returned as warnings next to the value.
pub trait ChartSource {
    /// Load every category of the chart
    fn categories(&self) -> LedgerResult<Loaded<Vec<Category>>>;
}

/// Source of transaction records
pub trait RecordSource {
    /// Load every transaction to be posted
    fn transactions(&self) -> LedgerResult<Loaded<Vec<Transaction>>>;
}

/// Trait for implementing custom chart of accounts validation rules
pub trait ChartValidator: Send + Sync {
    /// Validate the chart before any transaction is posted
    fn validate_chart(&self, categories: &[Category]) -> LedgerResult<()>;
}

/// Trait for implementing custom transaction validation rules
pub trait TransactionValidator: Send + Sync {
    /// Validate a single transaction against the registry it will be posted to
    fn validate_transaction(
        &self,
        index: usize,
        transaction: &Transaction,
        registry: &CategoryRegistry,
    ) -> LedgerResult<()>;
}

/// Default chart validator
///
/// Accepts duplicate category ids; the later declaration wins.
pub struct DefaultChartValidator;

impl ChartValidator for DefaultChartValidator {
    fn validate_chart(&self, _categories: &[Category]) -> LedgerResult<()> {
        Ok(())
    }
}

/// Default transaction validator
///
/// Accepts every transaction; references to unknown categories are dropped
/// during posting and reported as unmatched.
pub struct DefaultTransactionValidator;

impl TransactionValidator for DefaultTransactionValidator {
    fn validate_transaction(
        &self,
        _index: usize,
        _transaction: &Transaction,
        _registry: &CategoryRegistry,
    ) -> LedgerResult<()> {
        Ok(())
    }
}
