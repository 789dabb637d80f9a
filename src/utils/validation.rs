//! Validation utilities

use bigdecimal::BigDecimal;
use std::collections::HashSet;

use crate::ledger::registry::CategoryRegistry;
use crate::traits::*;
use crate::types::*;

/// Validate that an amount is not negative
pub fn validate_non_negative_amount(amount: &BigDecimal) -> LedgerResult<()> {
    if *amount < BigDecimal::from(0) {
        Err(LedgerError::new(
            ErrorKind::WrongFormat,
            format!("Amount {} is negative; signs are applied by section rules", amount),
        ))
    } else {
        Ok(())
    }
}

/// Validate that a category id is usable as a lookup key
pub fn validate_category_id(id: &str) -> LedgerResult<()> {
    if id.trim().is_empty() {
        return Err(LedgerError::new(
            ErrorKind::NoData,
            "Category ID cannot be empty",
        ));
    }

    if id.trim() != id {
        return Err(LedgerError::new(
            ErrorKind::WrongFormat,
            format!("Category ID '{}' has leading or trailing whitespace", id),
        )
        .with_resource(id));
    }

    Ok(())
}

/// Chart validator that rejects duplicate and blank category ids
pub struct StrictChartValidator;

impl ChartValidator for StrictChartValidator {
    fn validate_chart(&self, categories: &[Category]) -> LedgerResult<()> {
        let mut seen = HashSet::with_capacity(categories.len());
        for category in categories {
            validate_category_id(&category.id).map_err(|e| e.crumb("validate_chart"))?;

            if !seen.insert(category.id.as_str()) {
                return Err(LedgerError::new(
                    ErrorKind::WrongFormat,
                    format!("Category '{}' is declared more than once", category.id),
                )
                .with_resource(category.id.clone())
                .crumb("validate_chart"));
            }
        }
        Ok(())
    }
}

/// Transaction validator that rejects negative amounts and unknown categories
pub struct StrictTransactionValidator;

impl TransactionValidator for StrictTransactionValidator {
    fn validate_transaction(
        &self,
        index: usize,
        transaction: &Transaction,
        registry: &CategoryRegistry,
    ) -> LedgerResult<()> {
        validate_non_negative_amount(&transaction.amount)
            .map_err(|e| e.with_resource(format!("transaction #{}", index)))?;

        for id in [&transaction.source, &transaction.purpose] {
            if !registry.contains(id) {
                return Err(LedgerError::new(
                    ErrorKind::WrongFormat,
                    format!("Transaction #{} refers to unknown category '{}'", index, id),
                )
                .with_resource(id.clone())
                .crumb("validate_transaction"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: &str) -> Category {
        Category::new(id.into(), Section::Assets, "Cash".into(), BigDecimal::from(0))
    }

    #[test]
    fn test_strict_chart_rejects_duplicates() {
        let err = StrictChartValidator
            .validate_chart(&[category("1000"), category("1100"), category("1000")])
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::WrongFormat);
        assert_eq!(err.resource.as_deref(), Some("1000"));
        assert!(StrictChartValidator
            .validate_chart(&[category("1000"), category("1100")])
            .is_ok());
    }

    #[test]
    fn test_strict_chart_rejects_blank_ids() {
        let err = StrictChartValidator
            .validate_chart(&[category("  ")])
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NoData);
    }

    #[test]
    fn test_strict_transactions() {
        let registry = CategoryRegistry::new(&[category("a"), category("b")]);
        let validator = StrictTransactionValidator;

        let ok = Transaction::new(BigDecimal::from(1), "a".into(), "b".into());
        assert!(validator.validate_transaction(0, &ok, &registry).is_ok());

        let negative = Transaction::new(BigDecimal::from(-1), "a".into(), "b".into());
        let err = validator
            .validate_transaction(1, &negative, &registry)
            .unwrap_err();
        assert_eq!(err.resource.as_deref(), Some("transaction #1"));

        let unknown = Transaction::new(BigDecimal::from(1), "a".into(), "z".into());
        let err = validator
            .validate_transaction(2, &unknown, &registry)
            .unwrap_err();
        assert_eq!(err.resource.as_deref(), Some("z"));
    }
}
