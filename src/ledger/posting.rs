//! Posting engine: applies transactions to running category balances

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::ledger::registry::{Accumulator, CategoryRegistry};
use crate::types::*;

/// Side of a transaction a category is referenced from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PostingSide {
    /// The category money is taken from
    Source,
    /// The category money is meant for
    Purpose,
}

impl PostingSide {
    /// Signed delta for a category of `section` on this side of a transfer
    ///
    /// Sources of asset-like sections lose the amount and purposes gain it;
    /// special sections (Liabilities, Equity, Revenues) mirror that.
    pub fn delta(&self, section: Section, amount: &BigDecimal) -> BigDecimal {
        match (self, section.is_special()) {
            (PostingSide::Source, true) | (PostingSide::Purpose, false) => amount.clone(),
            (PostingSide::Source, false) | (PostingSide::Purpose, true) => -amount,
        }
    }
}

/// A transaction side that referenced an id missing from the chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmatchedReference {
    /// Position of the transaction in the posted list
    pub index: usize,
    pub side: PostingSide,
    pub category_id: String,
}

/// Outcome of posting a list of transactions
#[derive(Debug, Clone)]
pub struct Posting {
    pub accumulator: Accumulator,
    /// Sides that were dropped because their category is unknown
    pub unmatched: Vec<UnmatchedReference>,
}

/// Posting engine for one registry
pub struct PostingEngine<'a> {
    registry: &'a CategoryRegistry,
}

impl<'a> PostingEngine<'a> {
    /// Create a posting engine over the given registry
    pub fn new(registry: &'a CategoryRegistry) -> Self {
        Self { registry }
    }

    /// Post every transaction onto the accumulator
    ///
    /// A side whose category is unknown is a no-op; the other side still
    /// updates. No rounding happens here.
    pub fn post(&self, mut accumulator: Accumulator, transactions: &[Transaction]) -> Posting {
        let mut unmatched = Vec::new();

        for (index, transaction) in transactions.iter().enumerate() {
            let sides = [
                (PostingSide::Source, &transaction.source),
                (PostingSide::Purpose, &transaction.purpose),
            ];

            for (side, id) in sides {
                let applied = match self.registry.section(id) {
                    Some(section) => {
                        accumulator.apply(id, &side.delta(section, &transaction.amount))
                    }
                    None => false,
                };

                if !applied {
                    tracing::warn!(index, ?side, category = %id, "unknown category, posting side dropped");
                    unmatched.push(UnmatchedReference {
                        index,
                        side,
                        category_id: id.clone(),
                    });
                }
            }
        }

        tracing::debug!(
            transactions = transactions.len(),
            unmatched = unmatched.len(),
            "transactions posted"
        );

        Posting {
            accumulator,
            unmatched,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> CategoryRegistry {
        CategoryRegistry::new(&[
            Category::new("A".into(), Section::Assets, "Cash".into(), 100.into()),
            Category::new("E".into(), Section::Expenses, "Rent".into(), 0.into()),
            Category::new("R".into(), Section::Revenues, "Sales".into(), 0.into()),
            Category::new("L".into(), Section::Liabilities, "Loan".into(), 0.into()),
        ])
    }

    fn txn(amount: i64, source: &str, purpose: &str) -> Transaction {
        Transaction::new(amount.into(), source.into(), purpose.into())
    }

    #[test]
    fn test_sign_rules() {
        let amount = BigDecimal::from(7);
        for section in Section::ALL {
            let source = PostingSide::Source.delta(section, &amount);
            let purpose = PostingSide::Purpose.delta(section, &amount);
            assert_eq!(&source + &purpose, BigDecimal::from(0));
            if section.is_special() {
                assert_eq!(source, amount);
            } else {
                assert_eq!(purpose, amount);
            }
        }
    }

    #[test]
    fn test_asset_to_expense() {
        let registry = registry();
        let posting =
            PostingEngine::new(&registry).post(registry.accumulator(), &[txn(30, "A", "E")]);

        assert_eq!(posting.accumulator.value("A"), Some(&BigDecimal::from(-30)));
        assert_eq!(posting.accumulator.value("E"), Some(&BigDecimal::from(30)));
        assert!(posting.unmatched.is_empty());
    }

    #[test]
    fn test_special_sections_flip_signs() {
        let registry = registry();
        let posting = PostingEngine::new(&registry).post(
            registry.accumulator(),
            &[txn(50, "R", "A"), txn(20, "A", "L")],
        );

        assert_eq!(posting.accumulator.value("R"), Some(&BigDecimal::from(50)));
        assert_eq!(posting.accumulator.value("A"), Some(&BigDecimal::from(30)));
        assert_eq!(posting.accumulator.value("L"), Some(&BigDecimal::from(-20)));
    }

    #[test]
    fn test_unknown_side_is_dropped_and_reported() {
        let registry = registry();
        let posting = PostingEngine::new(&registry).post(
            registry.accumulator(),
            &[txn(10, "ghost", "E"), txn(5, "nobody", "nowhere")],
        );

        assert_eq!(posting.accumulator.value("E"), Some(&BigDecimal::from(10)));
        assert!(posting.accumulator.value("ghost").is_none());
        assert_eq!(posting.unmatched.len(), 3);
        assert_eq!(
            posting.unmatched[0],
            UnmatchedReference {
                index: 0,
                side: PostingSide::Source,
                category_id: "ghost".into(),
            }
        );
        assert_eq!(posting.unmatched[2].side, PostingSide::Purpose);
    }
}
