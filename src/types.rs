//! Core types and data structures for the trial balance engine

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::rounding::round_amount;

/// Sections of the chart of accounts following standard accounting principles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Section {
    /// Assets - what the business owns (Cash, Inventory, Equipment, etc.)
    Assets,
    /// Liabilities - what the business owes (Loans, Accounts Payable, etc.)
    Liabilities,
    /// Equity - owner's interest in the business (Capital, Retained Earnings, etc.)
    Equity,
    /// Revenues - money earned by the business
    Revenues,
    /// Expenses - costs incurred by the business
    Expenses,
}

/// Report bucket a section's figures roll up into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bucket {
    Assets,
    Liabilities,
    Equity,
    Revenue,
    Expense,
}

/// How a section's change moves the profit figure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProfitEffect {
    /// Balance sheet sections do not touch profit
    Neutral,
    /// Revenue changes add to profit
    Increases,
    /// Expense changes subtract from profit
    Decreases,
}

/// Per-section rules driving posting signs and aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionRules {
    /// Liabilities, Equity and Revenues carry their natural balance on the
    /// credit side, so posting flips the sign for them
    pub special: bool,
    pub bucket: Bucket,
    pub profit: ProfitEffect,
}

impl Section {
    /// All sections in chart order
    pub const ALL: [Section; 5] = [
        Section::Assets,
        Section::Liabilities,
        Section::Equity,
        Section::Revenues,
        Section::Expenses,
    ];

    /// Returns the posting and aggregation rules for this section
    pub fn rules(&self) -> SectionRules {
        match self {
            Section::Assets => SectionRules {
                special: false,
                bucket: Bucket::Assets,
                profit: ProfitEffect::Neutral,
            },
            Section::Liabilities => SectionRules {
                special: true,
                bucket: Bucket::Liabilities,
                profit: ProfitEffect::Neutral,
            },
            Section::Equity => SectionRules {
                special: true,
                bucket: Bucket::Equity,
                profit: ProfitEffect::Neutral,
            },
            Section::Revenues => SectionRules {
                special: true,
                bucket: Bucket::Revenue,
                profit: ProfitEffect::Increases,
            },
            Section::Expenses => SectionRules {
                special: false,
                bucket: Bucket::Expense,
                profit: ProfitEffect::Decreases,
            },
        }
    }

    /// Whether this section's natural balance sign is opposite to Assets/Expenses
    pub fn is_special(&self) -> bool {
        self.rules().special
    }

    /// Human-readable section name, as used in exported CSV files
    pub fn name(&self) -> &'static str {
        match self {
            Section::Assets => "Assets",
            Section::Liabilities => "Liabilities",
            Section::Equity => "Equity",
            Section::Revenues => "Revenues",
            Section::Expenses => "Expenses",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Section {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                LedgerError::new(
                    ErrorKind::WrongFormat,
                    format!("Unknown section '{}'", s),
                )
            })
    }
}

/// Starting, change and ending figures for one bucket (a category or a section)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tally {
    pub starting: BigDecimal,
    pub change: BigDecimal,
    pub ending: BigDecimal,
}

impl Tally {
    /// Create a tally holding only an opening balance
    pub fn opening(starting: BigDecimal) -> Self {
        Self {
            starting,
            ..Self::default()
        }
    }

    /// Set the ending figure to `starting + change`
    pub fn close(&mut self) {
        self.ending = &self.starting + &self.change;
    }

    /// Round every figure to the given number of decimals
    pub fn round(&mut self, decimals: u32) {
        self.starting = round_amount(&self.starting, decimals);
        self.change = round_amount(&self.change, decimals);
        self.ending = round_amount(&self.ending, decimals);
    }

    /// Absolute gap between `ending` and `starting + change`
    pub fn imbalance(&self) -> BigDecimal {
        (&self.ending - &(&self.starting + &self.change)).abs()
    }
}

/// A category (account bucket) in the chart of accounts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier of the category
    pub id: String,
    /// Section the category belongs to
    pub section: Section,
    /// Human-readable category name
    pub name: String,
    /// Opening balance, and after calculation the change and ending balance
    pub balance: Tally,
}

impl Category {
    /// Create a new category with an opening balance
    pub fn new(id: String, section: Section, name: String, starting: BigDecimal) -> Self {
        Self {
            id,
            section,
            name,
            balance: Tally::opening(starting),
        }
    }
}

/// Transfer of an amount from a source category to a purpose category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Amount of the transfer; the sign is applied by section rules
    pub amount: BigDecimal,
    /// Category the money comes from (spent, invested, lent, earned or borrowed)
    pub source: String,
    /// Category the money is meant for
    pub purpose: String,
}

impl Transaction {
    /// Create a new transaction
    pub fn new(amount: BigDecimal, source: String, purpose: String) -> Self {
        Self {
            amount,
            source,
            purpose,
        }
    }
}

/// Balance sheet rollup
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BalanceSections {
    pub assets: Tally,
    pub liabilities: Tally,
    pub equity: Tally,
    /// Retained result: accumulated earnings (or deficit)
    pub retained: Tally,
}

/// Profit and loss rollup
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfitSections {
    pub revenue: Tally,
    pub expense: Tally,
    pub profit: Tally,
}

/// Section-level totals for one calculation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub balance: BalanceSections,
    pub profit: ProfitSections,
}

impl Report {
    /// Mutable access to the tally of a section bucket
    pub fn bucket_mut(&mut self, bucket: Bucket) -> &mut Tally {
        match bucket {
            Bucket::Assets => &mut self.balance.assets,
            Bucket::Liabilities => &mut self.balance.liabilities,
            Bucket::Equity => &mut self.balance.equity,
            Bucket::Revenue => &mut self.profit.revenue,
            Bucket::Expense => &mut self.profit.expense,
        }
    }

    /// Every tally of the report, labelled, in display order
    pub fn tallies(&self) -> [(&'static str, &Tally); 7] {
        [
            ("Assets", &self.balance.assets),
            ("Liabilities", &self.balance.liabilities),
            ("Equity", &self.balance.equity),
            ("Retained Result", &self.balance.retained),
            ("Revenues", &self.profit.revenue),
            ("Expenses", &self.profit.expense),
            ("Profit", &self.profit.profit),
        ]
    }

    fn tallies_mut(&mut self) -> [&mut Tally; 7] {
        [
            &mut self.balance.assets,
            &mut self.balance.liabilities,
            &mut self.balance.equity,
            &mut self.balance.retained,
            &mut self.profit.revenue,
            &mut self.profit.expense,
            &mut self.profit.profit,
        ]
    }

    /// Round every figure of every section to the given number of decimals
    pub fn round(&mut self, decimals: u32) {
        for tally in self.tallies_mut() {
            tally.round(decimals);
        }
    }
}

/// Kinds of failures reported to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
pub enum ErrorKind {
    #[error("Resource not found")]
    ResourceNotFound,
    #[error("Unexpected type of or damaged file")]
    Unreadable,
    #[error("No data provided")]
    NoData,
    /// An optional input slot left blank on purpose; skipped, never fatal
    #[error("No file name")]
    UnnamedResource,
    #[error("Wrong file type")]
    WrongResourceType,
    #[error("Wrong data format")]
    WrongFormat,
    /// An invariant inside the engine was violated
    #[error("Internal program error")]
    InternalError,
}

impl ErrorKind {
    /// Short machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::ResourceNotFound => "resource_not_found",
            ErrorKind::Unreadable => "unreadable",
            ErrorKind::NoData => "no_data",
            ErrorKind::UnnamedResource => "unnamed_resource",
            ErrorKind::WrongResourceType => "wrong_resource_type",
            ErrorKind::WrongFormat => "wrong_format",
            ErrorKind::InternalError => "internal_error",
        }
    }
}

/// Breadcrumbs naming the calling contexts an error passed through,
/// innermost first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trail(Vec<String>);

impl Trail {
    /// Append a calling-context mark
    pub fn crumb(&mut self, mark: impl Into<String>) {
        self.0.push(mark.into());
    }

    pub fn marks(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for Trail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" <- "))
    }
}

type Cause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while loading inputs or calculating balances
#[derive(Debug, thiserror::Error)]
#[error("{kind}: {hint}")]
pub struct LedgerError {
    /// What went wrong
    pub kind: ErrorKind,
    /// Practical advice for the user
    pub hint: String,
    /// User-provided resource (file, category id) where the problem occurred
    pub resource: Option<String>,
    pub trail: Trail,
    #[source]
    pub cause: Option<Cause>,
}

impl LedgerError {
    /// Create a new error with a hint
    pub fn new(kind: ErrorKind, hint: impl Into<String>) -> Self {
        Self {
            kind,
            hint: hint.into(),
            resource: None,
            trail: Trail::default(),
            cause: None,
        }
    }

    /// Attach the resource the error refers to
    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    /// Attach the underlying cause
    pub fn with_cause(mut self, cause: impl Into<Cause>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// Record the calling context the error is passing through
    pub fn crumb(mut self, mark: impl Into<String>) -> Self {
        self.trail.crumb(mark);
        self
    }

    /// Short machine-readable code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

/// A loaded value together with the non-fatal problems met while loading it
#[derive(Debug, Default)]
pub struct Loaded<T> {
    pub value: T,
    pub warnings: Vec<LedgerError>,
}

impl<T> Loaded<T> {
    /// Wrap a value that loaded without warnings
    pub fn clean(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_special_sections() {
        assert!(Section::Revenues.is_special());
        assert!(Section::Liabilities.is_special());
        assert!(Section::Equity.is_special());
        assert!(!Section::Assets.is_special());
        assert!(!Section::Expenses.is_special());
    }

    #[test]
    fn test_section_from_str() {
        assert_eq!("Assets".parse::<Section>().unwrap(), Section::Assets);
        assert_eq!(" revenues ".parse::<Section>().unwrap(), Section::Revenues);

        let err = "Income".parse::<Section>().unwrap_err();
        assert_eq!(err.kind, ErrorKind::WrongFormat);
    }

    #[test]
    fn test_tally_close_and_round() {
        let mut tally = Tally::opening("100.123449".parse().unwrap());
        tally.change = "-0.00005".parse().unwrap();
        tally.close();
        tally.round(4);

        assert_eq!(tally.starting, "100.1234".parse::<BigDecimal>().unwrap());
        assert_eq!(tally.change, "-0.0001".parse::<BigDecimal>().unwrap());
        assert_eq!(tally.ending, "100.1234".parse::<BigDecimal>().unwrap());
    }

    #[test]
    fn test_error_trail_and_code() {
        let err = LedgerError::new(ErrorKind::ResourceNotFound, "File not found: a.csv")
            .with_resource("a.csv")
            .crumb("read_csv")
            .crumb("gather_categories");

        assert_eq!(err.code(), "resource_not_found");
        assert_eq!(err.trail.len(), 2);
        assert_eq!(err.trail.to_string(), "read_csv <- gather_categories");
        assert_eq!(
            err.to_string(),
            "Resource not found: File not found: a.csv"
        );
    }
}
