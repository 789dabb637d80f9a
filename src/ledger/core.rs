//! Main calculation orchestrator that coordinates registry, posting and sections

use bigdecimal::BigDecimal;
use serde::Serialize;

use crate::config::CalcOptions;
use crate::ledger::{CategoryRegistry, PostingEngine, SectionAggregator, UnmatchedReference};
use crate::traits::*;
use crate::types::*;
use crate::utils::rounding::round_amount;

/// Result of one complete calculation
#[derive(Debug, Serialize)]
pub struct Calculation {
    /// Finalized categories in the order they were supplied
    pub categories: Vec<Category>,
    pub report: Report,
    /// Transaction sides dropped because their category is unknown
    pub unmatched: Vec<UnmatchedReference>,
    /// Category ids declared more than once
    pub duplicates: Vec<String>,
    /// Non-fatal problems met while loading the inputs
    #[serde(skip)]
    pub warnings: Vec<LedgerError>,
}

/// Trial balance engine
pub struct TrialBalance {
    options: CalcOptions,
    chart_validator: Box<dyn ChartValidator>,
    transaction_validator: Box<dyn TransactionValidator>,
}

impl TrialBalance {
    /// Create a new engine with the default (lenient) validators
    pub fn new(options: CalcOptions) -> Self {
        Self {
            options,
            chart_validator: Box::new(DefaultChartValidator),
            transaction_validator: Box::new(DefaultTransactionValidator),
        }
    }

    /// Create a new engine with custom validators
    pub fn with_validators(
        options: CalcOptions,
        chart_validator: Box<dyn ChartValidator>,
        transaction_validator: Box<dyn TransactionValidator>,
    ) -> Self {
        Self {
            options,
            chart_validator,
            transaction_validator,
        }
    }

    pub fn options(&self) -> &CalcOptions {
        &self.options
    }

    /// Load inputs from the given sources and calculate
    ///
    /// Posting never starts when loading fails.
    pub fn run<C, R>(&self, chart: &C, records: &R) -> LedgerResult<Calculation>
    where
        C: ChartSource + ?Sized,
        R: RecordSource + ?Sized,
    {
        let categories = chart.categories().map_err(|e| e.crumb("run"))?;
        tracing::debug!(categories = categories.value.len(), "chart loaded");

        let transactions = records.transactions().map_err(|e| e.crumb("run"))?;
        tracing::debug!(transactions = transactions.value.len(), "records loaded");

        let mut calculation = self
            .calculate(&categories.value, &transactions.value)
            .map_err(|e| e.crumb("run"))?;

        calculation.warnings = categories.warnings;
        calculation.warnings.extend(transactions.warnings);
        Ok(calculation)
    }

    /// Calculate category and section balances
    ///
    /// Stages run once, in order: seed starting totals, post every
    /// transaction, close each category, roll changes up into sections,
    /// derive Profit and Retained Result, round.
    pub fn calculate(
        &self,
        categories: &[Category],
        transactions: &[Transaction],
    ) -> LedgerResult<Calculation> {
        let decimals = self.options.decimals;

        self.chart_validator
            .validate_chart(categories)
            .map_err(|e| e.crumb("calculate"))?;

        let registry = CategoryRegistry::new(categories);

        for (index, transaction) in transactions.iter().enumerate() {
            self.transaction_validator
                .validate_transaction(index, transaction, &registry)
                .map_err(|e| e.crumb("calculate"))?;
        }

        let mut sections = SectionAggregator::new();
        for category in registry.effective() {
            sections.add_starting(category.section, &category.balance.starting);
        }
        if let Some(id) = &self.options.retained_category {
            match registry.starting(id) {
                Some(starting) => sections.set_retained_starting(starting.clone()),
                None => tracing::warn!(category = %id, "retained result category not in chart"),
            }
        }
        sections.open_profit();

        let posting = PostingEngine::new(&registry).post(registry.accumulator(), transactions);

        let zero = BigDecimal::from(0);
        let mut results = Vec::with_capacity(registry.len());
        for category in registry.effective() {
            let mut balance = category.balance.clone();
            balance.change = posting
                .accumulator
                .value(&category.id)
                .cloned()
                .unwrap_or_else(|| zero.clone());
            balance.close();

            balance.change = round_amount(&balance.change, decimals);
            balance.ending = round_amount(&balance.ending, decimals);

            sections.add_change(category.section, &balance.change);

            results.push(Category {
                balance,
                ..category.clone()
            });
        }

        let report = sections.finish(decimals);
        check_closed(&report, decimals).map_err(|e| e.crumb("calculate"))?;

        for (label, tally) in report.tallies() {
            tracing::info!(
                section = label,
                starting = %tally.starting,
                change = %tally.change,
                ending = %tally.ending,
                "section totals"
            );
        }

        Ok(Calculation {
            categories: results,
            report,
            unmatched: posting.unmatched,
            duplicates: registry.duplicates().to_vec(),
            warnings: Vec::new(),
        })
    }
}

/// Every section must satisfy `ending == starting + change` up to rounding
fn check_closed(report: &Report, decimals: u32) -> LedgerResult<()> {
    // Three independently rounded figures can drift by at most one unit each.
    let tolerance = BigDecimal::new(2.into(), i64::from(decimals));

    for (label, tally) in report.tallies() {
        if tally.imbalance() > tolerance {
            return Err(LedgerError::new(
                ErrorKind::InternalError,
                "Send this error to the program developer",
            )
            .with_resource(label)
            .crumb("check_closed"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::MemorySource;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn chart() -> Vec<Category> {
        vec![
            Category::new("1000".into(), Section::Assets, "Cash".into(), dec("100")),
            Category::new("2000".into(), Section::Liabilities, "Loan".into(), dec("60")),
            Category::new("3000".into(), Section::Equity, "Capital".into(), dec("40")),
            Category::new("4000".into(), Section::Revenues, "Sales".into(), dec("0")),
            Category::new("6000".into(), Section::Expenses, "Rent".into(), dec("0")),
        ]
    }

    fn txn(amount: &str, source: &str, purpose: &str) -> Transaction {
        Transaction::new(dec(amount), source.into(), purpose.into())
    }

    #[test]
    fn test_calculation_basic_operations() {
        let engine = TrialBalance::new(CalcOptions::default());
        let calc = engine
            .calculate(
                &chart(),
                &[
                    txn("250", "4000", "1000"),
                    txn("80.25", "1000", "6000"),
                    txn("10", "1000", "2000"),
                ],
            )
            .unwrap();

        let cash = &calc.categories[0];
        assert_eq!(cash.balance.change, dec("159.75"));
        assert_eq!(cash.balance.ending, dec("259.75"));

        let loan = &calc.categories[1];
        assert_eq!(loan.balance.ending, dec("50"));

        let report = &calc.report;
        assert_eq!(report.balance.assets.ending, dec("259.75"));
        assert_eq!(report.profit.revenue.change, dec("250"));
        assert_eq!(report.profit.expense.change, dec("80.25"));
        assert_eq!(report.profit.profit.change, dec("169.75"));
        assert_eq!(report.balance.retained.ending, dec("169.75"));
        assert!(calc.unmatched.is_empty());
    }

    #[test]
    fn test_retained_category_seeds_retained_result() {
        let mut categories = chart();
        categories.push(Category::new(
            "3200".into(),
            Section::Equity,
            "Retained earnings".into(),
            dec("500"),
        ));
        let options = CalcOptions {
            retained_category: Some("3200".into()),
            ..CalcOptions::default()
        };

        let calc = TrialBalance::new(options)
            .calculate(&categories, &[txn("20", "4000", "1000")])
            .unwrap();

        assert_eq!(calc.report.balance.retained.starting, dec("500"));
        assert_eq!(calc.report.balance.retained.ending, dec("520"));
        assert_eq!(calc.report.balance.equity.starting, dec("540"));
    }

    #[test]
    fn test_run_collects_warnings() {
        let source = MemorySource::new(chart(), vec![txn("5", "1000", "6000")]).with_warning(ErrorKind::WrongFormat, "Amount 'x' read as '0'");

        let calc = TrialBalance::new(CalcOptions::default())
            .run(&source, &source)
            .unwrap();

        assert_eq!(calc.warnings.len(), 1);
        assert_eq!(calc.warnings[0].kind, ErrorKind::WrongFormat);
        assert_eq!(calc.categories[4].balance.ending, dec("5"));
    }

    #[test]
    fn test_category_figures_are_rounded_before_rollup() {
        let categories = vec![
            Category::new("1000".into(), Section::Assets, "Cash".into(), dec("10")),
            Category::new("1100".into(), Section::Assets, "Bank".into(), dec("0")),
            Category::new("1200".into(), Section::Assets, "Petty".into(), dec("0")),
            Category::new("6000".into(), Section::Expenses, "Rent".into(), dec("0")),
            Category::new("6100".into(), Section::Expenses, "Fees".into(), dec("0")),
        ];
        let calc = TrialBalance::new(CalcOptions::default())
            .calculate(
                &categories,
                &[
                    txn("1.23456", "1000", "6000"),
                    txn("0.00005", "1000", "6100"),
                    txn("0.00005", "1100", "6100"),
                    txn("0.00005", "1200", "6100"),
                ],
            )
            .unwrap();

        let expected = [
            ("-1.2346", "8.7654"),
            ("-0.0001", "-0.0001"),
            ("-0.0001", "-0.0001"),
            ("1.2346", "1.2346"),
            ("0.0002", "0.0002"),
        ];
        for (category, (change, ending)) in calc.categories.iter().zip(expected) {
            assert_eq!(category.balance.change, dec(change), "{}", category.id);
            assert_eq!(category.balance.ending, dec(ending), "{}", category.id);
        }
        assert_eq!(calc.categories[0].balance.starting, dec("10"));

        // Sum of rounded category changes, not the rounded sum (-1.2347)
        let report = &calc.report;
        assert_eq!(report.balance.assets.change, dec("-1.2348"));
        assert_eq!(report.balance.assets.ending, dec("8.7652"));
        assert_eq!(report.profit.expense.change, dec("1.2348"));
        assert_eq!(report.profit.profit.change, dec("-1.2348"));
    }

    #[test]
    fn test_check_closed_flags_broken_tally() {
        let mut report = Report::default();
        report.profit.expense.ending = dec("1");

        let err = check_closed(&report, 4).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InternalError);
        assert_eq!(err.resource.as_deref(), Some("Expenses"));
    }
}
