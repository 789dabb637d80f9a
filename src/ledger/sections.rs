//! Section aggregator: balance sheet and P/L rollups

use bigdecimal::BigDecimal;

use crate::types::*;

/// Accumulates section totals and derives Profit and the Retained Result
#[derive(Debug, Default)]
pub struct SectionAggregator {
    report: Report,
}

impl SectionAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a category's opening balance to its section's starting total
    pub fn add_starting(&mut self, section: Section, starting: &BigDecimal) {
        self.report.bucket_mut(section.rules().bucket).starting += starting;
    }

    /// Seed the Retained Result's opening figure
    pub fn set_retained_starting(&mut self, starting: BigDecimal) {
        self.report.balance.retained.starting = starting;
    }

    /// Derive the starting profit from the section starting totals
    ///
    /// This is not the true opening P/L: profit or loss carried forward
    /// lives in a user-defined Equity category rather than being computed.
    pub fn open_profit(&mut self) {
        let profit = &mut self.report.profit;
        profit.profit.starting = &profit.revenue.starting - &profit.expense.starting;
    }

    /// Add a category's finalized change to its section and to profit
    pub fn add_change(&mut self, section: Section, change: &BigDecimal) {
        let rules = section.rules();
        self.report.bucket_mut(rules.bucket).change += change;

        let profit = &mut self.report.profit.profit.change;
        match rules.profit {
            ProfitEffect::Neutral => {}
            ProfitEffect::Increases => *profit += change,
            ProfitEffect::Decreases => *profit -= change,
        }
    }

    /// Close every section, derive the Retained Result and round
    pub fn finish(mut self, decimals: u32) -> Report {
        let report = &mut self.report;

        report.balance.assets.close();
        report.balance.liabilities.close();
        report.balance.equity.close();
        report.profit.revenue.close();
        report.profit.expense.close();
        report.profit.profit.close();

        report.balance.retained.change = report.profit.profit.change.clone();
        report.balance.retained.close();

        report.round(decimals);
        self.report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn test_starting_profit_from_section_totals() {
        let mut agg = SectionAggregator::new();
        agg.add_starting(Section::Revenues, &dec("40"));
        agg.add_starting(Section::Expenses, &dec("15"));
        agg.add_starting(Section::Assets, &dec("100"));
        agg.open_profit();

        let report = agg.finish(4);
        assert_eq!(report.profit.profit.starting, dec("25"));
        assert_eq!(report.balance.assets.starting, dec("100"));
        assert_eq!(report.balance.assets.ending, dec("100"));
    }

    #[test]
    fn test_profit_and_retained_follow_changes() {
        let mut agg = SectionAggregator::new();
        agg.set_retained_starting(dec("1000"));
        agg.open_profit();
        agg.add_change(Section::Revenues, &dec("300"));
        agg.add_change(Section::Expenses, &dec("120.5"));
        agg.add_change(Section::Assets, &dec("179.5"));

        let report = agg.finish(4);
        assert_eq!(report.profit.revenue.change, dec("300"));
        assert_eq!(report.profit.expense.change, dec("120.5"));
        assert_eq!(report.profit.profit.change, dec("179.5"));
        assert_eq!(report.profit.profit.ending, dec("179.5"));
        assert_eq!(report.balance.retained.change, dec("179.5"));
        assert_eq!(report.balance.retained.ending, dec("1179.5"));
        assert_eq!(report.balance.assets.ending, dec("179.5"));
    }

    #[test]
    fn test_finish_rounds_every_figure() {
        let mut agg = SectionAggregator::new();
        agg.add_starting(Section::Liabilities, &dec("0.123456"));
        agg.add_change(Section::Liabilities, &dec("0.000051"));

        let report = agg.finish(4);
        assert_eq!(report.balance.liabilities.starting, dec("0.1235"));
        assert_eq!(report.balance.liabilities.change, dec("0.0001"));
        assert_eq!(report.balance.liabilities.ending, dec("0.1235"));
    }
}
