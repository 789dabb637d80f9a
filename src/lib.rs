//! # Trial Balance
//!
//! A double-entry balance engine: given a chart of accounts and a list of
//! transfers between categories, it produces per-category starting, change
//! and ending balances plus balance sheet and P/L section rollups.
//!
//! ## Features
//!
//! - **Posting**: section-aware sign rules, so callers never pre-sign amounts
//! - **Section rollups**: Assets, Liabilities, Equity, Revenues, Expenses,
//!   Profit and Retained Result
//! - **Exact decimals**: accumulation never rounds; output is rounded once
//! - **CSV workspaces**: JSON/YAML schemas pointing at chart and record files
//! - **Source abstraction**: trait-based chart and record sources
//!
//! ## Quick Start
//!
//! ```rust
//! use trial_balance::{CalcOptions, Category, Section, Transaction, TrialBalance};
//! use bigdecimal::BigDecimal;
//!
//! let chart = vec![
//!     Category::new("1000".into(), Section::Assets, "Cash".into(), BigDecimal::from(100)),
//!     Category::new("6000".into(), Section::Expenses, "Rent".into(), BigDecimal::from(0)),
//! ];
//! let records = vec![Transaction::new(BigDecimal::from(30), "1000".into(), "6000".into())];
//!
//! let calc = TrialBalance::new(CalcOptions::default())
//!     .calculate(&chart, &records)
//!     .unwrap();
//! assert_eq!(calc.categories[0].balance.ending, BigDecimal::from(70));
//! assert_eq!(calc.report.profit.profit.change, BigDecimal::from(-30));
//! ```

pub mod config;
pub mod io;
pub mod ledger;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::CalcOptions;
pub use io::{CsvWorkspace, Schema};
pub use ledger::*;
pub use traits::*;
pub use types::*;
