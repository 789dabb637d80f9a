//! Trial balance command line
//!
//! Reads a JSON or YAML schema, calculates balances and prints the section
//! summary, optionally writing per-category balances to a CSV file.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trial_balance::io::write_results;
use trial_balance::utils::{format_amount, StrictChartValidator, StrictTransactionValidator};
use trial_balance::{CsvWorkspace, LedgerError, Schema, TrialBalance};

/// Double-entry trial balance calculator
#[derive(Parser)]
#[command(name = "trial-balance")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Schema file (.json, .yaml or .yml) naming the chart and record files
    schema: PathBuf,

    /// Write per-category balances to this CSV file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the full calculation as JSON instead of the summary
    #[arg(long)]
    json: bool,

    /// Reject malformed amounts, duplicate categories and unknown references
    #[arg(long)]
    strict: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trial_balance=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<LedgerError>() {
                Some(notice) => report_error(notice),
                None => eprintln!("Error: {:#}", err),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let mut schema = Schema::from_path(&cli.schema)?;
    if cli.strict {
        schema.options.strict_numbers = true;
    }
    let options = schema.options.clone();
    let decimals = options.decimals;
    let workspace = CsvWorkspace::new(schema);

    let engine = if cli.strict {
        TrialBalance::with_validators(
            options,
            Box::new(StrictChartValidator),
            Box::new(StrictTransactionValidator),
        )
    } else {
        TrialBalance::new(options)
    };

    let calc = engine.run(&workspace, &workspace)?;

    for warning in &calc.warnings {
        eprintln!("Warning ({}): {}", warning.code(), warning.hint);
    }
    if !calc.unmatched.is_empty() {
        eprintln!(
            "Warning: {} transaction side(s) refer to unknown categories and were not posted",
            calc.unmatched.len()
        );
    }

    if cli.json {
        let json = serde_json::to_string_pretty(&calc).context("serializing calculation")?;
        println!("{}", json);
    } else {
        for (label, tally) in calc.report.tallies() {
            println!(
                "{:<16} {:>16} {:>16} {:>16}",
                label,
                format_amount(&tally.starting, decimals),
                format_amount(&tally.change, decimals),
                format_amount(&tally.ending, decimals),
            );
        }
    }

    if let Some(output) = &cli.output {
        write_results(output, &calc.categories, decimals)?;
        eprintln!("Balances written to {}", output.display());
    }

    Ok(())
}

fn report_error(err: &LedgerError) {
    eprintln!("Error ({}): {}", err.code(), err.kind);
    if !err.hint.is_empty() {
        eprintln!("  {}", err.hint);
    }
    if let Some(resource) = &err.resource {
        eprintln!("  resource: {}", resource);
    }
    if !err.trail.is_empty() {
        eprintln!("  trail ({}): {}", err.trail.len(), err.trail);
    }
    if let Some(cause) = &err.cause {
        eprintln!("  cause: {}", cause);
    }
}
