//! Reading chart and record CSV files, writing calculated balances

use bigdecimal::BigDecimal;
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use crate::types::*;
use crate::utils::rounding::format_amount;

/// Column titles of exported balances
pub const RESULT_HEADERS: [&str; 6] = ["Cat", "Sect", "Name", "Starting", "Change", "Ending"];

/// How malformed numbers and title rows are handled while reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOptions {
    pub headers: bool,
    pub strict_numbers: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            headers: true,
            strict_numbers: false,
        }
    }
}

/// Read every row of a CSV file
fn read_rows(path: &Path, headers: bool) -> LedgerResult<Vec<StringRecord>> {
    let resource = path.display().to_string();

    let file = File::open(path).map_err(|e| {
        LedgerError::new(
            ErrorKind::ResourceNotFound,
            format!("File not found: {}", resource),
        )
        .with_resource(resource.clone())
        .with_cause(e)
        .crumb("read_rows")
    })?;

    let mut reader = ReaderBuilder::new()
        .has_headers(headers)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(file);

    let rows = reader
        .records()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            LedgerError::new(
                ErrorKind::Unreadable,
                format!("Failed to read: {}", resource),
            )
            .with_resource(resource.clone())
            .with_cause(e)
            .crumb("read_rows")
        })?;

    tracing::debug!(file = %resource, rows = rows.len(), "csv read");
    Ok(rows)
}

/// The first three columns of a row, failing when the row is too short
fn columns<'r>(row: &'r StringRecord, line: usize, resource: &str) -> LedgerResult<[&'r str; 3]> {
    match (row.get(0), row.get(1), row.get(2)) {
        (Some(a), Some(b), Some(c)) => Ok([a, b, c]),
        _ => Err(LedgerError::new(
            ErrorKind::WrongFormat,
            format!(
                "Line {} of {} has {} columns, expected 3",
                line,
                resource,
                row.len()
            ),
        )
        .with_resource(resource.to_string())),
    }
}

/// Largest decimal exponent, either way, accepted for an amount
pub const AMOUNT_EXPONENT_LIMIT: i64 = 64;

/// Parse a number, refusing exponents outside `AMOUNT_EXPONENT_LIMIT`
fn parse_decimal(raw: &str) -> Result<BigDecimal, Box<dyn std::error::Error + Send + Sync>> {
    let amount = BigDecimal::from_str(raw)?;
    let (_, scale) = amount.as_bigint_and_exponent();
    if scale.abs() > AMOUNT_EXPONENT_LIMIT {
        return Err(format!("exponent {} is outside +/-{}", -scale, AMOUNT_EXPONENT_LIMIT).into());
    }
    Ok(amount)
}

/// Parse an amount; in lenient mode a malformed value reads as zero and a
/// warning is returned next to it
fn parse_amount(
    raw: &str,
    label: &str,
    resource: &str,
    strict: bool,
) -> LedgerResult<(BigDecimal, Option<LedgerError>)> {
    match parse_decimal(raw) {
        Ok(amount) => Ok((amount, None)),
        Err(e) => {
            let hint = if strict {
                format!("{} '{}' is not a usable number", label, raw)
            } else {
                format!("WARNING! {} '{}' read as '0'", label, raw)
            };
            let notice = LedgerError::new(ErrorKind::WrongFormat, hint)
                .with_resource(resource.to_string())
                .with_cause(e);

            if strict {
                Err(notice)
            } else {
                tracing::warn!(file = %resource, value = %raw, "{} read as zero", label);
                Ok((BigDecimal::from(0), Some(notice)))
            }
        }
    }
}

/// First line number of data rows, for messages
fn first_line(headers: bool) -> usize {
    if headers {
        2
    } else {
        1
    }
}

/// Read one section's chart file (`Cat, Name, Starting`)
pub fn read_chart_file(
    path: &Path,
    section: Section,
    options: ReadOptions,
) -> LedgerResult<Loaded<Vec<Category>>> {
    let resource = path.display().to_string();
    let rows = read_rows(path, options.headers).map_err(|e| e.crumb("read_chart_file"))?;

    let mut loaded = Loaded::clean(Vec::with_capacity(rows.len()));
    for (offset, row) in rows.iter().enumerate() {
        let line = offset + first_line(options.headers);
        let [id, name, starting] =
            columns(row, line, &resource).map_err(|e| e.crumb("read_chart_file"))?;

        let (starting, warning) = parse_amount(starting, "Balance", &resource, options.strict_numbers)
            .map_err(|e| e.crumb("read_chart_file"))?;
        if let Some(warning) = warning {
            loaded.warnings.push(warning.crumb("read_chart_file"));
        }

        loaded
            .value
            .push(Category::new(id.to_string(), section, name.to_string(), starting));
    }
    Ok(loaded)
}

/// Read a transaction records file (`Amount, Source, Purpose`)
pub fn read_records_file(
    path: &Path,
    options: ReadOptions,
) -> LedgerResult<Loaded<Vec<Transaction>>> {
    let resource = path.display().to_string();
    let rows = read_rows(path, options.headers).map_err(|e| e.crumb("read_records_file"))?;

    let mut loaded = Loaded::clean(Vec::with_capacity(rows.len()));
    for (offset, row) in rows.iter().enumerate() {
        let line = offset + first_line(options.headers);
        let [amount, source, purpose] =
            columns(row, line, &resource).map_err(|e| e.crumb("read_records_file"))?;

        let (amount, warning) = parse_amount(amount, "Amount", &resource, options.strict_numbers)
            .map_err(|e| e.crumb("read_records_file"))?;
        if let Some(warning) = warning {
            loaded.warnings.push(warning.crumb("read_records_file"));
        }

        loaded.value.push(Transaction::new(
            amount,
            source.to_string(),
            purpose.to_string(),
        ));
    }
    Ok(loaded)
}

/// Write calculated balances as CSV to any writer
pub fn write_results_to<W: Write>(
    writer: W,
    categories: &[Category],
    decimals: u32,
) -> LedgerResult<()> {
    let write_failed = |e: csv::Error| {
        LedgerError::new(ErrorKind::Unreadable, "Failed to write balances")
            .with_cause(e)
            .crumb("write_results_to")
    };

    let mut out = WriterBuilder::new().from_writer(writer);
    out.write_record(RESULT_HEADERS).map_err(write_failed)?;

    for category in categories {
        let balance = &category.balance;
        let starting = format_amount(&balance.starting, decimals);
        let change = format_amount(&balance.change, decimals);
        let ending = format_amount(&balance.ending, decimals);
        out.write_record([
            category.id.as_str(),
            category.section.name(),
            category.name.as_str(),
            starting.as_str(),
            change.as_str(),
            ending.as_str(),
        ])
        .map_err(write_failed)?;
    }

    out.flush().map_err(|e| {
        LedgerError::new(ErrorKind::Unreadable, "Failed to write balances")
            .with_cause(e)
            .crumb("write_results_to")
    })
}

/// Write calculated balances to a CSV file, replacing it if it exists
pub fn write_results(path: &Path, categories: &[Category], decimals: u32) -> LedgerResult<()> {
    let resource = path.display().to_string();
    let file = File::create(path).map_err(|e| {
        LedgerError::new(
            ErrorKind::ResourceNotFound,
            format!("Cannot create file {}", resource),
        )
        .with_resource(resource.clone())
        .with_cause(e)
        .crumb("write_results")
    })?;

    write_results_to(file, categories, decimals)
        .map_err(|e| e.with_resource(resource).crumb("write_results"))?;
    tracing::debug!(file = %path.display(), rows = categories.len(), "balances written");
    Ok(())
}
