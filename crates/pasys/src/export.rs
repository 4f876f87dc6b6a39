//! Results export: CSV for spreadsheets, JSON for round-tripping back
//! into the `pareto` subcommand.

use std::io::Write;

use color_eyre::eyre::Context;

use pasys_core::{MetricValue, MetricsRecord, ResultsTable};

/// Column order: union of row keys, first-seen. Rows share a schema in
/// practice but errored rows are shorter, so the union keeps every
/// column present.
fn column_order(results: &ResultsTable) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for row in results.iter() {
        for key in row.keys() {
            if !columns.iter().any(|c| c == key) {
                columns.push(key.to_string());
            }
        }
    }
    columns
}

fn csv_field(value: Option<&MetricValue>) -> String {
    match value {
        None => String::new(),
        Some(MetricValue::Float(v)) => {
            if v.is_finite() {
                format!("{v}")
            } else {
                String::new()
            }
        }
        Some(MetricValue::Text(s)) => {
            if s.contains([',', '"', '\n']) {
                format!("\"{}\"", s.replace('"', "\"\""))
            } else {
                s.clone()
            }
        }
    }
}

/// Write a results table as CSV.
pub fn write_csv(results: &ResultsTable, writer: &mut impl Write) -> color_eyre::Result<()> {
    let columns = column_order(results);
    writeln!(writer, "{}", columns.join(",")).wrap_err("writing csv header")?;

    for row in results.iter() {
        let fields: Vec<String> = columns
            .iter()
            .map(|column| csv_field(row.get(column)))
            .collect();
        writeln!(writer, "{}", fields.join(",")).wrap_err("writing csv row")?;
    }
    Ok(())
}

/// Write a results table as a JSON array of records.
pub fn write_json(results: &ResultsTable, writer: &mut impl Write) -> color_eyre::Result<()> {
    let rows: Vec<&MetricsRecord> = results.iter().collect();
    serde_json::to_writer_pretty(writer, &rows).wrap_err("writing json results")?;
    Ok(())
}

/// Read a results table back from JSON written by `write_json`.
pub fn read_json(text: &str) -> color_eyre::Result<ResultsTable> {
    let mut rows: Vec<MetricsRecord> =
        serde_json::from_str(text).wrap_err("parsing json results")?;
    for row in &mut rows {
        row.rebuild_index();
    }
    Ok(ResultsTable::new(rows))
}
