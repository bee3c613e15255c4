use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};

use super::model::{Column, Table, Value};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a table from a delimited text file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`        – comma separated, header row
/// * `.tsv` `.tab` – tab separated, header row
pub fn load_file(path: &Path) -> Result<Table> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let delimiter = match ext.as_str() {
        "csv" => b',',
        "tsv" | "tab" => b'\t',
        other => bail!("Unsupported file extension: .{other}"),
    };

    let file = std::fs::File::open(path)
        .with_context(|| format!("opening {}", path.display()))?;
    read_delimited(file, delimiter).with_context(|| format!("parsing {}", path.display()))
}

/// Parse comma separated text with a header row.
pub fn read_csv<R: Read>(reader: R) -> Result<Table> {
    read_delimited(reader, b',')
}

// ---------------------------------------------------------------------------
// Delimited text loader
// ---------------------------------------------------------------------------

/// Layout: header row with column names, one record per row.
/// Each column is typed from its whole content, see [`infer_column`].
fn read_delimited<R: Read>(reader: R, delimiter: u8) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.is_empty() {
        bail!("CSV has no header row");
    }

    let mut raw: Vec<Vec<String>> = vec![Vec::new(); headers.len()];

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        if record.len() != headers.len() {
            bail!(
                "CSV row {row_no}: {} fields but header has {}",
                record.len(),
                headers.len()
            );
        }
        for (cells, value) in raw.iter_mut().zip(record.iter()) {
            cells.push(value.trim().to_string());
        }
    }

    let columns = headers
        .into_iter()
        .zip(raw)
        .map(|(name, cells)| infer_column(name, &cells))
        .collect();

    Ok(Table::new(columns)?)
}

/// Cells Pandas reads as missing by default.
fn is_missing(s: &str) -> bool {
    s.is_empty()
        || ["na", "nan", "null", "n/a", "none"]
            .iter()
            .any(|m| s.eq_ignore_ascii_case(m))
}

/// Type a column by its content:
/// * every present cell is an integer  → `Integer`
/// * every present cell is a number    → `Float` (integers promoted)
/// * every present cell is true/false  → `Bool`
/// * anything else                     → `Text`, cells kept as trimmed text
fn infer_column(name: String, cells: &[String]) -> Column {
    let present = || cells.iter().filter(|c| !is_missing(c));

    let values = if present().all(|c| c.parse::<i64>().is_ok()) {
        convert(cells, |c| c.parse::<i64>().ok().map(Value::Integer))
    } else if present().all(|c| c.parse::<f64>().is_ok()) {
        convert(cells, |c| c.parse::<f64>().ok().map(Value::Float))
    } else if present().all(|c| parse_bool(c).is_some()) {
        convert(cells, |c| parse_bool(c).map(Value::Bool))
    } else {
        convert(cells, |c| Some(Value::Text(c.to_string())))
    };

    Column::new(name, values)
}

fn convert(cells: &[String], parse: impl Fn(&str) -> Option<Value>) -> Vec<Value> {
    cells
        .iter()
        .map(|c| {
            if is_missing(c) {
                Value::Null
            } else {
                parse(c.as_str()).unwrap_or(Value::Null)
            }
        })
        .collect()
}

fn parse_bool(s: &str) -> Option<bool> {
    if s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::ColumnKind;

    const SAMPLE: &str = "\
A,B,C,D,useless_feature
1,,1,left,1
2,5,2,right,1
3,8,3,left,1
";

    #[test]
    fn test_read_csv_types_columns() {
        let table = read_csv(SAMPLE.as_bytes()).unwrap();
        assert_eq!(
            table.column_names(),
            vec!["A", "B", "C", "D", "useless_feature"]
        );
        assert_eq!(table.height(), 3);
        assert_eq!(table.column("A").unwrap().kind(), ColumnKind::Numeric);
        assert_eq!(table.column("D").unwrap().kind(), ColumnKind::Categorical);
        assert_eq!(
            table.column("B").unwrap().values,
            vec![Value::Null, Value::Integer(5), Value::Integer(8)]
        );
    }

    #[test]
    fn test_mixed_numbers_promote_to_float() {
        let table = read_csv("x\n1\n2.5\nNA\n".as_bytes()).unwrap();
        assert_eq!(
            table.column("x").unwrap().values,
            vec![Value::Float(1.0), Value::Float(2.5), Value::Null]
        );
    }

    #[test]
    fn test_text_column_keeps_numbers_verbatim() {
        let table = read_csv("x\n1\nabc\n".as_bytes()).unwrap();
        assert_eq!(
            table.column("x").unwrap().values,
            vec![Value::from("1"), Value::from("abc")]
        );
    }

    #[test]
    fn test_bool_column() {
        let table = read_csv("flag\nTrue\nfalse\n".as_bytes()).unwrap();
        assert_eq!(table.column("flag").unwrap().kind(), ColumnKind::Boolean);
    }

    #[test]
    fn test_ragged_row_is_error() {
        assert!(read_csv("a,b\n1\n".as_bytes()).is_err());
    }

    #[test]
    fn test_unsupported_extension() {
        let err = load_file(Path::new("data.parquet")).unwrap_err();
        assert!(err.to_string().contains("Unsupported file extension"));
    }
}
