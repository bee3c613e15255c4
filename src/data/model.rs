use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DoraError, Result};

// ---------------------------------------------------------------------------
// Value – a single cell
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring the common Pandas dtypes.
/// `Null` marks a missing value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq/Ord so Value can live in a BTreeSet --

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use Value::*;
        fn discriminant(v: &Value) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                Text(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Text(s) => s.hash(state),
            Value::Integer(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Bool(b) => b.hash(state),
            Value::Null => {}
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{s}"),
            Value::Integer(i) => write!(f, "{i}"),
            // `{:?}` keeps the fraction: 1.0 prints as "1.0", not "1".
            Value::Float(v) => write!(f, "{v:?}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Null => write!(f, "<null>"),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl Value {
    /// Interpret the value as an `f64`. Booleans count as 0/1.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Integer(i) => Some(*i as f64),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

// ---------------------------------------------------------------------------
// Column
// ---------------------------------------------------------------------------

/// Semantic type of a column, derived from its non-missing cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Boolean,
    Categorical,
    /// Every cell is missing.
    Empty,
}

/// A named column of cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Build a float column; `None` entries become `Null`.
    pub fn from_f64(name: impl Into<String>, values: &[Option<f64>]) -> Self {
        let values = values
            .iter()
            .map(|v| v.map(Value::Float).unwrap_or(Value::Null))
            .collect();
        Self::new(name, values)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn kind(&self) -> ColumnKind {
        let mut kind = ColumnKind::Empty;
        for value in &self.values {
            let cell = match value {
                Value::Null => continue,
                Value::Integer(_) | Value::Float(_) => ColumnKind::Numeric,
                Value::Bool(_) => ColumnKind::Boolean,
                Value::Text(_) => return ColumnKind::Categorical,
            };
            kind = match (kind, cell) {
                (ColumnKind::Empty, c) => c,
                (k, c) if k == c => k,
                _ => return ColumnKind::Categorical,
            };
        }
        kind
    }

    /// Number of missing cells.
    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_null()).count()
    }

    /// Sorted set of distinct non-missing values.
    pub fn unique_values(&self) -> BTreeSet<Value> {
        self.values
            .iter()
            .filter(|v| !v.is_null())
            .cloned()
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Table – ordered named columns with aligned rows
// ---------------------------------------------------------------------------

/// An in-memory table. Column order is significant; every column has the
/// same number of rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Build a table, rejecting ragged columns and duplicate names.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        if let Some(first) = columns.first() {
            let height = first.len();
            if let Some(bad) = columns.iter().find(|c| c.len() != height) {
                return Err(DoraError::InvalidSource(format!(
                    "column '{}' has {} rows, expected {height}",
                    bad.name,
                    bad.len()
                )));
            }
        }
        let mut seen = BTreeSet::new();
        for col in &columns {
            if !seen.insert(col.name.as_str()) {
                return Err(DoraError::InvalidSource(format!(
                    "duplicate column name '{}'",
                    col.name
                )));
            }
        }
        Ok(Self { columns })
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| DoraError::UnknownColumn(name.to_string()))
    }

    /// Remove a column, returning it.
    pub fn remove_column(&mut self, name: &str) -> Result<Column> {
        let idx = self
            .position(name)
            .ok_or_else(|| DoraError::UnknownColumn(name.to_string()))?;
        Ok(self.columns.remove(idx))
    }

    /// Replace the same-named column in place, or append a new one.
    pub fn upsert_column(&mut self, column: Column) -> Result<()> {
        if !self.columns.is_empty() && column.len() != self.height() {
            return Err(DoraError::InvalidSource(format!(
                "column '{}' has {} rows, expected {}",
                column.name,
                column.len(),
                self.height()
            )));
        }
        match self.position(&column.name) {
            Some(idx) => self.columns[idx] = column,
            None => self.columns.push(column),
        }
        Ok(())
    }

    /// A new table holding only the given rows, in the given order.
    pub fn take_rows(&self, rows: &[usize]) -> Table {
        let columns = self
            .columns
            .iter()
            .map(|col| Column {
                name: col.name.clone(),
                values: rows.iter().map(|&r| col.values[r].clone()).collect(),
            })
            .collect();
        Table { columns }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::new(vec![
            Column::new("a", vec![1i64.into(), 2i64.into(), Value::Null]),
            Column::new("b", vec!["x".into(), "y".into(), "x".into()]),
        ])
        .unwrap()
    }

    #[test]
    fn test_ragged_table_rejected() {
        let err = Table::new(vec![
            Column::new("a", vec![1i64.into()]),
            Column::new("b", vec![]),
        ])
        .unwrap_err();
        assert!(matches!(err, DoraError::InvalidSource(_)));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let err = Table::new(vec![
            Column::new("a", vec![1i64.into()]),
            Column::new("a", vec![2i64.into()]),
        ])
        .unwrap_err();
        assert!(matches!(err, DoraError::InvalidSource(_)));
    }

    #[test]
    fn test_column_kind() {
        let t = sample();
        assert_eq!(t.column("a").unwrap().kind(), ColumnKind::Numeric);
        assert_eq!(t.column("b").unwrap().kind(), ColumnKind::Categorical);
        assert_eq!(
            Column::new("n", vec![Value::Null]).kind(),
            ColumnKind::Empty
        );
        assert_eq!(
            Column::new("m", vec![1i64.into(), "q".into()]).kind(),
            ColumnKind::Categorical
        );
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut t = sample();
        t.upsert_column(Column::new("a", vec![Value::Null; 3])).unwrap();
        assert_eq!(t.column_names(), vec!["a", "b"]);
        assert_eq!(t.column("a").unwrap().null_count(), 3);

        t.upsert_column(Column::new("c", vec![Value::Bool(true); 3])).unwrap();
        assert_eq!(t.column_names(), vec!["a", "b", "c"]);

        assert!(t.upsert_column(Column::new("d", vec![])).is_err());
    }

    #[test]
    fn test_take_rows() {
        let t = sample().take_rows(&[2, 0]);
        assert_eq!(t.height(), 2);
        assert_eq!(t.column("b").unwrap().values, vec![Value::from("x"); 2]);
        assert_eq!(t.column("a").unwrap().values[1], Value::Integer(1));
    }

    #[test]
    fn test_float_display_keeps_fraction() {
        assert_eq!(Value::Float(1.0).to_string(), "1.0");
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
        assert_eq!(Value::Integer(1).to_string(), "1");
    }

    #[test]
    fn test_unique_values_sorted_without_nulls() {
        let col = Column::new(
            "d",
            vec!["right".into(), Value::Null, "left".into(), "right".into()],
        );
        let uniq: Vec<String> = col.unique_values().iter().map(|v| v.to_string()).collect();
        assert_eq!(uniq, vec!["left", "right"]);
    }
}
