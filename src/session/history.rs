use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::data::model::Value;

// ---------------------------------------------------------------------------
// Mapper – a named element-wise function
// ---------------------------------------------------------------------------

/// A first-class cell mapper used by `extract_feature`.
///
/// The name is what the log prints and what two mappers are compared by, so
/// keep it unique per behaviour.
#[derive(Clone)]
pub struct Mapper {
    name: String,
    func: Arc<dyn Fn(&Value) -> Value + Send + Sync>,
}

impl Mapper {
    pub fn new(
        name: impl Into<String>,
        func: impl Fn(&Value) -> Value + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    /// Lift an `f64 -> f64` function. Non-numeric cells and NaN results
    /// map to `Null`.
    pub fn numeric(
        name: impl Into<String>,
        func: impl Fn(f64) -> f64 + Send + Sync + 'static,
    ) -> Self {
        Self::new(name, move |v: &Value| {
            v.as_f64()
                .map(&func)
                .filter(|y| !y.is_nan())
                .map(Value::Float)
                .unwrap_or(Value::Null)
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn apply(&self, value: &Value) -> Value {
        (self.func)(value)
    }
}

impl fmt::Debug for Mapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Mapper").field(&self.name).finish()
    }
}

impl PartialEq for Mapper {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Serialize for Mapper {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name)
    }
}

// ---------------------------------------------------------------------------
// LogEntry – one recorded transform
// ---------------------------------------------------------------------------

/// One mutating transform, with the arguments needed to apply it again.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum LogEntry {
    RemoveFeature {
        name: String,
    },
    ExtractFeature {
        source: String,
        target: String,
        mapper: Mapper,
    },
    ExtractOrdinalFeature {
        name: String,
    },
    ImputeMissingValues,
    ScaleInputValues,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogEntry::RemoveFeature { name } => write!(f, "self.remove_feature('{name}')"),
            LogEntry::ExtractFeature {
                source,
                target,
                mapper,
            } => write!(
                f,
                "self.extract_feature('{source}', '{target}', {})",
                mapper.name()
            ),
            LogEntry::ExtractOrdinalFeature { name } => {
                write!(f, "self.extract_ordinal_feature('{name}')")
            }
            LogEntry::ImputeMissingValues => write!(f, "self.impute_missing_values()"),
            LogEntry::ScaleInputValues => write!(f, "self.scale_input_values()"),
        }
    }
}

// ---------------------------------------------------------------------------
// Log – append-only transform history
// ---------------------------------------------------------------------------

/// Ordered record of the transforms applied since the last load or restore.
/// `Clone` yields an independent copy.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Log {
    entries: Vec<LogEntry>,
}

impl Log {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    pub fn reset(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Each entry in its script form.
    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(ToString::to_string).collect()
    }

    /// The whole log as a script, one call per line.
    pub fn to_script(&self) -> String {
        self.lines().join("\n")
    }

    /// The entries as a JSON array; mappers appear by name.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl<'a> IntoIterator for &'a Log {
    type Item = &'a LogEntry;
    type IntoIter = std::slice::Iter<'a, LogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn double() -> Mapper {
        Mapper::numeric("double", |x| x * 2.0)
    }

    #[test]
    fn test_script_form() {
        let mut log = Log::new();
        log.append(LogEntry::ExtractOrdinalFeature { name: "D".into() });
        log.append(LogEntry::ImputeMissingValues);
        log.append(LogEntry::ExtractFeature {
            source: "a".into(),
            target: "b".into(),
            mapper: double(),
        });
        assert_eq!(
            log.lines(),
            vec![
                "self.extract_ordinal_feature('D')",
                "self.impute_missing_values()",
                "self.extract_feature('a', 'b', double)",
            ]
        );
    }

    #[test]
    fn test_clone_is_independent() {
        let mut log = Log::new();
        log.append(LogEntry::ScaleInputValues);
        let copy = log.clone();
        log.append(LogEntry::ImputeMissingValues);
        assert_eq!(copy.len(), 1);
        assert_ne!(copy, log);
        log.reset();
        assert!(log.is_empty());
        assert_eq!(copy.len(), 1);
    }

    #[test]
    fn test_mapper_apply_and_equality() {
        let m = double();
        assert_eq!(m.apply(&Value::Integer(3)), Value::Float(6.0));
        assert_eq!(m.apply(&Value::from("x")), Value::Null);
        assert_eq!(m, Mapper::new("double", |v: &Value| v.clone()));
    }

    #[test]
    fn test_numeric_mapper_nan_is_null() {
        let sqrt = Mapper::numeric("sqrt", f64::sqrt);
        assert_eq!(sqrt.apply(&Value::Integer(-1)), Value::Null);
        assert_eq!(sqrt.apply(&Value::Integer(4)), Value::Float(2.0));
    }

    #[test]
    fn test_to_json() {
        let mut log = Log::new();
        log.append(LogEntry::RemoveFeature { name: "x".into() });
        log.append(LogEntry::ExtractFeature {
            source: "a".into(),
            target: "b".into(),
            mapper: double(),
        });
        let json: serde_json::Value = serde_json::from_str(&log.to_json().unwrap()).unwrap();
        assert_eq!(json[0]["op"], "remove_feature");
        assert_eq!(json[0]["name"], "x");
        assert_eq!(json[1]["mapper"], "double");
    }
}
