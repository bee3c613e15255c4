//! Numeric kernels used by the session transforms and the feature plots

use serde::{Deserialize, Serialize};

use crate::data::model::{Column, Value};
use crate::error::{DoraError, Result};

/// Read a column as optional floats. Missing and NaN cells become `None`;
/// any text cell is an error.
pub fn numeric_values(column: &Column) -> Result<Vec<Option<f64>>> {
    column
        .values
        .iter()
        .map(|v| match v {
            Value::Null => Ok(None),
            Value::Float(f) if f.is_nan() => Ok(None),
            other => other.as_f64().map(Some).ok_or_else(|| {
                DoraError::NumericOperation(format!(
                    "column '{}' is not numeric (found '{other}')",
                    column.name
                ))
            }),
        })
        .collect()
}

/// Mean of the present values, `None` when nothing is present.
pub fn mean(values: &[Option<f64>]) -> Option<f64> {
    let (sum, count) = values
        .iter()
        .flatten()
        .fold((0.0_f64, 0usize), |(s, n), v| (s + v, n + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Population standard deviation (ddof = 0) of the present values.
pub fn std_dev(values: &[Option<f64>]) -> Option<f64> {
    let m = mean(values)?;
    let (sq, count) = values
        .iter()
        .flatten()
        .fold((0.0_f64, 0usize), |(s, n), v| (s + (v - m).powi(2), n + 1));
    Some((sq / count as f64).sqrt())
}

/// Fill missing cells with the column mean.
///
/// A column without missing cells is returned unchanged; otherwise the
/// result is a float column. NaN counts as missing.
pub fn impute_mean(column: &Column) -> Result<Column> {
    let values = numeric_values(column)?;
    if values.iter().all(Option::is_some) {
        return Ok(column.clone());
    }
    let fill = mean(&values).ok_or_else(|| {
        DoraError::NumericOperation(format!(
            "column '{}' has no observed values to impute from",
            column.name
        ))
    })?;
    if !fill.is_finite() {
        return Err(DoraError::NumericOperation(format!(
            "column '{}' has a non-finite mean",
            column.name
        )));
    }
    let filled: Vec<Option<f64>> = values.iter().map(|v| Some(v.unwrap_or(fill))).collect();
    Ok(Column::from_f64(column.name.clone(), &filled))
}

/// Z-score standardization: `(x - mean) / std`.
///
/// A constant column is scaled by 1 and becomes all zeros. Missing cells
/// stay missing.
pub fn standardize(column: &Column) -> Result<Column> {
    let values = numeric_values(column)?;
    let (Some(center), Some(std)) = (mean(&values), std_dev(&values)) else {
        return Err(DoraError::NumericOperation(format!(
            "column '{}' has no observed values to scale",
            column.name
        )));
    };
    if !center.is_finite() || !std.is_finite() {
        return Err(DoraError::NumericOperation(format!(
            "column '{}' has non-finite values",
            column.name
        )));
    }
    let scale = if std == 0.0 { 1.0 } else { std };
    let scaled: Vec<Option<f64>> = values
        .iter()
        .map(|v| v.map(|x| (x - center) / scale))
        .collect();
    Ok(Column::from_f64(column.name.clone(), &scaled))
}

/// `y = slope * x + intercept`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Ordinary least squares fit of `ys` against `xs` (degree 1).
pub fn linear_fit(xs: &[f64], ys: &[f64]) -> Result<LinearFit> {
    if xs.len() != ys.len() {
        return Err(DoraError::NumericOperation(format!(
            "fit needs paired samples, got {} x and {} y",
            xs.len(),
            ys.len()
        )));
    }
    if xs.len() < 2 {
        return Err(DoraError::NumericOperation(
            "fit needs at least two points".to_string(),
        ));
    }

    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let (sxy, sxx) = xs
        .iter()
        .zip(ys)
        .fold((0.0_f64, 0.0_f64), |(sxy, sxx), (&x, &y)| {
            (sxy + (x - mean_x) * (y - mean_y), sxx + (x - mean_x).powi(2))
        });

    if sxx == 0.0 {
        return Err(DoraError::NumericOperation(
            "fit is undefined for a constant feature".to_string(),
        ));
    }

    let slope = sxy / sxx;
    Ok(LinearFit {
        slope,
        intercept: mean_y - slope * mean_x,
    })
}
