// src/exploration.rs
//! Tabular summary of a training dataset: shape, per-column statistics,
//! class distribution and pairwise correlations.

use anyhow::{bail, Context, Result};
use log::{debug, info};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

/// Column holding the quality class in the training data.
pub const TARGET_COLUMN: &str = "quality_category";

/// Count, mean, standard deviation, quartiles and extremes of one column.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub name: String,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; `None` below two values.
    pub std: Option<f64>,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// Pearson coefficients; `None` when a pair has fewer than two shared
    /// values or no variance.
    pub values: Vec<Vec<Option<f64>>>,
}

#[derive(Serialize, Debug, Clone)]
pub struct DatasetSummary {
    pub n_rows: usize,
    pub n_columns: usize,
    pub columns: Vec<String>,
    pub statistics: Vec<ColumnSummary>,
    pub class_counts: Option<BTreeMap<String, usize>>,
    pub correlation: CorrelationMatrix,
}

/// Raw CSV cells with their header.
#[derive(Debug, Clone)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Dataset {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let columns: Vec<String> = csv_reader
            .headers()
            .context("Failed to read CSV header")?
            .iter()
            .map(|s| s.to_string())
            .collect();
        if columns.is_empty() {
            bail!("CSV file has no columns");
        }

        let mut rows = Vec::new();
        for (index, row) in csv_reader.deserialize::<Vec<String>>().enumerate() {
            let row = row.with_context(|| format!("Invalid CSV record #{}", index + 1))?;
            rows.push(row);
        }
        debug!("Read {} rows x {} columns", rows.len(), columns.len());

        Ok(Self { columns, rows })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("📊 Loading dataset from {}", path.display());
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open dataset {}", path.display()))?;
        Self::from_reader(file)
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Cell values of a column when every non-empty cell is a number.
    /// Empty and NaN cells are missing. `None` for text columns.
    fn numeric_column(&self, index: usize) -> Option<Vec<Option<f64>>> {
        let mut values = Vec::with_capacity(self.rows.len());
        let mut present = 0;
        for row in &self.rows {
            let cell = row[index].as_str();
            if cell.is_empty() {
                values.push(None);
                continue;
            }
            let value: f64 = cell.parse().ok()?;
            if value.is_finite() {
                present += 1;
                values.push(Some(value));
            } else {
                values.push(None);
            }
        }
        (present > 0).then_some(values)
    }

    fn numeric_columns(&self) -> Vec<(String, Vec<Option<f64>>)> {
        (0..self.columns.len())
            .filter_map(|i| {
                self.numeric_column(i)
                    .map(|values| (self.columns[i].clone(), values))
            })
            .collect()
    }

    /// Statistics of every numeric column, in file order.
    pub fn describe(&self) -> Vec<ColumnSummary> {
        self.numeric_columns()
            .into_iter()
            .map(|(name, values)| {
                let present: Vec<f64> = values.into_iter().flatten().collect();
                describe_column(name, &present)
            })
            .collect()
    }

    /// Number of rows per distinct value of `column`, empty cells excluded.
    pub fn class_counts(&self, column: &str) -> Option<BTreeMap<String, usize>> {
        let index = self.columns.iter().position(|c| c == column)?;
        let mut counts = BTreeMap::new();
        for row in &self.rows {
            let cell = &row[index];
            if !cell.is_empty() {
                *counts.entry(cell.clone()).or_insert(0) += 1;
            }
        }
        Some(counts)
    }

    /// Pearson correlation between every pair of numeric columns, over the
    /// rows where both values are present.
    pub fn correlation(&self) -> CorrelationMatrix {
        let numeric = self.numeric_columns();
        let values = numeric
            .iter()
            .map(|(_, a)| numeric.iter().map(|(_, b)| pearson(a, b)).collect())
            .collect();
        CorrelationMatrix {
            columns: numeric.into_iter().map(|(name, _)| name).collect(),
            values,
        }
    }

    pub fn summarize(&self) -> DatasetSummary {
        DatasetSummary {
            n_rows: self.n_rows(),
            n_columns: self.n_columns(),
            columns: self.columns.clone(),
            statistics: self.describe(),
            class_counts: self.class_counts(TARGET_COLUMN),
            correlation: self.correlation(),
        }
    }
}

fn describe_column(name: String, values: &[f64]) -> ColumnSummary {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let n = sorted.len() as f64;
    let mean = sorted.iter().sum::<f64>() / n;
    let std = (sorted.len() > 1)
        .then(|| (sorted.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt());

    ColumnSummary {
        name,
        count: sorted.len(),
        mean,
        std,
        min: sorted[0],
        q25: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q75: quantile(&sorted, 0.75),
        max: sorted[sorted.len() - 1],
    }
}

/// Linear interpolation between the closest ranks of a sorted, non-empty
/// slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    sorted[lower] + (sorted[upper] - sorted[lower]) * (position - lower as f64)
}

fn pearson(a: &[Option<f64>], b: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;
    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denominator = (var_x * var_y).sqrt();
    (denominator > 0.0).then(|| (cov / denominator).clamp(-1.0, 1.0))
}
