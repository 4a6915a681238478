//! CSV ingestion for the treatment models.
//!
//! Two table shapes arrive from callers: a square transition-cost matrix
//! (treatment labels as both header and row index) and a per-feature
//! target-action table with fixed column names. Both are validated here,
//! before any model building starts.

use std::io::Read;

use super::ModelError;

/// Square cost-per-unit-area matrix for treatment transitions. The
/// diagonal is carried but never read: staying in the current treatment
/// creates no decision variable.
#[derive(Debug, Clone)]
pub struct TreatmentCostMatrix {
    labels: Vec<String>,
    costs: Vec<f64>,
}

impl TreatmentCostMatrix {
    pub fn from_csv(text: &str) -> Result<Self, ModelError> {
        Self::from_reader(text.as_bytes())
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ModelError> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        // First header field is the index column name, the rest are labels.
        let headers = rdr.headers()?.clone();
        let labels: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();
        if labels.is_empty() {
            return Err(ModelError::CostTableNotSquare);
        }

        let mut row_labels = Vec::with_capacity(labels.len());
        let mut costs = Vec::with_capacity(labels.len() * labels.len());
        for record in rdr.records() {
            let record = record?;
            if record.len() != labels.len() + 1 {
                return Err(ModelError::CostTableNotSquare);
            }
            row_labels.push(record[0].to_string());
            for field in record.iter().skip(1) {
                costs.push(field.parse::<f64>().map_err(|_| ModelError::BadNumber {
                    where_: "treatment cost matrix",
                    value: field.to_string(),
                })?);
            }
        }

        if row_labels != labels {
            return Err(ModelError::CostTableNotSquare);
        }

        Ok(Self { labels, costs })
    }

    /// Number of treatments.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Transition cost per unit area from treatment `from` to `to`.
    pub fn cost(&self, from: usize, to: usize) -> f64 {
        self.costs[from * self.labels.len() + to]
    }
}

/// One row of the per-feature target-action table.
#[derive(Debug, Clone, PartialEq)]
pub struct TreatmentOptionRow {
    pub fid: i64,
    pub treatment: String,
    pub value: f64,
    pub value_per_area: f64,
    pub cost: f64,
    pub cost_per_area: f64,
}

const REQUIRED_COLUMNS: [&str; 6] = ["fid", "treatment", "value", "value/m2", "cost", "cost/m2"];

/// Parse the `fid, treatment, value, value/m2, cost, cost/m2` table,
/// accepting the columns in any order.
pub fn treatment_options_from_csv(text: &str) -> Result<Vec<TreatmentOptionRow>, ModelError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = rdr.headers()?.clone();
    let mut positions = [0usize; 6];
    for (slot, col) in REQUIRED_COLUMNS.into_iter().enumerate() {
        positions[slot] = headers
            .iter()
            .position(|h| h == col)
            .ok_or(ModelError::MissingColumn(col))?;
    }

    let parse_f64 = |field: &str| {
        field.parse::<f64>().map_err(|_| ModelError::BadNumber {
            where_: "treatments table",
            value: field.to_string(),
        })
    };

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let fid = record[positions[0]]
            .parse::<i64>()
            .map_err(|_| ModelError::BadNumber {
                where_: "treatments table",
                value: record[positions[0]].to_string(),
            })?;
        rows.push(TreatmentOptionRow {
            fid,
            treatment: record[positions[1]].to_string(),
            value: parse_f64(&record[positions[2]])?,
            value_per_area: parse_f64(&record[positions[3]])?,
            cost: parse_f64(&record[positions[4]])?,
            cost_per_area: parse_f64(&record[positions[5]])?,
        });
    }
    Ok(rows)
}
