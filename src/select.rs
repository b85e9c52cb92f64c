//! Nearest-snapshot selection for requested redshifts.

use anyhow::Result;
use serde::Serialize;

use crate::alist::ExpansionFactorTable;
use crate::error::KomodoError;
use crate::table::{fmt_float, Column, Table};

/// Requested redshifts; a single value is just a one-element query.
#[derive(Debug, Clone, PartialEq)]
pub struct RedshiftQuery(Vec<f64>);

impl RedshiftQuery {
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    fn validate(&self) -> Result<()> {
        for (index, &value) in self.0.iter().enumerate() {
            if !value.is_finite() {
                return Err(KomodoError::InvalidQuery { index, value }.into());
            }
        }
        Ok(())
    }
}

impl From<f64> for RedshiftQuery {
    fn from(z: f64) -> Self {
        Self(vec![z])
    }
}

impl From<Vec<f64>> for RedshiftQuery {
    fn from(z: Vec<f64>) -> Self {
        Self(z)
    }
}

impl From<&[f64]> for RedshiftQuery {
    fn from(z: &[f64]) -> Self {
        Self(z.to_vec())
    }
}

/// One row of the selection result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Selection {
    pub requested: f64,
    pub nearest: f64,
    pub snapshot: usize,
}

impl ExpansionFactorTable {
    /// For each query, the snapshot whose redshift is closest.
    /// Ties go to the lowest snapshot index.
    pub fn select(&self, query: &RedshiftQuery) -> Result<Vec<Selection>> {
        query.validate()?;
        let z_avail = self.redshifts();
        Ok(query
            .values()
            .iter()
            .map(|&q| {
                let snapshot = argmin_distance(&z_avail, q);
                Selection {
                    requested: q,
                    nearest: z_avail[snapshot],
                    snapshot,
                }
            })
            .collect())
    }
}

/// Validate `factors` and select against it in one call.
pub fn select_snaps(factors: &[f64], query: impl Into<RedshiftQuery>) -> Result<Vec<Selection>> {
    let table = ExpansionFactorTable::new(factors.to_vec())?;
    table.select(&query.into())
}

// First index of the minimum |z - q|; `z` is non-empty.
fn argmin_distance(z: &[f64], q: f64) -> usize {
    let mut best = 0;
    let mut best_d = (z[0] - q).abs();
    for (i, zi) in z.iter().enumerate().skip(1) {
        let d = (zi - q).abs();
        if d < best_d {
            best = i;
            best_d = d;
        }
    }
    best
}

/// Space-separated snapshot indices, query order (Meraxes snaplist input).
pub fn snaplist_line(rows: &[Selection]) -> String {
    rows.iter()
        .map(|r| r.snapshot.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn selection_table(rows: &[Selection]) -> Table {
    Table::new(vec![
        Column::new("requested", rows.iter().map(|r| fmt_float(r.requested)).collect()),
        Column::new("nearest", rows.iter().map(|r| fmt_float(r.nearest)).collect()),
        Column::new("snapshot", rows.iter().map(|r| r.snapshot.to_string()).collect()),
    ])
}
