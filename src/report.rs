//! Reporting commands: read what they need from a simulation output and lay
//! it out as rows/tables. Printing is left to the caller.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::Result;
use log::warn;
use serde::Serialize;

use crate::config::ReportConfig;
use crate::consts::MASKED;
use crate::error::KomodoError;
use crate::meraxes::{
    find_galaxy_dtype, little_h, read_git_info, read_global_xh, read_hubble_conversions,
    read_snaplist, read_units, GitInfo, SnapRow, XhWeight,
};
use crate::table::{fmt_float, Column, Table};
use crate::tree::Node;

pub const LOOKBACK_UNIT: &str = "Myr";

// ---------------- snaplist ----------------

pub fn snaplist<N: Node>(root: &N, cfg: &ReportConfig) -> Result<Vec<SnapRow>> {
    let h = little_h(root, cfg)?;
    read_snaplist(root, h)
}

fn snap_columns(snapshots: Vec<String>, z: Vec<String>, lt: Vec<String>) -> Vec<Column> {
    vec![
        Column::new("snapshot", snapshots),
        Column::new("redshift", z),
        Column::new("lookback_time", lt).with_unit(LOOKBACK_UNIT),
    ]
}

pub fn snaplist_table(rows: &[SnapRow]) -> Table {
    Table::new(snap_columns(
        rows.iter().map(|r| r.snapshot.to_string()).collect(),
        rows.iter().map(|r| fmt_float(r.redshift)).collect(),
        rows.iter().map(|r| fmt_float(r.lookback_time)).collect(),
    ))
}

// ---------------- xHI_evo ----------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct XhiRow {
    pub snapshot: u32,
    pub redshift: f64,
    pub lookback_time: f64,
    #[serde(rename = "xHI")]
    pub xhi: f64,
}

pub fn xhi_evolution<N: Node>(root: &N, weight: XhWeight, cfg: &ReportConfig) -> Result<Vec<XhiRow>> {
    let snaps = snaplist(root, cfg)?;
    let ids: Vec<u32> = snaps.iter().map(|r| r.snapshot).collect();
    let xhi = read_global_xh(root, &ids, weight, cfg)?;
    Ok(snaps
        .iter()
        .zip(xhi)
        .map(|(s, x)| XhiRow {
            snapshot: s.snapshot,
            redshift: s.redshift,
            lookback_time: s.lookback_time,
            xhi: x,
        })
        .collect())
}

pub fn xhi_table(rows: &[XhiRow]) -> Table {
    let mut columns = snap_columns(
        rows.iter().map(|r| r.snapshot.to_string()).collect(),
        rows.iter().map(|r| fmt_float(r.redshift)).collect(),
        rows.iter().map(|r| fmt_float(r.lookback_time)).collect(),
    );
    columns.push(Column::new("xHI", rows.iter().map(|r| fmt_float(r.xhi)).collect()));
    Table::new(columns)
}

// ---------------- gitref ----------------

pub fn git_info<N: Node>(root: &N) -> Result<GitInfo> {
    read_git_info(root)
}

/// Ref line, then `===` and the diff as stored when the diff is non-empty.
pub fn gitref_text(info: &GitInfo) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", info.gitref);
    if let Some(diff) = info.diff.as_deref().filter(|d| !d.is_empty()) {
        let _ = writeln!(out, "===");
        let _ = writeln!(out, "{diff}");
    }
    out
}

// ---------------- galaxy_props ----------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropRow {
    pub property: String,
    pub h_conversion: String,
    pub unit: String,
    pub dtype: String,
}

/// One row per galaxy property. `origin` names the file in errors.
pub fn galaxy_props<N: Node>(root: &N, origin: &Path, cfg: &ReportConfig) -> Result<Vec<PropRow>> {
    let dtype = find_galaxy_dtype(root)?.ok_or_else(|| KomodoError::SchemaNotFound {
        path: origin.to_path_buf(),
    })?;

    let h_conv = read_hubble_conversions(root)?.unwrap_or_else(|| {
        if !cfg.quiet {
            warn!("{}: no HubbleConversions group", origin.display());
        }
        Default::default()
    });
    let units = read_units(root)?.unwrap_or_else(|| {
        if !cfg.quiet {
            warn!("{}: no Units group", origin.display());
        }
        Default::default()
    });

    let fields = dtype.fields().unwrap_or_default();
    let mut rows = Vec::with_capacity(fields.len());
    for f in fields {
        let h = h_conv.get(&f.name).map(|v| v.to_string());
        let unit = units.get(&f.name).cloned();
        if (h.is_none() || unit.is_none()) && !cfg.quiet {
            warn!("{}: missing h conversion or unit", f.name);
        }
        rows.push(PropRow {
            property: f.name.clone(),
            h_conversion: h.unwrap_or_else(|| MASKED.to_string()),
            unit: unit.unwrap_or_else(|| MASKED.to_string()),
            dtype: f.ty.numpy_str(),
        });
    }
    Ok(rows)
}

pub fn galaxy_props_table(rows: &[PropRow]) -> Table {
    Table::new(vec![
        Column::new("property", rows.iter().map(|r| r.property.clone()).collect()),
        Column::new("h conversion", rows.iter().map(|r| r.h_conversion.clone()).collect()),
        Column::new("unit", rows.iter().map(|r| r.unit.clone()).collect()),
        Column::new("dtype", rows.iter().map(|r| r.dtype.clone()).collect()),
    ])
}
