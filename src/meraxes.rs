//! Readers for Meraxes output files, written against the generic [`Node`] view.

use std::collections::BTreeMap;

use anyhow::{anyhow, Context, Result};
use log::{debug, warn};
use serde::Serialize;

use crate::config::ReportConfig;
use crate::consts::{
    ATTR_GITREF, ATTR_HUBBLE_H, ATTR_LTTIME, ATTR_REDSHIFT, ATTR_XH_MASS, ATTR_XH_VOLUME,
    DATASET_GALAXIES, DATASET_GITDIFF, GROUP_HUBBLE_CONV, GROUP_INPUT_PARAMS, GROUP_UNITS,
    SNAP_GROUP_PREFIX,
};
use crate::tree::{visit_items, AttrValue, DType, Node, NodeKind};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SnapRow {
    pub snapshot: u32,
    pub redshift: f64,
    /// Myr
    pub lookback_time: f64,
}

/// Weighting of the global neutral fraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum XhWeight {
    Volume,
    Mass,
}

impl XhWeight {
    pub fn attr_name(self) -> &'static str {
        match self {
            Self::Volume => ATTR_XH_VOLUME,
            Self::Mass => ATTR_XH_MASS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GitInfo {
    pub gitref: String,
    /// None when the run was built from a clean tree (empty dataset).
    pub diff: Option<String>,
}

pub fn snap_group_name(snap: u32) -> String {
    format!("{SNAP_GROUP_PREFIX}{snap:03}")
}

fn parse_snap_group(name: &str) -> Option<u32> {
    let digits = name.strip_prefix(SNAP_GROUP_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn require_group<N: Node>(root: &N, name: &str) -> Result<N> {
    root.child(name)?
        .ok_or_else(|| anyhow!("group '{}' not found in simulation output", name))
}

/// Hubble parameter: explicit override, else `InputParams/Hubble_h`.
pub fn little_h<N: Node>(root: &N, cfg: &ReportConfig) -> Result<f64> {
    if let Some(h) = cfg.little_h {
        return Ok(h);
    }
    let params = require_group(root, GROUP_INPUT_PARAMS)?;
    let h = params
        .attr(ATTR_HUBBLE_H)?
        .and_then(|v| v.as_f64())
        .with_context(|| format!("{GROUP_INPUT_PARAMS}/{ATTR_HUBBLE_H} missing or not numeric"))?;
    debug!("little h = {h}");
    Ok(h)
}

/// Snapshots present in the file, ordered by index. Lookback times are
/// converted from Myr/h to Myr with `h`.
pub fn read_snaplist<N: Node>(root: &N, h: f64) -> Result<Vec<SnapRow>> {
    let mut rows = Vec::new();
    for node in root.children()? {
        if node.kind() != NodeKind::Group {
            continue;
        }
        let Some(snapshot) = parse_snap_group(&node.name()) else {
            continue;
        };
        let z = node.attr(ATTR_REDSHIFT)?.and_then(|v| v.as_f64());
        let lt = node.attr(ATTR_LTTIME)?.and_then(|v| v.as_f64());
        match (z, lt) {
            (Some(redshift), Some(lt)) => rows.push(SnapRow {
                snapshot,
                redshift,
                lookback_time: lt / h,
            }),
            _ => debug!("skip {}: no {ATTR_REDSHIFT}/{ATTR_LTTIME}", node.name()),
        }
    }
    rows.sort_by_key(|r| r.snapshot);
    Ok(rows)
}

/// Global neutral fraction per snapshot; NaN where the file has no value.
pub fn read_global_xh<N: Node>(
    root: &N,
    snapshots: &[u32],
    weight: XhWeight,
    cfg: &ReportConfig,
) -> Result<Vec<f64>> {
    let attr = weight.attr_name();
    let mut out = Vec::with_capacity(snapshots.len());
    for &snap in snapshots {
        let name = snap_group_name(snap);
        let value = match root.child(&name)? {
            Some(g) => g.attr(attr)?.and_then(|v| v.as_f64()),
            None => None,
        };
        if value.is_none() && !cfg.quiet {
            warn!("{name}: no {attr}, using NaN");
        }
        out.push(value.unwrap_or(f64::NAN));
    }
    Ok(out)
}

pub fn read_git_info<N: Node>(root: &N) -> Result<GitInfo> {
    let ds = root
        .child(DATASET_GITDIFF)?
        .ok_or_else(|| anyhow!("dataset '{}' not found in simulation output", DATASET_GITDIFF))?;
    let gitref = ds
        .attr(ATTR_GITREF)?
        .with_context(|| format!("{DATASET_GITDIFF}: attribute '{ATTR_GITREF}' missing"))?
        .to_string();
    let diff = ds.read_text()?.filter(|d| !d.is_empty());
    Ok(GitInfo { gitref, diff })
}

fn attrs_of<N: Node>(node: &N) -> Result<BTreeMap<String, AttrValue>> {
    let mut map = BTreeMap::new();
    for name in node.attr_names()? {
        if let Some(v) = node.attr(&name)? {
            map.insert(name, v);
        }
    }
    Ok(map)
}

/// Physical unit per galaxy property (`Units` group attributes).
/// None if the file has no `Units` group.
pub fn read_units<N: Node>(root: &N) -> Result<Option<BTreeMap<String, String>>> {
    let Some(group) = root.child(GROUP_UNITS)? else {
        return Ok(None);
    };
    let units = attrs_of(&group)?
        .into_iter()
        .map(|(k, v)| (k, v.to_string()))
        .collect();
    Ok(Some(units))
}

/// Little-h conversion per galaxy property (`HubbleConversions` attributes).
/// None if the file has no `HubbleConversions` group.
pub fn read_hubble_conversions<N: Node>(root: &N) -> Result<Option<BTreeMap<String, AttrValue>>> {
    match root.child(GROUP_HUBBLE_CONV)? {
        Some(group) => Ok(Some(attrs_of(&group)?)),
        None => Ok(None),
    }
}

/// Element type of the first `Galaxies` dataset found under any group.
pub fn find_galaxy_dtype<N: Node>(root: &N) -> Result<Option<DType>> {
    visit_items(root, |node| {
        if node.kind() != NodeKind::Group {
            return Ok(None);
        }
        let Some(gals) = node.child(DATASET_GALAXIES)? else {
            return Ok(None);
        };
        if gals.kind() != NodeKind::Dataset {
            return Ok(None);
        }
        match gals.dtype()? {
            Some(dt @ DType::Compound(_)) => {
                debug!("galaxy structure found under {}", node.name());
                Ok(Some(dt))
            }
            _ => Ok(None),
        }
    })
}
