use std::path::Path;

use anyhow::Result;

use komodo::meraxes::{read_snaplist, XhWeight};
use komodo::report::{
    galaxy_props, galaxy_props_table, git_info, gitref_text, snaplist, snaplist_table,
    xhi_evolution,
};
use komodo::tree::{DType, Field};
use komodo::{KomodoError, MemNode, ReportConfig};

fn galaxies() -> MemNode {
    MemNode::dataset(
        "Galaxies",
        DType::Compound(vec![
            Field::new("ID", DType::UInt(8)),
            Field::new("Pos", DType::Array(Box::new(DType::Float(4)), vec![3])),
            Field::new("StellarMass", DType::Float(4)),
            Field::new("Type", DType::Int(4)),
        ]),
    )
}

fn snap(idx: u32, z: f64, lt: f64) -> MemNode {
    MemNode::group(&format!("Snap{idx:03}"))
        .with_attr("Redshift", z)
        .with_attr("LTTime", lt)
}

/// A small Meraxes-like file: three snapshots (one stored out of order,
/// one without xH values), provenance, units and conversions.
fn output() -> MemNode {
    MemNode::group("")
        .with_child(
            MemNode::group("HubbleConversions")
                .with_attr("ID", "None")
                .with_attr("Pos", "v/h")
                .with_attr("StellarMass", "v/h"),
        )
        .with_child(MemNode::group("InputParams").with_attr("Hubble_h", 0.5))
        .with_child(
            snap(0, 20.0, 13000.0)
                .with_attr("volume_weighted_global_xH", 1.0)
                .with_attr("mass_weighted_global_xH", 0.99),
        )
        .with_child(snap(10, 6.0, 12000.0).with_child(galaxies()))
        .with_child(
            snap(5, 10.0, 12500.0)
                .with_attr("volume_weighted_global_xH", 0.5)
                .with_attr("mass_weighted_global_xH", 0.4)
                .with_child(galaxies()),
        )
        .with_child(MemNode::group("SnapExtras"))
        .with_child(
            MemNode::group("Units")
                .with_attr("Pos", "Mpc/h")
                .with_attr("StellarMass", "1e10 solMass/h"),
        )
        .with_child(MemNode::text_dataset("gitdiff", "").with_attr("gitref", "0123abcd"))
}

#[test]
fn snaplist_sorted_and_h_corrected() -> Result<()> {
    let file = output();
    let rows = snaplist(&&file, &ReportConfig::default())?;
    let snaps: Vec<u32> = rows.iter().map(|r| r.snapshot).collect();
    assert_eq!(snaps, vec![0, 5, 10]);
    assert_eq!(rows[0].redshift, 20.0);
    assert_eq!(rows[0].lookback_time, 26000.0);

    let table = snaplist_table(&rows).to_string();
    let lines: Vec<&str> = table.lines().collect();
    assert!(lines[0].ends_with("lookback_time"));
    assert!(lines[1].ends_with("Myr"));
    assert_eq!(lines.len(), 3 + rows.len());
    Ok(())
}

#[test]
fn little_h_override_skips_file_value() -> Result<()> {
    let file = MemNode::group("").with_child(snap(1, 8.0, 100.0));
    // No InputParams at all: only the override can work.
    assert!(snaplist(&&file, &ReportConfig::default()).is_err());
    let cfg = ReportConfig {
        little_h: Some(1.0),
        ..ReportConfig::default()
    };
    let rows = snaplist(&&file, &cfg)?;
    assert_eq!(rows[0].lookback_time, 100.0);
    assert_eq!(read_snaplist(&&file, 0.25)?[0].lookback_time, 400.0);
    Ok(())
}

#[test]
fn xhi_weighting_and_missing_values() -> Result<()> {
    let file = output();
    let cfg = ReportConfig::default();

    let vol = xhi_evolution(&&file, XhWeight::Volume, &cfg)?;
    assert_eq!(vol[0].xhi, 1.0);
    assert_eq!(vol[1].xhi, 0.5);
    assert!(vol[2].xhi.is_nan());

    let mass = xhi_evolution(&&file, XhWeight::Mass, &cfg)?;
    assert_eq!(mass[1].xhi, 0.4);

    let v = serde_json::to_value(&mass)?;
    assert_eq!(v[1]["xHI"], 0.4);
    Ok(())
}

#[test]
fn gitref_without_diff() -> Result<()> {
    let file = output();
    let info = git_info(&&file)?;
    assert_eq!(info.gitref, "0123abcd");
    assert!(info.diff.is_none());
    assert_eq!(gitref_text(&info), "0123abcd\n");
    Ok(())
}

#[test]
fn gitref_with_diff() -> Result<()> {
    let file = MemNode::group("").with_child(
        MemNode::text_dataset("gitdiff", "diff --git a/core.c b/core.c\n+x\n")
            .with_attr("gitref", "feedface"),
    );
    let out = gitref_text(&git_info(&&file)?);
    assert_eq!(out, "feedface\n===\ndiff --git a/core.c b/core.c\n+x\n\n");
    Ok(())
}

#[test]
fn gitref_whitespace_diff_is_still_a_diff() -> Result<()> {
    let file = MemNode::group("")
        .with_child(MemNode::text_dataset("gitdiff", "\n").with_attr("gitref", "feedface"));
    let info = git_info(&&file)?;
    assert_eq!(info.diff.as_deref(), Some("\n"));
    assert_eq!(gitref_text(&info), "feedface\n===\n\n\n");
    Ok(())
}

#[test]
fn galaxy_props_from_first_snapshot_with_galaxies() -> Result<()> {
    let file = output();
    let rows = galaxy_props(&&file, Path::new("meraxes.hdf5"), &ReportConfig::default())?;
    let names: Vec<&str> = rows.iter().map(|r| r.property.as_str()).collect();
    assert_eq!(names, vec!["ID", "Pos", "StellarMass", "Type"]);

    assert_eq!(rows[1].dtype, "<f4 (3,)");
    assert_eq!(rows[1].h_conversion, "v/h");
    assert_eq!(rows[1].unit, "Mpc/h");
    assert_eq!(rows[0].dtype, "<u8");
    // ID has no unit, Type has neither entry.
    assert_eq!(rows[0].unit, "--");
    assert_eq!(rows[3].h_conversion, "--");

    let table = galaxy_props_table(&rows).to_string();
    assert!(table.lines().next().unwrap().contains("h conversion"));
    Ok(())
}

#[test]
fn galaxy_props_without_schema() {
    let file = MemNode::group("")
        .with_child(snap(0, 5.0, 1.0))
        // Not compound: does not count as a galaxy structure.
        .with_child(MemNode::group("Snap001").with_child(MemNode::dataset("Galaxies", DType::Float(4))));
    let err = galaxy_props(&&file, Path::new("empty.hdf5"), &ReportConfig::default()).unwrap_err();
    match err.downcast_ref::<KomodoError>() {
        Some(KomodoError::SchemaNotFound { path }) => assert_eq!(path, Path::new("empty.hdf5")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn galaxy_schema_found_in_nested_group() -> Result<()> {
    let file = MemNode::group("").with_child(
        MemNode::group("Outputs").with_child(MemNode::group("Snap042").with_child(galaxies())),
    );
    let rows = galaxy_props(&&file, Path::new("nested.hdf5"), &ReportConfig::default())?;
    assert_eq!(rows.len(), 4);
    assert!(rows.iter().all(|r| r.unit == "--" && r.h_conversion == "--"));
    Ok(())
}
