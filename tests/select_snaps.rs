use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;

use komodo::select::selection_table;
use komodo::{
    select_snaps, snaplist_line, ExpansionFactorTable, KomodoConfig, KomodoError, RedshiftQuery,
};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn unique_root(prefix: &str) -> PathBuf {
    let pid = std::process::id();
    let t = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    let base = std::env::temp_dir();
    base.join(format!("komodotest-select-{prefix}-{pid}-{t}-{id}"))
}

fn random_table(rng: &mut oorandom::Rand64, n: usize) -> Vec<f64> {
    // (0, 1], coarse grid so that duplicates and exact ties occur.
    (0..n)
        .map(|_| (rng.rand_range(1..65) as f64) / 64.0)
        .collect()
}

#[test]
fn nearest_is_global_minimum_with_lowest_index_on_ties() -> Result<()> {
    let mut rng = oorandom::Rand64::new(0x5eed_0001);
    for _ in 0..200 {
        let n = rng.rand_range(1..40) as usize;
        let factors = random_table(&mut rng, n);
        let z_avail: Vec<f64> = factors.iter().map(|a| 1.0 / a - 1.0).collect();
        let queries: Vec<f64> = (0..8).map(|_| rng.rand_float() * 80.0 - 5.0).collect();

        let rows = select_snaps(&factors, queries.clone())?;
        assert_eq!(rows.len(), queries.len());
        for (row, &q) in rows.iter().zip(&queries) {
            let best = (row.nearest - q).abs();
            assert_eq!(row.nearest, z_avail[row.snapshot]);
            for (j, zj) in z_avail.iter().enumerate() {
                let d = (zj - q).abs();
                assert!(best <= d, "snapshot {} not nearest for q={q}", row.snapshot);
                if j < row.snapshot {
                    assert!(d > best, "lower index {j} ties with {}", row.snapshot);
                }
            }
        }
    }
    Ok(())
}

#[test]
fn output_follows_query_order() -> Result<()> {
    let table = ExpansionFactorTable::bundled()?;
    let queries = vec![6.0, 12.0, 8.5, 20.0, 3.0];
    let rows = table.select(&RedshiftQuery::from(queries.clone()))?;

    let mut reversed = queries.clone();
    reversed.reverse();
    let rows_rev = table.select(&RedshiftQuery::from(reversed))?;

    let requested: Vec<f64> = rows.iter().map(|r| r.requested).collect();
    assert_eq!(requested, queries);
    let mut back = rows_rev.clone();
    back.reverse();
    assert_eq!(back, rows);
    Ok(())
}

#[test]
fn repeated_calls_agree() -> Result<()> {
    let table = ExpansionFactorTable::bundled()?;
    let q = RedshiftQuery::from(vec![5.0, 7.25, 11.0]);
    assert_eq!(table.select(&q)?, table.select(&q)?);
    Ok(())
}

#[test]
fn compact_line_matches_snapshot_column() -> Result<()> {
    let table = ExpansionFactorTable::bundled()?;
    let rows = table.select(&RedshiftQuery::from(vec![15.0, 6.0, 9.0, 6.0]))?;
    let line = snaplist_line(&rows);
    let parsed: Vec<usize> = line
        .split_whitespace()
        .map(|s| s.parse().unwrap())
        .collect();

    let rendered = selection_table(&rows).to_string();
    let from_table: Vec<usize> = rendered
        .lines()
        .skip(2)
        .map(|l| l.split_whitespace().last().unwrap().parse().unwrap())
        .collect();
    assert_eq!(parsed, from_table);
    assert_eq!(parsed, rows.iter().map(|r| r.snapshot).collect::<Vec<_>>());
    Ok(())
}

#[test]
fn scalar_query_on_small_table() -> Result<()> {
    let rows = select_snaps(&[1.0, 0.5, 0.25], 2.0)?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].snapshot, 1);
    assert_eq!(rows[0].nearest, 1.0);
    Ok(())
}

#[test]
fn empty_table_rejected_for_any_query() {
    for q in [vec![1.0], vec![f64::NAN], vec![0.0, 100.0]] {
        let err = select_snaps(&[], q).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<KomodoError>(),
            Some(KomodoError::InvalidTable { .. })
        ));
    }
}

#[test]
fn alist_file_round_trip() -> Result<()> {
    let root = unique_root("alist");
    fs::create_dir_all(&root)?;
    let path = root.join("alist.txt");
    fs::write(&path, "# test list\n0.1\n0.2\n0.25\n0.5\n1.0\n")?;

    let table = ExpansionFactorTable::load_or_bundled(Some(path.as_path()))?;
    assert_eq!(table.len(), 5);
    let rows = table.select(&RedshiftQuery::from(vec![9.0, 3.2, 0.1]))?;
    let snaps: Vec<usize> = rows.iter().map(|r| r.snapshot).collect();
    assert_eq!(snaps, vec![0, 2, 4]);

    fs::remove_dir_all(&root)?;
    Ok(())
}

#[test]
fn configured_alist_replaces_bundled_table() -> Result<()> {
    let root = unique_root("alist-cfg");
    fs::create_dir_all(&root)?;
    let path = root.join("alist.txt");
    fs::write(&path, "0.25\n0.5\n1.0\n")?;

    let cfg = KomodoConfig::default().with_alist(Some(&path));
    let table = ExpansionFactorTable::from_config(&cfg)?;
    assert_eq!(table.factors(), &[0.25, 0.5, 1.0]);

    let bundled = ExpansionFactorTable::from_config(&KomodoConfig::default())?;
    assert_eq!(bundled.len(), 164);

    // A later None clears the override.
    let cleared = cfg.with_alist(None::<&std::path::Path>);
    assert!(cleared.alist.is_none());

    fs::remove_dir_all(&root)?;
    Ok(())
}

#[test]
fn alist_with_non_positive_entry_is_rejected() -> Result<()> {
    let root = unique_root("alist-bad");
    fs::create_dir_all(&root)?;
    let path = root.join("alist.txt");
    fs::write(&path, "0.5\n0.0\n")?;

    let err = ExpansionFactorTable::load(&path).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<KomodoError>(),
        Some(KomodoError::InvalidTable { .. })
    ));

    fs::remove_dir_all(&root)?;
    Ok(())
}

#[test]
fn bundled_table_json_rows() -> Result<()> {
    let table = ExpansionFactorTable::bundled()?;
    let rows = table.select(&RedshiftQuery::from(35.0))?;
    let v = serde_json::to_value(&rows)?;
    assert_eq!(v[0]["snapshot"], 0);
    assert_eq!(v[0]["requested"], 35.0);
    Ok(())
}
