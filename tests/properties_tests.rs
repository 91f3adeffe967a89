//! End-to-end checks of the statistical building blocks.
//!
//! ## Test Organization
//!
//! 1. **Correlation** - matrix shape, symmetry and degenerate pairs
//! 2. **Transforms** - exact values of the closed set
//! 3. **Cross-tabulation** - counts and level order
//! 4. **Density** - KDE shape on clustered data
//! 5. **Loading** - CSV through to chart payloads

use approx::assert_relative_eq;

use rusty_eda::chart::bivariate::Axis;
use rusty_eda::stats::correlation::{CorrelationMatrix, pearson};
use rusty_eda::stats::crosstab::CrossTab;
use rusty_eda::stats::kde::{Kde1d, Kde2d};
use rusty_eda::stats::profile::DatasetProfile;
use rusty_eda::{
    AnalysisConfig, Cell, ChartData, ChartKind, ColumnKind, Dataset, KdeConfig, Transform,
    bivariate,
};

fn some(values: &[f64]) -> Vec<Option<f64>> {
    values.iter().copied().map(Some).collect()
}

// ============================================================================
// Correlation
// ============================================================================

fn weather() -> Vec<(String, Vec<Option<f64>>)> {
    vec![
        ("temp".into(), some(&[4.0, 18.0, 6.0, 20.0, 11.0, 15.0])),
        ("rain".into(), some(&[30.0, 8.0, 25.0, 1.0, 17.0, 12.0])),
        ("wind".into(), vec![Some(2.0), Some(5.0), None, Some(9.0), Some(1.0), Some(4.0)]),
        ("hours".into(), some(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0])),
    ]
}

/// Diagonal is exactly 1 and everything else lies in [-1, 1].
#[test]
fn test_correlation_bounds() {
    let m = CorrelationMatrix::compute(&weather()).unwrap();
    assert_eq!(m.len(), 4);
    for i in 0..m.len() {
        assert_eq!(m.get(i, i), Some(1.0));
        for j in 0..m.len() {
            let r = m.get(i, j).unwrap();
            assert!((-1.0..=1.0).contains(&r), "r({i}, {j}) = {r}");
        }
    }
}

/// Computing both orders of a pair gives the same coefficient.
#[test]
fn test_correlation_symmetry() {
    let m = CorrelationMatrix::compute(&weather()).unwrap();
    for i in 0..m.len() {
        for j in 0..m.len() {
            assert_relative_eq!(m.get(i, j).unwrap(), m.get(j, i).unwrap(), epsilon = 1e-9);
        }
    }
    assert!(m.by_name("temp", "rain").unwrap() < -0.9);
}

/// Pairwise self-correlation of a non-constant column.
#[test]
fn test_self_correlation() {
    let x = vec![Some(3.0), None, Some(-1.0), Some(8.5), Some(2.0)];
    assert_relative_eq!(pearson(&x, &x), 1.0, epsilon = 1e-12);
}

/// No complete pairs, or no variance, gives zero instead of NaN.
#[test]
fn test_degenerate_pairs_are_zero() {
    let x = vec![Some(1.0), None, Some(3.0)];
    let y = vec![None, Some(2.0), None];
    assert_eq!(pearson(&x, &y), 0.0);
    assert_eq!(pearson(&[], &[]), 0.0);

    let flat = some(&[5.0, 5.0, 5.0]);
    let up = some(&[1.0, 2.0, 3.0]);
    assert_eq!(pearson(&flat, &up), 0.0);
}

// ============================================================================
// Transforms
// ============================================================================

#[test]
fn test_square_transform() {
    let out: Vec<f64> = (1..=5)
        .filter_map(|v| Transform::Square.apply(v as f64))
        .collect();
    assert_eq!(out, vec![1.0, 4.0, 9.0, 16.0, 25.0]);
}

#[test]
fn test_log10_plus_one_is_exact() {
    assert_eq!(Transform::Log10Plus1.apply(9.0), Some(1.0));
    assert_eq!(Transform::Log10.apply(0.0), None);
    assert_eq!(Transform::LnPlus1.apply(-1.0), None);
    assert_eq!(Transform::Ln.apply(f64::INFINITY), None);
}

// ============================================================================
// Cross-tabulation
// ============================================================================

#[test]
fn test_crosstab_counts() {
    let ct = CrossTab::build(&["a", "a", "b"], &["c", "d", "c"]).unwrap();
    assert_eq!(ct.x_levels, vec!["a", "b"]);
    assert_eq!(ct.y_levels, vec!["c", "d"]);
    assert_eq!(ct.count("a", "c"), Some(1));
    assert_eq!(ct.count("a", "d"), Some(1));
    assert_eq!(ct.count("b", "c"), Some(1));
    assert_eq!(ct.count("b", "d"), Some(0));
    assert_eq!(ct.total, 3);
}

/// Levels keep first-seen order rather than being sorted.
#[test]
fn test_crosstab_first_seen_order() {
    let ct = CrossTab::build(&["z", "m", "a", "m"], &["2", "1", "2", "3"]).unwrap();
    assert_eq!(ct.x_levels, vec!["z", "m", "a"]);
    assert_eq!(ct.y_levels, vec!["2", "1", "3"]);
    assert_eq!(ct.row_totals(), vec![1, 2, 1]);
}

// ============================================================================
// Density
// ============================================================================

#[test]
fn test_kde_peaks_at_cluster() {
    let mut samples = vec![10.0, 10.1, 9.9, 10.05, 9.95, 10.02];
    samples.extend([0.0, 20.0]);
    let kde = Kde1d::fit(&samples, &KdeConfig::default()).unwrap();
    assert!(kde.density(10.0) > kde.density(5.0));
    assert!(kde.density(10.0) > kde.density(0.0));

    let curve = kde.curve();
    assert_eq!(curve.x.len(), 50);
    assert_relative_eq!(curve.x[0], 0.0);
    assert_relative_eq!(curve.x[49], 20.0, epsilon = 1e-12);
}

#[test]
fn test_kde2d_peaks_at_cluster() {
    let x = vec![Some(1.0), Some(1.1), Some(0.9), Some(1.0), Some(5.0), None];
    let y = vec![Some(2.0), Some(2.1), Some(1.9), Some(2.0), Some(8.0), Some(3.0)];
    let kde = Kde2d::fit(&x, &y, &KdeConfig::default()).unwrap();
    assert!(kde.density(1.0, 2.0) > kde.density(3.0, 5.0));

    let grid = kde.grid();
    assert_eq!(grid.z.len(), grid.y.len());
    assert!(grid.z.iter().all(|row| row.len() == grid.x.len()));
}

// ============================================================================
// Loading through to charts
// ============================================================================

const SALES_CSV: &str = "\
region,units,price,channel
North,10,2.5,online
South,20,,store
North,15,3.0,online
East,,4.0,online
South,30,1.0,inf
";

#[test]
fn test_csv_to_profile_and_charts() {
    let loaded = rusty_eda::data::loader::load_csv(SALES_CSV.as_bytes()).unwrap();
    let (ds, schema) = (loaded.dataset, loaded.schema);
    assert_eq!(ds.len(), 5);
    assert_eq!(schema.kind_of("units"), ColumnKind::Numeric);
    assert_eq!(schema.kind_of("region"), ColumnKind::Categorical);
    assert_eq!(schema.kind_of("channel"), ColumnKind::Categorical);

    let profile = DatasetProfile::build(&ds, &schema, 3.0).unwrap();
    let units = profile.numeric.iter().find(|p| p.column == "units").unwrap();
    assert_eq!(units.missing_count, 1);
    assert_relative_eq!(units.missing_percentage, 20.0);

    let cfg = AnalysisConfig::default();
    let data = bivariate(
        &ds,
        &schema,
        Axis::new("region", Transform::Identity),
        Axis::new("units", Transform::Identity),
        ChartKind::Bar,
        &cfg,
    )
    .unwrap();
    let ChartData::Bar { categories, values } = data else {
        panic!("expected a bar payload");
    };
    assert_eq!(categories, vec!["North", "South", "East"]);
    assert_relative_eq!(values[0], 12.5);
    assert_relative_eq!(values[1], 25.0);
    // East has no valid units.
    assert_eq!(values[2], 0.0);
}

#[test]
fn test_ragged_rows() {
    let headers = vec!["a".to_string(), "b".to_string()];
    let ds = Dataset::new(headers.clone(), vec![vec![Cell::Number(1.0)]]).unwrap();
    assert_eq!(ds.rows[0].len(), 2);

    let too_long = vec![vec![Cell::Number(1.0), Cell::Number(2.0), Cell::Number(3.0)]];
    assert!(Dataset::new(headers, too_long).is_err());
}
