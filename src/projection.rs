// Compound-growth trajectory from a baseline year's mean ESG score. The
// projection uses only the supplied rate, never a fitted historical trend.
use std::collections::HashMap;

use crate::types::{ProjectionSeries, Record, YearScore};
use crate::util::average;

pub const DEFAULT_HORIZON_YEARS: usize = 6;

/// Project the view's mean ESG score forward from `baseline_year` at
/// `rate_pct` percent per year for `horizon_years` points, the baseline year
/// included. Returns `None` when the view holds no records for the baseline
/// year, since no baseline score exists. The historical mean series for all
/// years up to and including the baseline rides along unmodified.
pub fn project(
    view: &[Record],
    baseline_year: i32,
    rate_pct: f64,
    horizon_years: usize,
) -> Option<ProjectionSeries> {
    let baseline: Vec<f64> = view
        .iter()
        .filter(|r| r.year == baseline_year)
        .map(|r| r.esg_overall)
        .collect();
    if baseline.is_empty() {
        return None;
    }
    let baseline_score = average(&baseline);

    let projected = (0..horizon_years)
        .map(|i| YearScore {
            year: baseline_year + i as i32,
            score: baseline_score * (1.0 + rate_pct / 100.0).powi(i as i32),
        })
        .collect();

    let mut by_year: HashMap<i32, Vec<f64>> = HashMap::new();
    for r in view.iter().filter(|r| r.year <= baseline_year) {
        by_year.entry(r.year).or_default().push(r.esg_overall);
    }
    let mut historical: Vec<YearScore> = by_year
        .into_iter()
        .map(|(year, scores)| YearScore {
            year,
            score: average(&scores),
        })
        .collect();
    historical.sort_by_key(|p| p.year);

    Some(ProjectionSeries {
        baseline_year,
        rate_pct,
        historical,
        projected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::sample_record;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_compound_growth_from_baseline() {
        let view = vec![
            sample_record("Company_1", 2015, 55.0),
            sample_record("Company_2", 2015, 65.0),
        ];
        let series = project(&view, 2015, 5.0, 3).unwrap();
        let scores: Vec<f64> = series.projected.iter().map(|p| p.score).collect();
        assert_eq!(
            series.projected.iter().map(|p| p.year).collect::<Vec<_>>(),
            vec![2015, 2016, 2017]
        );
        assert_abs_diff_eq!(scores[0], 60.0, epsilon = 1e-9);
        assert_abs_diff_eq!(scores[1], 63.0, epsilon = 1e-9);
        assert_abs_diff_eq!(scores[2], 66.15, epsilon = 1e-9);
    }

    #[test]
    fn test_missing_baseline_year_yields_no_projection() {
        let view = vec![sample_record("Company_1", 2016, 60.0)];
        assert!(project(&view, 2015, 5.0, 6).is_none());
        assert!(project(&[], 2015, 5.0, 6).is_none());
    }

    #[test]
    fn test_historical_series_stops_at_baseline() {
        let view = vec![
            sample_record("Company_1", 2015, 50.0),
            sample_record("Company_1", 2016, 54.0),
            sample_record("Company_1", 2017, 58.0),
            sample_record("Company_1", 2018, 62.0),
        ];
        let series = project(&view, 2016, 2.0, 4).unwrap();
        assert_eq!(
            series.historical.iter().map(|p| p.year).collect::<Vec<_>>(),
            vec![2015, 2016]
        );
        assert_abs_diff_eq!(series.historical[0].score, 50.0);
        assert_abs_diff_eq!(series.historical[1].score, 54.0);
    }

    #[test]
    fn test_negative_rate_decays() {
        let view = vec![sample_record("Company_1", 2020, 80.0)];
        let series = project(&view, 2020, -10.0, 2).unwrap();
        assert_abs_diff_eq!(series.projected[1].score, 72.0, epsilon = 1e-9);
    }
}
