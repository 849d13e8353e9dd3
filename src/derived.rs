// Metrics that exist only relative to the current view: revenue per unit of
// combined resource use, equal-frequency ESG quartiles, and the fixed
// performance-tier breakpoints applied to region aggregates.
use crate::types::{PerformanceTier, Quartile, Record};
use crate::util::percentile;

/// Revenue per combined unit of carbon, water, and energy, scaled by 1e6.
/// Undefined when the record reports no resource use at all.
pub fn resource_efficiency(r: &Record) -> Option<f64> {
    let denom = r.carbon_emissions + r.water_usage + r.energy_consumption;
    if denom == 0.0 {
        return None;
    }
    Some(r.revenue / denom * 1_000_000.0)
}

/// Assign each record of `view` to an equal-frequency quartile of
/// `ESG_Overall`, in the same order as `view`. Boundaries are the 25th, 50th
/// and 75th percentiles of the view itself, so identical scores always land
/// in the same bucket and fewer than four distinct values leave some buckets
/// empty.
pub fn esg_quartiles(view: &[Record]) -> Vec<Quartile> {
    if view.is_empty() {
        return Vec::new();
    }
    let mut scores: Vec<f64> = view.iter().map(|r| r.esg_overall).collect();
    scores.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let q1 = percentile(&scores, 25.0);
    let q2 = percentile(&scores, 50.0);
    let q3 = percentile(&scores, 75.0);

    view.iter()
        .map(|r| {
            let v = r.esg_overall;
            if v <= q1 {
                Quartile::Q1
            } else if v <= q2 {
                Quartile::Q2
            } else if v <= q3 {
                Quartile::Q3
            } else {
                Quartile::Q4
            }
        })
        .collect()
}

/// Tier for a region aggregate's mean ESG score.
pub fn performance_tier(mean_esg: f64) -> PerformanceTier {
    if mean_esg <= 55.0 {
        PerformanceTier::Developing
    } else if mean_esg <= 65.0 {
        PerformanceTier::Improving
    } else {
        PerformanceTier::Leading
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::sample_record;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_resource_efficiency() {
        let r = sample_record("Company_1", 2020, 60.0);
        // 1000 / 350_000 * 1e6
        assert_abs_diff_eq!(resource_efficiency(&r).unwrap(), 2857.142857, epsilon = 1e-6);
    }

    #[test]
    fn test_zero_resource_use_is_undefined_not_infinite() {
        let mut r = sample_record("Company_1", 2020, 60.0);
        r.carbon_emissions = 0.0;
        r.water_usage = 0.0;
        r.energy_consumption = 0.0;
        assert_eq!(resource_efficiency(&r), None);
    }

    #[test]
    fn test_quartiles_split_evenly() {
        let view: Vec<_> = (1..=8)
            .map(|i| sample_record("Company_1", 2015 + i, i as f64 * 10.0))
            .collect();
        let buckets = esg_quartiles(&view);
        assert_eq!(
            buckets,
            vec![
                Quartile::Q1,
                Quartile::Q1,
                Quartile::Q2,
                Quartile::Q2,
                Quartile::Q3,
                Quartile::Q3,
                Quartile::Q4,
                Quartile::Q4,
            ]
        );
    }

    #[test]
    fn test_tied_scores_share_a_bucket() {
        let view = vec![
            sample_record("Company_1", 2020, 50.0),
            sample_record("Company_2", 2020, 50.0),
            sample_record("Company_3", 2020, 50.0),
            sample_record("Company_4", 2020, 80.0),
        ];
        let buckets = esg_quartiles(&view);
        assert_eq!(buckets[0], buckets[1]);
        assert_eq!(buckets[1], buckets[2]);
        assert_eq!(buckets[3], Quartile::Q4);
    }

    #[test]
    fn test_single_value_view_does_not_fault() {
        let view = vec![
            sample_record("Company_1", 2020, 62.0),
            sample_record("Company_2", 2020, 62.0),
        ];
        let buckets = esg_quartiles(&view);
        assert_eq!(buckets, vec![Quartile::Q1, Quartile::Q1]);
        assert!(esg_quartiles(&[]).is_empty());
    }

    #[test]
    fn test_performance_tier_breakpoints() {
        assert_eq!(performance_tier(40.0), PerformanceTier::Developing);
        assert_eq!(performance_tier(55.0), PerformanceTier::Developing);
        assert_eq!(performance_tier(55.1), PerformanceTier::Improving);
        assert_eq!(performance_tier(65.0), PerformanceTier::Improving);
        assert_eq!(performance_tier(65.1), PerformanceTier::Leading);
    }
}
