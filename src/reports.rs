// Grouped reductions over the active view. Every function here is pure,
// tolerates an empty view, and orders its output deterministically: rollups
// by group key, rankings by value with ties broken by first-seen input order.
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::derived;
use crate::types::{
    DistributionRow, EfficiencyEntry, EsgDimension, IndustryRollup, LeaderboardEntry,
    OverviewStats, QuartileCrossTab, QuartileSlice, Quartile, Record, RegionRollup,
    YearIndustryEsg, YearlyEsgRow, YearlyResourceRow, YoyPoint,
};
use crate::util::{average, percentile, std_dev};

pub const LEADERBOARD_TOP_K: usize = 10;

/// Rank companies by their mean score in one ESG dimension, best first.
/// Ties keep the order in which the companies first appear in the view.
pub fn esg_leaderboard(
    view: &[Record],
    dimension: EsgDimension,
    top_k: usize,
) -> Vec<LeaderboardEntry> {
    struct Acc {
        first_seen: usize,
        industry: String,
        scores: Vec<f64>,
        revenues: Vec<f64>,
    }
    let mut map: HashMap<String, Acc> = HashMap::new();
    for r in view {
        let next = map.len();
        let e = map.entry(r.company_name.clone()).or_insert_with(|| Acc {
            first_seen: next,
            industry: r.industry.clone(),
            scores: vec![],
            revenues: vec![],
        });
        e.scores.push(dimension.score(r));
        e.revenues.push(r.revenue);
    }

    let mut ranked: Vec<(f64, usize, String, String, f64)> = map
        .into_iter()
        .map(|(name, acc)| {
            (
                average(&acc.scores),
                acc.first_seen,
                name,
                acc.industry,
                average(&acc.revenues),
            )
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap_or(Ordering::Equal)
            .then(a.1.cmp(&b.1))
    });

    ranked
        .into_iter()
        .take(top_k)
        .enumerate()
        .map(|(idx, (score, _, company_name, industry, avg_revenue))| LeaderboardEntry {
            rank: idx + 1,
            company_name,
            score,
            industry,
            avg_revenue,
        })
        .collect()
}

pub fn region_rollups(view: &[Record]) -> Vec<RegionRollup> {
    #[derive(Default)]
    struct Acc {
        esg: Vec<f64>,
        env: Vec<f64>,
        soc: Vec<f64>,
        gov: Vec<f64>,
        revenue: Vec<f64>,
        carbon: Vec<f64>,
        water: Vec<f64>,
        energy: Vec<f64>,
        companies: HashSet<u32>,
    }
    let mut map: HashMap<String, Acc> = HashMap::new();
    for r in view {
        let e = map.entry(r.region.clone()).or_default();
        e.esg.push(r.esg_overall);
        e.env.push(r.esg_environmental);
        e.soc.push(r.esg_social);
        e.gov.push(r.esg_governance);
        e.revenue.push(r.revenue);
        e.carbon.push(r.carbon_emissions);
        e.water.push(r.water_usage);
        e.energy.push(r.energy_consumption);
        e.companies.insert(r.company_id);
    }

    let mut rows: Vec<RegionRollup> = map
        .into_iter()
        .map(|(region, acc)| {
            let avg_esg_overall = average(&acc.esg);
            RegionRollup {
                region,
                avg_esg_overall,
                avg_environmental: average(&acc.env),
                avg_social: average(&acc.soc),
                avg_governance: average(&acc.gov),
                avg_revenue: average(&acc.revenue),
                avg_carbon: average(&acc.carbon),
                avg_water: average(&acc.water),
                avg_energy: average(&acc.energy),
                companies: acc.companies.len(),
                tier: derived::performance_tier(avg_esg_overall),
            }
        })
        .collect();
    rows.sort_by(|a, b| a.region.cmp(&b.region));
    rows
}

pub fn industry_rollups(view: &[Record]) -> Vec<IndustryRollup> {
    #[derive(Default)]
    struct Acc {
        esg: Vec<f64>,
        revenue: Vec<f64>,
        carbon: Vec<f64>,
        water: Vec<f64>,
        energy: Vec<f64>,
        growth: Vec<f64>,
        companies: HashSet<u32>,
    }
    let mut map: HashMap<String, Acc> = HashMap::new();
    for r in view {
        let e = map.entry(r.industry.clone()).or_default();
        e.esg.push(r.esg_overall);
        e.revenue.push(r.revenue);
        e.carbon.push(r.carbon_emissions);
        e.water.push(r.water_usage);
        e.energy.push(r.energy_consumption);
        e.growth.push(r.growth_rate);
        e.companies.insert(r.company_id);
    }

    let mut rows: Vec<IndustryRollup> = map
        .into_iter()
        .map(|(industry, acc)| IndustryRollup {
            industry,
            avg_esg: average(&acc.esg),
            std_esg: std_dev(&acc.esg),
            avg_revenue: average(&acc.revenue),
            total_revenue: acc.revenue.iter().sum(),
            avg_carbon: average(&acc.carbon),
            avg_water: average(&acc.water),
            avg_energy: average(&acc.energy),
            avg_growth: average(&acc.growth),
            companies: acc.companies.len(),
        })
        .collect();
    rows.sort_by(|a, b| a.industry.cmp(&b.industry));
    rows
}

/// Mean financial metrics per ESG quartile of the view, plus the Q4-Q1
/// spread for each metric. Buckets left empty by ties or tiny views report
/// no averages, and a spread exists only when both end buckets do.
pub fn quartile_crosstab(view: &[Record]) -> QuartileCrossTab {
    let buckets = derived::esg_quartiles(view);
    let mut by_bucket: HashMap<Quartile, (Vec<f64>, Vec<f64>, Vec<f64>)> = HashMap::new();
    for (r, q) in view.iter().zip(buckets.iter()) {
        let e = by_bucket.entry(*q).or_default();
        e.0.push(r.profit_margin);
        e.1.push(r.growth_rate);
        e.2.push(r.market_cap);
    }

    let slices: Vec<QuartileSlice> = Quartile::ALL
        .iter()
        .map(|q| match by_bucket.get(q) {
            Some((margins, growths, caps)) => QuartileSlice {
                quartile: *q,
                records: margins.len(),
                avg_profit_margin: Some(average(margins)),
                avg_growth_rate: Some(average(growths)),
                avg_market_cap: Some(average(caps)),
            },
            None => QuartileSlice {
                quartile: *q,
                records: 0,
                avg_profit_margin: None,
                avg_growth_rate: None,
                avg_market_cap: None,
            },
        })
        .collect();

    let spread = |top: Option<f64>, bottom: Option<f64>| match (top, bottom) {
        (Some(t), Some(b)) => Some(t - b),
        _ => None,
    };
    QuartileCrossTab {
        profit_margin_spread: spread(slices[3].avg_profit_margin, slices[0].avg_profit_margin),
        growth_rate_spread: spread(slices[3].avg_growth_rate, slices[0].avg_growth_rate),
        market_cap_spread: spread(slices[3].avg_market_cap, slices[0].avg_market_cap),
        slices,
    }
}

/// Yearly means of `metric` in ascending year order with year-over-year
/// deltas. The first year reports no delta at all, and the percent delta is
/// also missing when the previous mean was zero.
pub fn yoy_series<F>(view: &[Record], metric: F) -> Vec<YoyPoint>
where
    F: Fn(&Record) -> f64,
{
    let mut by_year: HashMap<i32, Vec<f64>> = HashMap::new();
    for r in view {
        by_year.entry(r.year).or_default().push(metric(r));
    }
    let mut years: Vec<i32> = by_year.keys().copied().collect();
    years.sort_unstable();

    let mut points = Vec::with_capacity(years.len());
    let mut prev: Option<f64> = None;
    for year in years {
        let mean = average(&by_year[&year]);
        let (pct_change, point_change) = match prev {
            None => (None, None),
            Some(p) => {
                let pct = if p == 0.0 {
                    None
                } else {
                    Some((mean - p) / p * 100.0)
                };
                (pct, Some(mean - p))
            }
        };
        points.push(YoyPoint {
            year,
            mean,
            pct_change,
            point_change,
        });
        prev = Some(mean);
    }
    points
}

/// Industries ranked by mean resource efficiency, best first. Records with
/// undefined efficiency are left out of their industry's mean; an industry
/// with only undefined records ranks last with no value.
pub fn efficiency_ranking(view: &[Record]) -> Vec<EfficiencyEntry> {
    let mut map: HashMap<String, Vec<f64>> = HashMap::new();
    for r in view {
        let e = map.entry(r.industry.clone()).or_default();
        if let Some(eff) = derived::resource_efficiency(r) {
            e.push(eff);
        }
    }

    let mut rows: Vec<EfficiencyEntry> = map
        .into_iter()
        .map(|(industry, values)| EfficiencyEntry {
            avg_efficiency: if values.is_empty() {
                None
            } else {
                Some(average(&values))
            },
            industry,
        })
        .collect();
    rows.sort_by(|a, b| match (a.avg_efficiency, b.avg_efficiency) {
        (Some(x), Some(y)) => y
            .partial_cmp(&x)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.industry.cmp(&b.industry)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.industry.cmp(&b.industry),
    });
    rows
}

pub fn overview(view: &[Record]) -> Option<OverviewStats> {
    if view.is_empty() {
        return None;
    }
    let companies: HashSet<u32> = view.iter().map(|r| r.company_id).collect();
    let esg: Vec<f64> = view.iter().map(|r| r.esg_overall).collect();
    let revenue: Vec<f64> = view.iter().map(|r| r.revenue).collect();
    let growth: Vec<f64> = view.iter().map(|r| r.growth_rate).collect();
    let carbon: Vec<f64> = view.iter().map(|r| r.carbon_emissions).collect();
    let positive_growth = view.iter().filter(|r| r.growth_rate > 0.0).count();

    Some(OverviewStats {
        companies: companies.len(),
        records: view.len(),
        avg_esg: average(&esg),
        avg_revenue: average(&revenue),
        avg_growth: average(&growth),
        avg_carbon: average(&carbon),
        positive_growth,
        positive_growth_pct: positive_growth as f64 / view.len() as f64 * 100.0,
    })
}

pub fn yearly_esg_series(view: &[Record]) -> Vec<YearlyEsgRow> {
    #[derive(Default)]
    struct Acc {
        overall: Vec<f64>,
        env: Vec<f64>,
        soc: Vec<f64>,
        gov: Vec<f64>,
    }
    let mut map: HashMap<i32, Acc> = HashMap::new();
    for r in view {
        let e = map.entry(r.year).or_default();
        e.overall.push(r.esg_overall);
        e.env.push(r.esg_environmental);
        e.soc.push(r.esg_social);
        e.gov.push(r.esg_governance);
    }
    let mut rows: Vec<YearlyEsgRow> = map
        .into_iter()
        .map(|(year, acc)| YearlyEsgRow {
            year,
            overall: average(&acc.overall),
            environmental: average(&acc.env),
            social: average(&acc.soc),
            governance: average(&acc.gov),
        })
        .collect();
    rows.sort_by_key(|r| r.year);
    rows
}

pub fn yearly_resource_series(view: &[Record]) -> Vec<YearlyResourceRow> {
    let mut map: HashMap<i32, (Vec<f64>, Vec<f64>)> = HashMap::new();
    for r in view {
        let e = map.entry(r.year).or_default();
        e.0.push(r.carbon_emissions);
        e.1.push(r.energy_consumption);
    }
    let mut rows: Vec<YearlyResourceRow> = map
        .into_iter()
        .map(|(year, (carbon, energy))| YearlyResourceRow {
            year,
            avg_carbon: average(&carbon),
            std_carbon: std_dev(&carbon),
            avg_energy: average(&energy),
        })
        .collect();
    rows.sort_by_key(|r| r.year);
    rows
}

pub fn esg_by_year_industry(view: &[Record]) -> Vec<YearIndustryEsg> {
    let mut map: HashMap<(i32, String), Vec<f64>> = HashMap::new();
    for r in view {
        map.entry((r.year, r.industry.clone()))
            .or_default()
            .push(r.esg_overall);
    }
    let mut rows: Vec<YearIndustryEsg> = map
        .into_iter()
        .map(|((year, industry), scores)| YearIndustryEsg {
            year,
            industry,
            avg_esg: average(&scores),
        })
        .collect();
    rows.sort_by(|a, b| a.year.cmp(&b.year).then_with(|| a.industry.cmp(&b.industry)));
    rows
}

/// Five-number summary plus mean and std for each ESG dimension of the view.
pub fn score_distribution(view: &[Record]) -> Vec<DistributionRow> {
    if view.is_empty() {
        return Vec::new();
    }
    EsgDimension::ALL
        .iter()
        .map(|dim| {
            let mut scores: Vec<f64> = view.iter().map(|r| dim.score(r)).collect();
            scores.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
            DistributionRow {
                dimension: *dim,
                min: scores[0],
                q1: percentile(&scores, 25.0),
                median: percentile(&scores, 50.0),
                q3: percentile(&scores, 75.0),
                max: scores[scores.len() - 1],
                mean: average(&scores),
                std: std_dev(&scores),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::sample_record;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_leaderboard_ranks_and_tie_policy() {
        let mut a = sample_record("Company_1", 2020, 80.0);
        a.company_name = "A".to_string();
        let mut b = sample_record("Company_2", 2020, 90.0);
        b.company_name = "B".to_string();
        let mut c = sample_record("Company_3", 2020, 80.0);
        c.company_name = "C".to_string();

        let board = esg_leaderboard(&[a, b, c], EsgDimension::Overall, 10);
        let order: Vec<(&str, usize)> = board
            .iter()
            .map(|e| (e.company_name.as_str(), e.rank))
            .collect();
        assert_eq!(order, vec![("B", 1), ("A", 2), ("C", 3)]);
        assert_abs_diff_eq!(board[0].score, 90.0);
    }

    #[test]
    fn test_leaderboard_averages_across_years_and_truncates() {
        let mut view = Vec::new();
        for i in 1..=12u32 {
            let name = format!("Company_{}", i);
            view.push(sample_record(&name, 2020, 40.0 + i as f64));
            view.push(sample_record(&name, 2021, 60.0 + i as f64));
        }
        let board = esg_leaderboard(&view, EsgDimension::Overall, LEADERBOARD_TOP_K);
        assert_eq!(board.len(), 10);
        assert_eq!(board[0].company_name, "Company_12");
        // Mean of the two years, not either single year.
        assert_abs_diff_eq!(board[0].score, 62.0);
        assert_eq!(board[9].rank, 10);
    }

    #[test]
    fn test_region_rollup_counts_and_tier() {
        let mut view = vec![
            sample_record("Company_1", 2020, 70.0),
            sample_record("Company_2", 2021, 74.0),
            sample_record("Company_3", 2020, 50.0),
        ];
        view[2].region = "Asia".to_string();

        let rows = region_rollups(&view);
        assert_eq!(rows.len(), 2);
        // Sorted by region name.
        assert_eq!(rows[0].region, "Asia");
        assert_eq!(rows[0].companies, 1);
        assert_eq!(rows[0].tier, crate::types::PerformanceTier::Developing);
        assert_eq!(rows[1].region, "Europe");
        assert_eq!(rows[1].companies, 2);
        assert_abs_diff_eq!(rows[1].avg_esg_overall, 72.0);
        assert_eq!(rows[1].tier, crate::types::PerformanceTier::Leading);
    }

    #[test]
    fn test_industry_rollup_sum_and_std() {
        let mut view = vec![
            sample_record("Company_1", 2020, 60.0),
            sample_record("Company_2", 2020, 70.0),
        ];
        view[0].revenue = 1000.0;
        view[1].revenue = 3000.0;

        let rows = industry_rollups(&view);
        assert_eq!(rows.len(), 1);
        assert_abs_diff_eq!(rows[0].total_revenue, 4000.0);
        assert_abs_diff_eq!(rows[0].avg_revenue, 2000.0);
        assert_abs_diff_eq!(rows[0].std_esg.unwrap(), (50.0f64).sqrt(), epsilon = 1e-9);
        assert_eq!(rows[0].companies, 2);
    }

    #[test]
    fn test_quartile_spread_matches_direct_subset_means() {
        let mut view = Vec::new();
        for i in 1..=8u32 {
            let mut r = sample_record(&format!("Company_{}", i), 2020, i as f64 * 10.0);
            r.profit_margin = i as f64 * 1.5;
            view.push(r);
        }
        let tab = quartile_crosstab(&view);

        // Two records per bucket; bottom = scores 10,20 and top = 70,80.
        let direct_low = (1.5 + 3.0) / 2.0;
        let direct_high = (10.5 + 12.0) / 2.0;
        assert_eq!(tab.slices.iter().map(|s| s.records).sum::<usize>(), 8);
        assert_abs_diff_eq!(
            tab.profit_margin_spread.unwrap(),
            direct_high - direct_low,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_quartile_crosstab_with_sparse_view() {
        let view = vec![
            sample_record("Company_1", 2020, 60.0),
            sample_record("Company_2", 2020, 60.0),
        ];
        let tab = quartile_crosstab(&view);
        // Every score ties into the bottom bucket; upper buckets are empty
        // and the spreads are undefined rather than zero.
        assert_eq!(tab.slices[0].records, 2);
        assert_eq!(tab.slices[3].records, 0);
        assert_eq!(tab.slices[3].avg_profit_margin, None);
        assert_eq!(tab.profit_margin_spread, None);
    }

    #[test]
    fn test_yoy_first_year_is_undefined() {
        let view = vec![
            sample_record("Company_1", 2015, 50.0),
            sample_record("Company_1", 2016, 55.0),
            sample_record("Company_1", 2017, 60.5),
        ];
        let series = yoy_series(&view, |r| r.esg_overall);
        assert_eq!(series.len(), 3);
        assert_eq!(series[0].pct_change, None);
        assert_eq!(series[0].point_change, None);
        assert_abs_diff_eq!(series[1].pct_change.unwrap(), 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(series[2].pct_change.unwrap(), 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(series[1].point_change.unwrap(), 5.0, epsilon = 1e-9);
        assert_abs_diff_eq!(series[2].point_change.unwrap(), 5.5, epsilon = 1e-9);
    }

    #[test]
    fn test_yoy_zero_baseline_has_no_percent_delta() {
        let mut a = sample_record("Company_1", 2015, 60.0);
        a.revenue = 0.0;
        let mut b = sample_record("Company_1", 2016, 60.0);
        b.revenue = 500.0;

        let series = yoy_series(&[a, b], |r| r.revenue);
        assert_eq!(series[1].pct_change, None);
        assert_abs_diff_eq!(series[1].point_change.unwrap(), 500.0);
    }

    #[test]
    fn test_efficiency_ranking_descending_with_undefined_last() {
        let mut fin = sample_record("Company_1", 2020, 60.0);
        fin.industry = "Finance".to_string();
        fin.revenue = 3500.0;
        let mut retail = sample_record("Company_2", 2020, 60.0);
        retail.industry = "Retail".to_string();
        retail.revenue = 700.0;
        let mut ghost = sample_record("Company_3", 2020, 60.0);
        ghost.industry = "Energy".to_string();
        ghost.carbon_emissions = 0.0;
        ghost.water_usage = 0.0;
        ghost.energy_consumption = 0.0;

        let rows = efficiency_ranking(&[fin, retail, ghost]);
        assert_eq!(rows[0].industry, "Finance");
        assert_eq!(rows[1].industry, "Retail");
        assert_eq!(rows[2].industry, "Energy");
        assert_eq!(rows[2].avg_efficiency, None);
        assert!(rows[0].avg_efficiency.unwrap() > rows[1].avg_efficiency.unwrap());
    }

    #[test]
    fn test_overview_counts() {
        let view = vec![
            sample_record("Company_1", 2020, 60.0),
            sample_record("Company_1", 2021, 62.0),
            sample_record("Company_2", 2020, 58.0),
        ];
        let stats = overview(&view).unwrap();
        assert_eq!(stats.companies, 2);
        assert_eq!(stats.records, 3);
        assert_abs_diff_eq!(stats.avg_esg, 60.0);
        assert_eq!(stats.positive_growth, 3);
        assert_abs_diff_eq!(stats.positive_growth_pct, 100.0);
    }

    #[test]
    fn test_empty_view_reports_no_data_everywhere() {
        let empty: Vec<Record> = Vec::new();
        assert!(esg_leaderboard(&empty, EsgDimension::Overall, 10).is_empty());
        assert!(region_rollups(&empty).is_empty());
        assert!(industry_rollups(&empty).is_empty());
        assert!(yoy_series(&empty, |r| r.revenue).is_empty());
        assert!(efficiency_ranking(&empty).is_empty());
        assert!(yearly_esg_series(&empty).is_empty());
        assert!(yearly_resource_series(&empty).is_empty());
        assert!(esg_by_year_industry(&empty).is_empty());
        assert!(score_distribution(&empty).is_empty());
        assert_eq!(overview(&empty), None);
        let tab = quartile_crosstab(&empty);
        assert!(tab.slices.iter().all(|s| s.records == 0));
        assert_eq!(tab.profit_margin_spread, None);
    }

    #[test]
    fn test_rollups_are_order_invariant() {
        // Integer-valued metrics so the group sums are exact in f64 and the
        // comparison is meaningful under any summation order.
        let mut view = Vec::new();
        for i in 1..=6u32 {
            let mut r = sample_record(
                &format!("Company_{}", i),
                2019 + (i % 3) as i32,
                50.0 + i as f64,
            );
            if i % 2 == 0 {
                r.region = "Asia".to_string();
                r.industry = "Retail".to_string();
            }
            r.revenue = 100.0 * i as f64;
            view.push(r);
        }
        let mut reversed = view.clone();
        reversed.reverse();

        assert_eq!(region_rollups(&view), region_rollups(&reversed));
        assert_eq!(industry_rollups(&view), industry_rollups(&reversed));
        assert_eq!(yearly_esg_series(&view), yearly_esg_series(&reversed));
    }

    #[test]
    fn test_year_industry_series_is_sorted() {
        let data = crate::datagen::generate();
        let rows = esg_by_year_industry(&data);
        assert!(rows
            .windows(2)
            .all(|w| (w[0].year, &w[0].industry) < (w[1].year, &w[1].industry)));
    }
}
