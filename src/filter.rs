// Filter engine: one conjunction of range and set-membership predicates
// turns the canonical dataset into the active view. Pure; the dataset is
// never mutated and the view is rebuilt from scratch on every change.
use std::collections::HashSet;

use crate::types::Record;

#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    pub year_min: i32,
    pub year_max: i32,
    pub industries: HashSet<String>,
    pub regions: HashSet<String>,
    pub min_esg_overall: f64,
    pub min_revenue: f64,
    pub max_carbon_emissions: f64,
    pub max_energy_consumption: f64,
    pub min_growth_rate: f64,
}

impl FilterSpec {
    /// The default spec: spans the dataset's full year range, every industry
    /// and region it mentions, and bounds wide enough to keep every record.
    pub fn covering(dataset: &[Record]) -> FilterSpec {
        let mut spec = FilterSpec {
            year_min: i32::MAX,
            year_max: i32::MIN,
            industries: HashSet::new(),
            regions: HashSet::new(),
            min_esg_overall: f64::INFINITY,
            min_revenue: f64::INFINITY,
            max_carbon_emissions: f64::NEG_INFINITY,
            max_energy_consumption: f64::NEG_INFINITY,
            min_growth_rate: f64::INFINITY,
        };
        for r in dataset {
            spec.year_min = spec.year_min.min(r.year);
            spec.year_max = spec.year_max.max(r.year);
            if !spec.industries.contains(&r.industry) {
                spec.industries.insert(r.industry.clone());
            }
            if !spec.regions.contains(&r.region) {
                spec.regions.insert(r.region.clone());
            }
            spec.min_esg_overall = spec.min_esg_overall.min(r.esg_overall);
            spec.min_revenue = spec.min_revenue.min(r.revenue);
            spec.max_carbon_emissions = spec.max_carbon_emissions.max(r.carbon_emissions);
            spec.max_energy_consumption = spec.max_energy_consumption.max(r.energy_consumption);
            spec.min_growth_rate = spec.min_growth_rate.min(r.growth_rate);
        }
        if dataset.is_empty() {
            // Degenerate bounds; the empty sets already make every view empty.
            spec.year_min = 0;
            spec.year_max = 0;
            spec.min_esg_overall = 0.0;
            spec.min_revenue = 0.0;
            spec.max_carbon_emissions = 0.0;
            spec.max_energy_consumption = 0.0;
            spec.min_growth_rate = 0.0;
        }
        spec
    }

    pub fn matches(&self, r: &Record) -> bool {
        r.year >= self.year_min
            && r.year <= self.year_max
            && self.industries.contains(&r.industry)
            && self.regions.contains(&r.region)
            && r.esg_overall >= self.min_esg_overall
            && r.revenue >= self.min_revenue
            && r.carbon_emissions <= self.max_carbon_emissions
            && r.energy_consumption <= self.max_energy_consumption
            && r.growth_rate >= self.min_growth_rate
    }
}

/// Apply every predicate of `spec` to `dataset`. An inverted year range or an
/// empty industry/region set simply yields an empty view.
pub fn apply_filters(dataset: &[Record], spec: &FilterSpec) -> Vec<Record> {
    dataset.iter().filter(|r| spec.matches(r)).cloned().collect()
}
