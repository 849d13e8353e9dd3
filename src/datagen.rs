// Deterministic sample dataset used when the source CSV is unavailable.
//
// Generates company-year records with a seeded RNG so every run (and every
// test) sees the identical table. Industry and region are drawn once per
// company and held fixed across its years.
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::types::Record;

pub const SEED: u64 = 42;
pub const COMPANIES: u32 = 50;
pub const YEAR_MIN: i32 = 2015;
pub const YEAR_MAX: i32 = 2025;

pub const INDUSTRIES: &[&str] = &["Retail", "Technology", "Healthcare", "Finance", "Energy"];
pub const REGIONS: &[&str] = &["North America", "Europe", "Asia", "Latin America"];

fn pick<'a>(rng: &mut StdRng, list: &'a [&str]) -> &'a str {
    list[rng.gen_range(0..list.len())]
}

/// Generate the sample dataset with the default seed.
pub fn generate() -> Vec<Record> {
    generate_seeded(SEED)
}

pub fn generate_seeded(seed: u64) -> Vec<Record> {
    let mut rng = StdRng::seed_from_u64(seed);
    let years = YEAR_MIN..=YEAR_MAX;
    let mut records = Vec::with_capacity(COMPANIES as usize * years.clone().count());

    for id in 1..=COMPANIES {
        let industry = pick(&mut rng, INDUSTRIES).to_string();
        let region = pick(&mut rng, REGIONS).to_string();
        for year in years.clone() {
            records.push(Record {
                company_id: id,
                company_name: format!("Company_{}", id),
                industry: industry.clone(),
                region: region.clone(),
                year,
                revenue: rng.gen_range(100.0..5000.0),
                profit_margin: rng.gen_range(-5.0..15.0),
                market_cap: rng.gen_range(100.0..20000.0),
                growth_rate: rng.gen_range(-20.0..30.0),
                esg_overall: rng.gen_range(40.0..80.0),
                esg_environmental: rng.gen_range(30.0..80.0),
                esg_social: rng.gen_range(20.0..90.0),
                esg_governance: rng.gen_range(30.0..85.0),
                carbon_emissions: rng.gen_range(10000.0..300000.0),
                water_usage: rng.gen_range(5000.0..150000.0),
                energy_consumption: rng.gen_range(20000.0..600000.0),
            });
        }
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_generation_is_reproducible() {
        assert_eq!(generate_seeded(7), generate_seeded(7));
        assert_eq!(generate(), generate());
    }

    #[test]
    fn test_shape_and_roster() {
        let data = generate();
        assert_eq!(data.len(), 50 * 11);
        assert!(data.iter().all(|r| (YEAR_MIN..=YEAR_MAX).contains(&r.year)));
        assert!(data
            .iter()
            .all(|r| r.company_name == format!("Company_{}", r.company_id)));
    }

    #[test]
    fn test_metric_ranges() {
        for r in generate() {
            assert!((100.0..5000.0).contains(&r.revenue));
            assert!((-5.0..15.0).contains(&r.profit_margin));
            assert!((40.0..80.0).contains(&r.esg_overall));
            assert!((10000.0..300000.0).contains(&r.carbon_emissions));
            assert!((5000.0..150000.0).contains(&r.water_usage));
            assert!((20000.0..600000.0).contains(&r.energy_consumption));
            assert!(INDUSTRIES.contains(&r.industry.as_str()));
            assert!(REGIONS.contains(&r.region.as_str()));
        }
    }

    #[test]
    fn test_industry_and_region_fixed_per_company() {
        let mut seen: HashMap<u32, (String, String)> = HashMap::new();
        for r in generate() {
            let entry = seen
                .entry(r.company_id)
                .or_insert_with(|| (r.industry.clone(), r.region.clone()));
            assert_eq!(entry.0, r.industry);
            assert_eq!(entry.1, r.region);
        }
        assert_eq!(seen.len(), 50);
    }
}
