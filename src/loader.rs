use crate::datagen;
use crate::types::{RawRow, Record};
use crate::util::{parse_f64_safe, parse_i32_safe, parse_u32_safe};
use csv::ReaderBuilder;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors from reading the source CSV. Never user-facing: the loader
/// recovers by generating the sample dataset.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("csv read failed: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    File,
    Synthetic,
}

#[derive(Debug, Clone)]
pub struct LoadReport {
    pub source: Source,
    pub total_rows: usize,
    pub loaded_rows: usize,
    pub skipped_rows: usize,
}

/// Load the dataset from `path`, falling back to the deterministic sample
/// generator when the file is missing, unreadable, or yields no usable rows.
pub fn load(path: &str) -> (Vec<Record>, LoadReport) {
    match read_csv(path) {
        Ok((records, report)) if !records.is_empty() => {
            info!(
                path,
                rows = report.loaded_rows,
                skipped = report.skipped_rows,
                "loaded dataset from file"
            );
            (records, report)
        }
        Ok(_) => {
            warn!(path, "source file held no usable rows, generating sample data");
            synthetic()
        }
        Err(e) => {
            warn!(path, error = %e, "source unavailable, generating sample data");
            synthetic()
        }
    }
}

fn synthetic() -> (Vec<Record>, LoadReport) {
    let records = datagen::generate();
    let n = records.len();
    let report = LoadReport {
        source: Source::Synthetic,
        total_rows: n,
        loaded_rows: n,
        skipped_rows: 0,
    };
    (records, report)
}

pub fn read_csv(path: &str) -> Result<(Vec<Record>, LoadReport), LoadError> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_path(path)?;
    let mut total_rows = 0usize;
    let mut skipped_rows = 0usize;
    let mut records: Vec<Record> = Vec::new();

    for result in rdr.deserialize::<RawRow>() {
        total_rows += 1;
        let row = match result {
            Ok(r) => r,
            Err(e) => {
                debug!(row = total_rows, error = %e, "skipping malformed row");
                skipped_rows += 1;
                continue;
            }
        };
        match clean(row) {
            Some(rec) => records.push(rec),
            None => skipped_rows += 1,
        }
    }

    let report = LoadReport {
        source: Source::File,
        total_rows,
        loaded_rows: records.len(),
        skipped_rows,
    };
    Ok((records, report))
}

// Identity and numeric fields must parse; the categorical labels get an
// "Unknown" default like any other dirty-data column.
fn clean(row: RawRow) -> Option<Record> {
    let company_id = parse_u32_safe(row.company_id.as_deref())?;
    let company_name = row.company_name.map(|s| s.trim().to_string())?;
    if company_name.is_empty() {
        return None;
    }
    let year = parse_i32_safe(row.year.as_deref())?;

    let industry = row
        .industry
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "Unknown".to_string());
    let region = row
        .region
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "Unknown".to_string());

    Some(Record {
        company_id,
        company_name,
        industry,
        region,
        year,
        revenue: parse_f64_safe(row.revenue.as_deref())?,
        profit_margin: parse_f64_safe(row.profit_margin.as_deref())?,
        market_cap: parse_f64_safe(row.market_cap.as_deref())?,
        growth_rate: parse_f64_safe(row.growth_rate.as_deref())?,
        esg_overall: parse_f64_safe(row.esg_overall.as_deref())?,
        esg_environmental: parse_f64_safe(row.esg_environmental.as_deref())?,
        esg_social: parse_f64_safe(row.esg_social.as_deref())?,
        esg_governance: parse_f64_safe(row.esg_governance.as_deref())?,
        carbon_emissions: parse_f64_safe(row.carbon_emissions.as_deref())?,
        water_usage: parse_f64_safe(row.water_usage.as_deref())?,
        energy_consumption: parse_f64_safe(row.energy_consumption.as_deref())?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        let mut p = std::env::temp_dir();
        p.push(format!("esg_report_test_{}_{}", std::process::id(), name));
        p
    }

    #[test]
    fn test_missing_file_falls_back_to_sample_data() {
        let (records, report) = load("definitely_not_here.csv");
        assert_eq!(report.source, Source::Synthetic);
        assert_eq!(records.len(), 550);
        assert_eq!(records, datagen::generate());
    }

    #[test]
    fn test_export_then_load_round_trips() {
        let original = datagen::generate();
        let path = temp_path("roundtrip.csv");
        output::write_csv(path.to_str().unwrap(), &original).unwrap();

        let (reloaded, report) = read_csv(path.to_str().unwrap()).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(report.source, Source::File);
        assert_eq!(report.skipped_rows, 0);
        assert_eq!(reloaded.len(), original.len());
        for (a, b) in original.iter().zip(&reloaded) {
            assert_eq!(a.company_id, b.company_id);
            assert_eq!(a.company_name, b.company_name);
            assert_eq!(a.industry, b.industry);
            assert_eq!(a.region, b.region);
            assert_eq!(a.year, b.year);
            // f64 fields are written with full precision, so they re-parse
            // to the identical bit pattern.
            assert_eq!(a.revenue, b.revenue);
            assert_eq!(a.esg_overall, b.esg_overall);
            assert_eq!(a.energy_consumption, b.energy_consumption);
        }
    }

    #[test]
    fn test_bad_rows_are_skipped_not_fatal() {
        let path = temp_path("dirty.csv");
        let csv = "\
CompanyID,CompanyName,Industry,Region,Year,Revenue,ProfitMargin,MarketCap,GrowthRate,ESG_Overall,ESG_Environmental,ESG_Social,ESG_Governance,CarbonEmissions,WaterUsage,EnergyConsumption
1,Company_1,Retail,Asia,2020,1000,5,2000,3,60,55,65,70,100000,50000,200000
oops,Company_2,Retail,Asia,2020,1000,5,2000,3,60,55,65,70,100000,50000,200000
2,Company_2,Retail,Asia,2020,not-a-number,5,2000,3,60,55,65,70,100000,50000,200000
3,Company_3,,,2021,2500,7,9000,1,50,45,55,60,120000,60000,250000
";
        std::fs::write(&path, csv).unwrap();
        let (records, report) = read_csv(path.to_str().unwrap()).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(report.total_rows, 4);
        assert_eq!(report.loaded_rows, 2);
        assert_eq!(report.skipped_rows, 2);
        assert_eq!(records[0].company_id, 1);
        // Blank categorical labels default instead of dropping the row.
        assert_eq!(records[1].industry, "Unknown");
        assert_eq!(records[1].region, "Unknown");
    }
}
