use serde::{Deserialize, Serialize};
use std::fmt;
use tabled::Tabled;

use crate::util::{fmt_num, fmt_opt};

#[derive(Debug, Deserialize)]
pub struct RawRow {
    #[serde(rename = "CompanyID")]
    pub company_id: Option<String>,
    #[serde(rename = "CompanyName")]
    pub company_name: Option<String>,
    #[serde(rename = "Industry")]
    pub industry: Option<String>,
    #[serde(rename = "Region")]
    pub region: Option<String>,
    #[serde(rename = "Year")]
    pub year: Option<String>,
    #[serde(rename = "Revenue")]
    pub revenue: Option<String>,
    #[serde(rename = "ProfitMargin")]
    pub profit_margin: Option<String>,
    #[serde(rename = "MarketCap")]
    pub market_cap: Option<String>,
    #[serde(rename = "GrowthRate")]
    pub growth_rate: Option<String>,
    #[serde(rename = "ESG_Overall")]
    pub esg_overall: Option<String>,
    #[serde(rename = "ESG_Environmental")]
    pub esg_environmental: Option<String>,
    #[serde(rename = "ESG_Social")]
    pub esg_social: Option<String>,
    #[serde(rename = "ESG_Governance")]
    pub esg_governance: Option<String>,
    #[serde(rename = "CarbonEmissions")]
    pub carbon_emissions: Option<String>,
    #[serde(rename = "WaterUsage")]
    pub water_usage: Option<String>,
    #[serde(rename = "EnergyConsumption")]
    pub energy_consumption: Option<String>,
}

// One company-year observation. ESG scores live in [0,100] for valid input
// but that is not enforced here; external data may move a company between
// industries or regions across years and grouping must tolerate it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    #[serde(rename = "CompanyID")]
    pub company_id: u32,
    #[serde(rename = "CompanyName")]
    pub company_name: String,
    #[serde(rename = "Industry")]
    pub industry: String,
    #[serde(rename = "Region")]
    pub region: String,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Revenue")]
    pub revenue: f64,
    #[serde(rename = "ProfitMargin")]
    pub profit_margin: f64,
    #[serde(rename = "MarketCap")]
    pub market_cap: f64,
    #[serde(rename = "GrowthRate")]
    pub growth_rate: f64,
    #[serde(rename = "ESG_Overall")]
    pub esg_overall: f64,
    #[serde(rename = "ESG_Environmental")]
    pub esg_environmental: f64,
    #[serde(rename = "ESG_Social")]
    pub esg_social: f64,
    #[serde(rename = "ESG_Governance")]
    pub esg_governance: f64,
    #[serde(rename = "CarbonEmissions")]
    pub carbon_emissions: f64,
    #[serde(rename = "WaterUsage")]
    pub water_usage: f64,
    #[serde(rename = "EnergyConsumption")]
    pub energy_consumption: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EsgDimension {
    Overall,
    Environmental,
    Social,
    Governance,
}

impl EsgDimension {
    pub const ALL: [EsgDimension; 4] = [
        EsgDimension::Overall,
        EsgDimension::Environmental,
        EsgDimension::Social,
        EsgDimension::Governance,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            EsgDimension::Overall => "Overall",
            EsgDimension::Environmental => "Environmental",
            EsgDimension::Social => "Social",
            EsgDimension::Governance => "Governance",
        }
    }

    pub fn score(&self, r: &Record) -> f64 {
        match self {
            EsgDimension::Overall => r.esg_overall,
            EsgDimension::Environmental => r.esg_environmental,
            EsgDimension::Social => r.esg_social,
            EsgDimension::Governance => r.esg_governance,
        }
    }
}

impl fmt::Display for EsgDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// Equal-frequency bucket of ESG_Overall within the current view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Quartile {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quartile {
    pub const ALL: [Quartile; 4] = [Quartile::Q1, Quartile::Q2, Quartile::Q3, Quartile::Q4];

    pub fn label(&self) -> &'static str {
        match self {
            Quartile::Q1 => "Q1 (Lowest)",
            Quartile::Q2 => "Q2",
            Quartile::Q3 => "Q3",
            Quartile::Q4 => "Q4 (Highest)",
        }
    }
}

impl fmt::Display for Quartile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// Qualitative label for a region's mean ESG score, fixed breakpoints 55/65.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PerformanceTier {
    Developing,
    Improving,
    Leading,
}

impl fmt::Display for PerformanceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PerformanceTier::Developing => "Developing",
            PerformanceTier::Improving => "Improving",
            PerformanceTier::Leading => "Leading",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct LeaderboardEntry {
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Company")]
    #[tabled(rename = "Company")]
    pub company_name: String,
    #[serde(rename = "Score")]
    #[tabled(rename = "Score", display_with = "fmt_num")]
    pub score: f64,
    #[serde(rename = "Industry")]
    #[tabled(rename = "Industry")]
    pub industry: String,
    #[serde(rename = "AvgRevenue")]
    #[tabled(rename = "AvgRevenue", display_with = "fmt_num")]
    pub avg_revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct RegionRollup {
    #[serde(rename = "Region")]
    #[tabled(rename = "Region")]
    pub region: String,
    #[serde(rename = "EsgOverall")]
    #[tabled(rename = "EsgOverall", display_with = "fmt_num")]
    pub avg_esg_overall: f64,
    #[serde(rename = "Environmental")]
    #[tabled(rename = "Environmental", display_with = "fmt_num")]
    pub avg_environmental: f64,
    #[serde(rename = "Social")]
    #[tabled(rename = "Social", display_with = "fmt_num")]
    pub avg_social: f64,
    #[serde(rename = "Governance")]
    #[tabled(rename = "Governance", display_with = "fmt_num")]
    pub avg_governance: f64,
    #[serde(rename = "AvgRevenue")]
    #[tabled(rename = "AvgRevenue", display_with = "fmt_num")]
    pub avg_revenue: f64,
    #[serde(rename = "AvgCarbon")]
    #[tabled(rename = "AvgCarbon", display_with = "fmt_num")]
    pub avg_carbon: f64,
    #[serde(rename = "AvgWater")]
    #[tabled(rename = "AvgWater", display_with = "fmt_num")]
    pub avg_water: f64,
    #[serde(rename = "AvgEnergy")]
    #[tabled(rename = "AvgEnergy", display_with = "fmt_num")]
    pub avg_energy: f64,
    #[serde(rename = "Companies")]
    #[tabled(rename = "Companies")]
    pub companies: usize,
    #[serde(rename = "Tier")]
    #[tabled(rename = "Tier")]
    pub tier: PerformanceTier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct IndustryRollup {
    #[serde(rename = "Industry")]
    #[tabled(rename = "Industry")]
    pub industry: String,
    #[serde(rename = "EsgAvg")]
    #[tabled(rename = "EsgAvg", display_with = "fmt_num")]
    pub avg_esg: f64,
    #[serde(rename = "EsgStd")]
    #[tabled(rename = "EsgStd", display_with = "fmt_opt")]
    pub std_esg: Option<f64>,
    #[serde(rename = "RevenueAvg")]
    #[tabled(rename = "RevenueAvg", display_with = "fmt_num")]
    pub avg_revenue: f64,
    #[serde(rename = "RevenueTotal")]
    #[tabled(rename = "RevenueTotal", display_with = "fmt_num")]
    pub total_revenue: f64,
    #[serde(rename = "CarbonAvg")]
    #[tabled(rename = "CarbonAvg", display_with = "fmt_num")]
    pub avg_carbon: f64,
    #[serde(rename = "WaterAvg")]
    #[tabled(rename = "WaterAvg", display_with = "fmt_num")]
    pub avg_water: f64,
    #[serde(rename = "EnergyAvg")]
    #[tabled(rename = "EnergyAvg", display_with = "fmt_num")]
    pub avg_energy: f64,
    #[serde(rename = "GrowthRate")]
    #[tabled(rename = "GrowthRate", display_with = "fmt_num")]
    pub avg_growth: f64,
    #[serde(rename = "Companies")]
    #[tabled(rename = "Companies")]
    pub companies: usize,
}

// One row of the quartile financial cross-tab. Averages are absent when the
// bucket holds no records.
#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct QuartileSlice {
    #[serde(rename = "Quartile")]
    #[tabled(rename = "Quartile")]
    pub quartile: Quartile,
    #[serde(rename = "Records")]
    #[tabled(rename = "Records")]
    pub records: usize,
    #[serde(rename = "ProfitMargin")]
    #[tabled(rename = "ProfitMargin", display_with = "fmt_opt")]
    pub avg_profit_margin: Option<f64>,
    #[serde(rename = "GrowthRate")]
    #[tabled(rename = "GrowthRate", display_with = "fmt_opt")]
    pub avg_growth_rate: Option<f64>,
    #[serde(rename = "MarketCap")]
    #[tabled(rename = "MarketCap", display_with = "fmt_opt")]
    pub avg_market_cap: Option<f64>,
}

// Cross-tab plus the Q4-Q1 spreads, which are outputs in their own right.
#[derive(Debug, Clone, PartialEq)]
pub struct QuartileCrossTab {
    pub slices: Vec<QuartileSlice>,
    pub profit_margin_spread: Option<f64>,
    pub growth_rate_spread: Option<f64>,
    pub market_cap_spread: Option<f64>,
}

// Yearly mean of one metric with its change against the previous year in the
// series. Both deltas are absent at the first year; the percent delta is also
// absent when the previous mean was zero.
#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct YoyPoint {
    #[serde(rename = "Year")]
    #[tabled(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Mean")]
    #[tabled(rename = "Mean", display_with = "fmt_num")]
    pub mean: f64,
    #[serde(rename = "PctChange")]
    #[tabled(rename = "PctChange", display_with = "fmt_opt")]
    pub pct_change: Option<f64>,
    #[serde(rename = "PointChange")]
    #[tabled(rename = "PointChange", display_with = "fmt_opt")]
    pub point_change: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct EfficiencyEntry {
    #[serde(rename = "Industry")]
    #[tabled(rename = "Industry")]
    pub industry: String,
    #[serde(rename = "AvgEfficiency")]
    #[tabled(rename = "AvgEfficiency", display_with = "fmt_opt")]
    pub avg_efficiency: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct YearlyEsgRow {
    #[serde(rename = "Year")]
    #[tabled(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Overall")]
    #[tabled(rename = "Overall", display_with = "fmt_num")]
    pub overall: f64,
    #[serde(rename = "Environmental")]
    #[tabled(rename = "Environmental", display_with = "fmt_num")]
    pub environmental: f64,
    #[serde(rename = "Social")]
    #[tabled(rename = "Social", display_with = "fmt_num")]
    pub social: f64,
    #[serde(rename = "Governance")]
    #[tabled(rename = "Governance", display_with = "fmt_num")]
    pub governance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct YearlyResourceRow {
    #[serde(rename = "Year")]
    #[tabled(rename = "Year")]
    pub year: i32,
    #[serde(rename = "CarbonAvg")]
    #[tabled(rename = "CarbonAvg", display_with = "fmt_num")]
    pub avg_carbon: f64,
    #[serde(rename = "CarbonStd")]
    #[tabled(rename = "CarbonStd", display_with = "fmt_opt")]
    pub std_carbon: Option<f64>,
    #[serde(rename = "EnergyAvg")]
    #[tabled(rename = "EnergyAvg", display_with = "fmt_num")]
    pub avg_energy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct YearIndustryEsg {
    #[serde(rename = "Year")]
    #[tabled(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Industry")]
    #[tabled(rename = "Industry")]
    pub industry: String,
    #[serde(rename = "EsgOverall")]
    #[tabled(rename = "EsgOverall", display_with = "fmt_num")]
    pub avg_esg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct DistributionRow {
    #[serde(rename = "Dimension")]
    #[tabled(rename = "Dimension")]
    pub dimension: EsgDimension,
    #[serde(rename = "Min")]
    #[tabled(rename = "Min", display_with = "fmt_num")]
    pub min: f64,
    #[serde(rename = "Q1")]
    #[tabled(rename = "Q1", display_with = "fmt_num")]
    pub q1: f64,
    #[serde(rename = "Median")]
    #[tabled(rename = "Median", display_with = "fmt_num")]
    pub median: f64,
    #[serde(rename = "Q3")]
    #[tabled(rename = "Q3", display_with = "fmt_num")]
    pub q3: f64,
    #[serde(rename = "Max")]
    #[tabled(rename = "Max", display_with = "fmt_num")]
    pub max: f64,
    #[serde(rename = "Mean")]
    #[tabled(rename = "Mean", display_with = "fmt_num")]
    pub mean: f64,
    #[serde(rename = "Std")]
    #[tabled(rename = "Std", display_with = "fmt_opt")]
    pub std: Option<f64>,
}

// Headline numbers for the current view; absent entirely when the view is
// empty rather than reporting zeros.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewStats {
    pub companies: usize,
    pub records: usize,
    pub avg_esg: f64,
    pub avg_revenue: f64,
    pub avg_growth: f64,
    pub avg_carbon: f64,
    pub positive_growth: usize,
    pub positive_growth_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct YearScore {
    #[serde(rename = "Year")]
    #[tabled(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Score")]
    #[tabled(rename = "Score", display_with = "fmt_num")]
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionSeries {
    pub baseline_year: i32,
    pub rate_pct: f64,
    pub historical: Vec<YearScore>,
    pub projected: Vec<YearScore>,
}

#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub overview: OverviewStats,
    pub profit_margin_spread: Option<f64>,
    pub growth_rate_spread: Option<f64>,
    pub market_cap_spread: Option<f64>,
}

#[cfg(test)]
pub(crate) fn sample_record(name: &str, year: i32, esg: f64) -> Record {
    let id = name
        .rsplit('_')
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(1);
    Record {
        company_id: id,
        company_name: name.to_string(),
        industry: "Technology".to_string(),
        region: "Europe".to_string(),
        year,
        revenue: 1000.0,
        profit_margin: 8.0,
        market_cap: 5000.0,
        growth_rate: 4.0,
        esg_overall: esg,
        esg_environmental: esg,
        esg_social: esg,
        esg_governance: esg,
        carbon_emissions: 100_000.0,
        water_usage: 50_000.0,
        energy_consumption: 200_000.0,
    }
}
