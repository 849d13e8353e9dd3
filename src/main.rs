// Entry point and high-level CLI flow.
//
// The console menu stands in for the original dashboard's sidebar:
// - Option [1] loads the dataset (CSV, or generated sample data).
// - Option [2] edits the filter values that define the active view.
// - Option [3] recomputes every report over the view, previews them as
//   markdown tables, and writes the report CSVs plus a JSON summary.
// - Option [4] runs the improvement-trajectory projection.
// - Option [5] exports the active view as a dated CSV.
mod datagen;
mod derived;
mod filter;
mod loader;
mod output;
mod projection;
mod reports;
mod types;
mod util;

use chrono::Local;
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::io::{self, Write};
use std::sync::Mutex;

use filter::FilterSpec;
use loader::Source;
use types::{DashboardSummary, EsgDimension, Record};
use util::{fmt_opt, format_int, format_number, parse_f64_safe, parse_i32_safe};

const DATA_FILE: &str = "esg_financial_data.csv";

// In-memory app state: the dataset is loaded once, the filter spec persists
// between menu actions, and the active view is rebuilt on demand.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| {
    Mutex::new(AppState {
        data: None,
        spec: None,
    })
});

struct AppState {
    data: Option<Vec<Record>>,
    spec: Option<FilterSpec>,
}

/// Read a single line of input after printing the common "Enter choice:" prompt.
fn read_choice() -> String {
    prompt_line("Enter choice")
}

fn prompt_line(label: &str) -> String {
    print!("{}: ", label);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

/// Ask the user whether to go back to the menu after generating reports.
fn prompt_back_to_menu() -> bool {
    loop {
        print!("Back to the menu (Y/N): ");
        let _ = io::stdout().flush();
        let mut buf = String::new();
        io::stdin().read_line(&mut buf).ok();
        let resp = buf.trim().to_uppercase();
        match resp.as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

fn prompt_i32(label: &str, current: i32) -> i32 {
    let input = prompt_line(&format!("{} [{}]", label, current));
    if input.is_empty() {
        return current;
    }
    match parse_i32_safe(Some(&input)) {
        Some(v) => v,
        None => {
            println!("Invalid number, keeping {}.", current);
            current
        }
    }
}

fn prompt_f64(label: &str, current: f64) -> f64 {
    let input = prompt_line(&format!("{} [{}]", label, format_number(current, 2)));
    if input.is_empty() {
        return current;
    }
    match parse_f64_safe(Some(&input)) {
        Some(v) => v,
        None => {
            println!("Invalid number, keeping {}.", format_number(current, 2));
            current
        }
    }
}

fn prompt_set(label: &str, current: &HashSet<String>, all: &HashSet<String>) -> HashSet<String> {
    let mut names: Vec<&String> = current.iter().collect();
    names.sort();
    let shown: Vec<&str> = names.iter().map(|s| s.as_str()).collect();
    let input = prompt_line(&format!(
        "{} [{}] (comma list, \"all\", or \"none\")",
        label,
        shown.join(", ")
    ));
    if input.is_empty() {
        return current.clone();
    }
    match input.as_str() {
        "all" => all.clone(),
        "none" => HashSet::new(),
        list => list
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
    }
}

/// Handle option [1]: load the dataset and reset the filters to cover it.
fn handle_load() {
    let (data, report) = loader::load(DATA_FILE);
    match report.source {
        Source::File => {
            println!(
                "Processing dataset... ({} rows read, {} loaded)",
                format_int(report.total_rows as i64),
                format_int(report.loaded_rows as i64)
            );
            if report.skipped_rows > 0 {
                println!(
                    "Note: {} rows skipped due to parse/validation errors.",
                    format_int(report.skipped_rows as i64)
                );
            }
        }
        Source::Synthetic => {
            println!(
                "Source file unavailable; generated {} sample records ({} companies, {}-{}).",
                format_int(report.loaded_rows as i64),
                datagen::COMPANIES,
                datagen::YEAR_MIN,
                datagen::YEAR_MAX
            );
        }
    }
    println!();

    let spec = FilterSpec::covering(&data);
    let mut state = APP_STATE.lock().unwrap();
    state.data = Some(data);
    state.spec = Some(spec);
}

/// Rebuild the active view for the current filters, or complain if no
/// dataset is loaded yet.
fn current_view() -> Option<Vec<Record>> {
    let state = APP_STATE.lock().unwrap();
    match (&state.data, &state.spec) {
        (Some(data), Some(spec)) => Some(filter::apply_filters(data, spec)),
        _ => {
            println!("Error: No data loaded. Please load the dataset first (option 1).\n");
            None
        }
    }
}

/// Handle option [2]: walk through every filter value. Blank input keeps the
/// current value; "all" restores a category set to the dataset's full
/// enumeration.
fn handle_filters() {
    let (full, mut spec) = {
        let state = APP_STATE.lock().unwrap();
        match (&state.data, &state.spec) {
            (Some(data), Some(spec)) => (FilterSpec::covering(data), spec.clone()),
            _ => {
                println!("Error: No data loaded. Please load the dataset first (option 1).\n");
                return;
            }
        }
    };

    println!("Adjust filters (blank keeps the current value).");
    spec.year_min = prompt_i32("Start year", spec.year_min);
    spec.year_max = prompt_i32("End year", spec.year_max);
    spec.industries = prompt_set("Industries", &spec.industries, &full.industries);
    spec.regions = prompt_set("Regions", &spec.regions, &full.regions);
    spec.min_esg_overall = prompt_f64("Minimum ESG score", spec.min_esg_overall);
    spec.min_revenue = prompt_f64("Minimum revenue (M)", spec.min_revenue);
    spec.max_carbon_emissions = prompt_f64("Maximum carbon emissions", spec.max_carbon_emissions);
    spec.max_energy_consumption =
        prompt_f64("Maximum energy consumption", spec.max_energy_consumption);
    spec.min_growth_rate = prompt_f64("Minimum growth rate (%)", spec.min_growth_rate);

    let mut state = APP_STATE.lock().unwrap();
    let matching = state
        .data
        .as_deref()
        .map(|data| filter::apply_filters(data, &spec).len())
        .unwrap_or(0);
    println!(
        "{} records match the updated filters.\n",
        format_int(matching as i64)
    );
    state.spec = Some(spec);
}

/// Handle option [3]: compute every report over the active view, preview the
/// leading rows, and write the report files.
fn handle_generate_reports() {
    let Some(view) = current_view() else {
        return;
    };
    if view.is_empty() {
        println!("No records match the current filters. Nothing to report.\n");
        return;
    }

    println!("Generating reports...");
    println!("Outputs saved to individual files...\n");

    let stats = match reports::overview(&view) {
        Some(s) => s,
        None => return,
    };
    println!(
        "Companies in view: {} ({} records)",
        format_int(stats.companies as i64),
        format_int(stats.records as i64)
    );
    println!("Average ESG score: {}", format_number(stats.avg_esg, 1));
    println!("Average revenue: ${}M", format_number(stats.avg_revenue, 0));
    println!(
        "Average carbon emissions: {} tons",
        format_number(stats.avg_carbon, 0)
    );
    println!(
        "Positive growth: {} records ({}%)\n",
        format_int(stats.positive_growth as i64),
        format_number(stats.positive_growth_pct, 0)
    );

    println!("Report 1: ESG Leadership Board (top {})\n", reports::LEADERBOARD_TOP_K);
    for dim in EsgDimension::ALL {
        let board = reports::esg_leaderboard(&view, dim, reports::LEADERBOARD_TOP_K);
        println!("{} leaders:", dim.label());
        output::preview_table_rows(&board, 3);
        if dim == EsgDimension::Overall {
            if let Err(e) = output::write_csv("report1_esg_leaderboard.csv", &board) {
                eprintln!("Write error: {}", e);
            }
        }
    }
    println!("(Overall board exported to report1_esg_leaderboard.csv)\n");

    let regions = reports::region_rollups(&view);
    if let Err(e) = output::write_csv("report2_regional_summary.csv", &regions) {
        eprintln!("Write error: {}", e);
    }
    println!("Report 2: Regional Performance Summary\n");
    output::preview_table_rows(&regions, 4);
    println!("(Full table exported to report2_regional_summary.csv)\n");

    let industries = reports::industry_rollups(&view);
    if let Err(e) = output::write_csv("report3_industry_summary.csv", &industries) {
        eprintln!("Write error: {}", e);
    }
    println!("Report 3: Industry Statistics\n");
    output::preview_table_rows(&industries, 5);
    println!("(Full table exported to report3_industry_summary.csv)\n");

    let crosstab = reports::quartile_crosstab(&view);
    if let Err(e) = output::write_csv("report4_quartile_performance.csv", &crosstab.slices) {
        eprintln!("Write error: {}", e);
    }
    println!("Report 4: Financial Performance by ESG Quartile\n");
    output::preview_table_rows(&crosstab.slices, 4);
    println!(
        "Quartile spread (Q4 - Q1): profit margin {}, growth rate {}, market cap {}",
        fmt_opt(&crosstab.profit_margin_spread),
        fmt_opt(&crosstab.growth_rate_spread),
        fmt_opt(&crosstab.market_cap_spread)
    );
    println!("(Full table exported to report4_quartile_performance.csv)\n");

    let yearly = reports::yearly_esg_series(&view);
    if let Err(e) = output::write_csv("report5_annual_trends.csv", &yearly) {
        eprintln!("Write error: {}", e);
    }
    println!("Report 5: ESG Score Evolution by Year\n");
    output::preview_table_rows(&yearly, 3);
    println!("Revenue YoY change:");
    output::preview_table_rows(&reports::yoy_series(&view, |r| r.revenue), 3);
    println!("ESG score YoY change:");
    output::preview_table_rows(&reports::yoy_series(&view, |r| r.esg_overall), 3);
    println!("Resource use by year:");
    output::preview_table_rows(&reports::yearly_resource_series(&view), 3);
    println!("Industry ESG by year:");
    output::preview_table_rows(&reports::esg_by_year_industry(&view), 3);
    println!("Score distribution:");
    output::preview_table_rows(&reports::score_distribution(&view), 4);
    println!("(Yearly table exported to report5_annual_trends.csv)\n");

    let efficiency = reports::efficiency_ranking(&view);
    if let Err(e) = output::write_csv("report6_resource_efficiency.csv", &efficiency) {
        eprintln!("Write error: {}", e);
    }
    println!("Report 6: Resource Efficiency by Industry\n");
    output::preview_table_rows(&efficiency, 5);
    println!("(Full table exported to report6_resource_efficiency.csv)\n");

    let summary = DashboardSummary {
        overview: stats,
        profit_margin_spread: crosstab.profit_margin_spread,
        growth_rate_spread: crosstab.growth_rate_spread,
        market_cap_spread: crosstab.market_cap_spread,
    };
    if let Err(e) = output::write_json("summary.json", &summary) {
        eprintln!("Write error: {}", e);
    }
    println!("Summary stats written to summary.json\n");
}

/// Handle option [4]: the improvement-trajectory simulator.
fn handle_projection() {
    let Some(view) = current_view() else {
        return;
    };
    if view.is_empty() {
        println!("No records match the current filters. Nothing to project.\n");
        return;
    }

    let default_year = view.iter().map(|r| r.year).min().unwrap_or(0);
    let baseline_year = prompt_i32("Baseline year", default_year);
    let rate = prompt_f64("Annual improvement rate (%)", 5.0);

    match projection::project(&view, baseline_year, rate, projection::DEFAULT_HORIZON_YEARS) {
        Some(series) => {
            println!("\nHistorical mean ESG score:");
            output::preview_table_rows(&series.historical, series.historical.len());
            println!(
                "Projected at {}% per year from {}:",
                format_number(series.rate_pct, 1),
                series.baseline_year
            );
            output::preview_table_rows(&series.projected, series.projected.len());
        }
        None => {
            println!(
                "No records in {} to anchor the projection.\n",
                baseline_year
            );
        }
    }
}

/// Handle option [5]: export the active view as a dated CSV download.
fn handle_export() {
    let Some(view) = current_view() else {
        return;
    };
    if view.is_empty() {
        println!("No records match the current filters; nothing to export.\n");
        return;
    }

    let filename = output::view_filename(Local::now().date_naive());
    match output::write_csv(&filename, &view) {
        Ok(()) => println!(
            "Exported {} records to {}\n",
            format_int(view.len() as i64),
            filename
        ),
        Err(e) => eprintln!("Write error: {}", e),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("esg_report=info".parse().unwrap()),
        )
        .init();

    loop {
        println!("ESG Analytics:");
        println!("[1] Load the dataset");
        println!("[2] Adjust filters");
        println!("[3] Generate reports");
        println!("[4] Projection simulator");
        println!("[5] Export filtered data\n");
        match read_choice().as_str() {
            "1" => {
                handle_load();
            }
            "2" => {
                handle_filters();
            }
            "3" => {
                println!();
                handle_generate_reports();
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            "4" => {
                handle_projection();
            }
            "5" => {
                handle_export();
            }
            _ => {
                println!("Invalid choice. Please enter 1-5.\n");
            }
        }
    }
}
