// Entry point and menu flow.
//
// - Option [1] picks a dataset (built-in table, CSV file or IMF DataMapper
//   download) and keeps it in memory.
// - Option [2] classifies it, writes the report files and prints previews.
// - After generating reports, the user can go back to the menu or exit.
use anyhow::{Context, Result};
use debt_report::aggregate::{build_table, BuildOptions, SortKey, SortOrder};
use debt_report::classify::ClassificationRule;
use debt_report::config::{load_config, ReportConfig};
use debt_report::datasets::{self, GDP_METRIC, TOTAL_DEBT_METRIC};
use debt_report::insights::{key_insights, InsightKeys};
use debt_report::loader::{self, CsvLayout, DEBT_RATIO_METRIC, DEFAULT_PREFERRED_YEARS, IMF_DEBT_INDICATOR};
use debt_report::report::{self, SinkFormat};
use debt_report::types::Record;
use debt_report::util::format_int;
use once_cell::sync::Lazy;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

const CONFIG_ENV: &str = "DEBT_REPORT_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "debt_report.json";
const IMF_DATA_FILE: &str = "imf_debt_data.json";
const IMF_COUNTRIES_FILE: &str = "imf_countries.json";

// Loaded once per menu selection; reports can be regenerated from it.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| Mutex::new(AppState { dataset: None }));

struct AppState {
    dataset: Option<Dataset>,
}

#[derive(Clone)]
struct Dataset {
    slug: String,
    title: String,
    records: Vec<Record>,
}

/// Prompt and read one trimmed line. `None` once input is closed.
fn read_line_from<R: BufRead>(reader: &mut R, prompt: &str) -> Option<String> {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    match reader.read_line(&mut buf) {
        Ok(0) => None,
        Ok(_) => Some(buf.trim().to_string()),
        Err(e) => {
            log::error!("Failed to read input: {}", e);
            None
        }
    }
}

fn read_line(prompt: &str) -> Option<String> {
    read_line_from(&mut io::stdin().lock(), prompt)
}

fn read_choice() -> Option<String> {
    read_line("Enter choice: ")
}

/// Returns `true` if the user chose `Y`, `false` for `N` or end of input.
fn prompt_back_to_menu() -> bool {
    loop {
        let Some(answer) = read_line("Back to Report Selection (Y/N): ") else {
            return false;
        };
        match answer.to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

fn load_imf(config: &ReportConfig) -> Result<Vec<Record>> {
    let timeout = Duration::from_secs(config.wait_timeout_secs);
    println!("Waiting for {} (up to {}s)...", IMF_DATA_FILE, config.wait_timeout_secs);
    loader::wait_for_file(IMF_DATA_FILE, timeout, Duration::from_secs(1))?;

    let mut names = datasets::country_names();
    if Path::new(IMF_COUNTRIES_FILE).exists() {
        let json = std::fs::read_to_string(IMF_COUNTRIES_FILE)?;
        names.extend(loader::parse_imf_countries(&json)?);
    }
    let json = std::fs::read_to_string(IMF_DATA_FILE)?;
    let (records, load_report) =
        loader::parse_imf_datamapper(&json, IMF_DEBT_INDICATOR, &DEFAULT_PREFERRED_YEARS, &names)?;
    println!(
        "Processed {} countries ({} without recent data).",
        format_int(load_report.loaded_rows),
        format_int(load_report.skipped_rows)
    );
    Ok(records)
}

fn load_csv() -> Result<Vec<Record>> {
    let closed = || anyhow::anyhow!("input closed");
    let path = read_line("CSV path: ").ok_or_else(closed)?;
    let entity = read_line("Entity column [Country]: ").ok_or_else(closed)?;
    let period = read_line("Period column (blank for none): ").ok_or_else(closed)?;
    let mut layout = CsvLayout::new(if entity.is_empty() { "Country" } else { entity.as_str() }, 2024);
    if !period.is_empty() {
        layout = layout.with_period_column(period);
    }
    let (records, load_report) =
        loader::load_records_csv(&path, &layout).with_context(|| format!("Failed to load {}", path))?;
    println!(
        "Processing dataset... ({} rows loaded, {} skipped)",
        format_int(load_report.loaded_rows),
        format_int(load_report.skipped_rows)
    );
    if load_report.parse_errors > 0 {
        println!("Note: {} cells could not be parsed as numbers.", format_int(load_report.parse_errors));
    }
    Ok(records)
}

/// Handle option [1]: choose and load a dataset into `APP_STATE`.
fn handle_load(config: &ReportConfig) {
    println!("[1] Major economies (2024)");
    println!("[2] OIC members (2024)");
    println!("[3] Bangladesh history (2020-2025)");
    println!("[4] Global debt ratios");
    println!("[5] CSV file");
    println!("[6] IMF DataMapper download\n");
    let Some(choice) = read_choice() else {
        return;
    };
    let (slug, title, loaded): (&str, &str, Result<Vec<Record>>) = match choice.as_str() {
        "1" => ("major_economies", "Global Economic Powerhouses & OIC", datasets::major_economies_2024().map_err(Into::into)),
        "2" => ("oic_members", "OIC Member Economies", datasets::oic_members_2024().map_err(Into::into)),
        "3" => ("bangladesh", "Bangladesh Macroeconomic Trends", datasets::bangladesh_history().map_err(Into::into)),
        "4" => ("global_debt", "Global Debt-to-GDP Ratios", datasets::global_debt_ratios().map_err(Into::into)),
        "5" => ("custom", "Custom Dataset", load_csv()),
        "6" => ("imf_debt", "IMF General Government Gross Debt", load_imf(config)),
        _ => {
            println!("Invalid choice.\n");
            return;
        }
    };
    match loaded {
        Ok(records) => {
            println!("Loaded {} records for {}.\n", format_int(records.len()), title);
            if let Ok(mut state) = APP_STATE.lock() {
                state.dataset = Some(Dataset { slug: slug.to_string(), title: title.to_string(), records });
            }
        }
        Err(e) => {
            log::error!("Load failed: {:#}", e);
            eprintln!("Failed to load dataset: {:#}\n", e);
        }
    }
}

fn has_metric(records: &[Record], metric: &str) -> bool {
    records.iter().any(|r| r.metric(metric).is_some())
}

fn generate(dataset: &Dataset, config: &ReportConfig) -> Result<()> {
    let records = &dataset.records;
    let mut options = BuildOptions::new(config.mode).with_describe().with_max(DEBT_RATIO_METRIC);
    if has_metric(records, GDP_METRIC) {
        options = options.with_max(GDP_METRIC);
    }
    if has_metric(records, GDP_METRIC) && has_metric(records, TOTAL_DEBT_METRIC) {
        options = options.with_correlation(GDP_METRIC, TOTAL_DEBT_METRIC);
    } else if has_metric(records, GDP_METRIC) {
        options = options.with_correlation(GDP_METRIC, DEBT_RATIO_METRIC);
    }
    // Yearly series read best in time order; cross-country tables by ratio.
    let single_entity = records.windows(2).all(|w| w[0].entity_name() == w[1].entity_name());
    options = if single_entity {
        options.with_sort(SortKey::Period, SortOrder::Ascending)
    } else {
        options.with_sort(SortKey::Metric(DEBT_RATIO_METRIC.into()), SortOrder::Descending)
    };

    let table = build_table(records, DEBT_RATIO_METRIC, &ClassificationRule::debt_to_gdp(), &options)?;

    std::fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("Failed to create {}", config.output_dir.display()))?;
    let out = |name: &str| config.output_dir.join(format!("{}_{}", dataset.slug, name));

    let report_path = out("debt_analysis.csv");
    let written = report::write_table(&report_path, &table, &config.sink_format()?)?;
    report::write_table(out("chart.json"), &table, &SinkFormat::Json)?;
    report::write_csv(out("categories.csv"), &table.category_counts())?;
    let summary = report::summarize(&table);
    report::write_json(out("summary.json"), &summary)?;

    println!("{}", dataset.title);
    println!("(Classified by {})\n", DEBT_RATIO_METRIC);
    println!("{}\n", report::preview(&table, config.preview_rows));
    println!("(Full table of {} rows exported to {})", format_int(written), report_path.display());
    if table.skipped_count() > 0 {
        println!("Note: {} entities skipped: {}", table.skipped_count(), table.skipped().join(", "));
    }

    println!("\n--- Key Insights ---");
    let keys = InsightKeys {
        size_metric: GDP_METRIC.to_string(),
        compare: Some(("OIC (57 members)".to_string(), "United States".to_string())),
    };
    for (i, line) in key_insights(&table, &keys).iter().enumerate() {
        println!("{}. {}", i + 1, line);
    }
    println!();
    Ok(())
}

/// Handle option [2]: classify the loaded dataset and write all outputs.
fn handle_generate_reports(config: &ReportConfig) {
    let dataset = APP_STATE.lock().ok().and_then(|state| state.dataset.clone());
    let Some(dataset) = dataset else {
        println!("Error: No data loaded. Please load a dataset first (option 1).\n");
        return;
    };
    println!("Generating reports...\n");
    if let Err(e) = generate(&dataset, config) {
        log::error!("Report generation failed: {:#}", e);
        eprintln!("Report generation failed: {:#}\n", e);
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("DEBT_REPORT_LOG", "info")).init();

    let config_path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = load_config(Some(Path::new(&config_path)))
        .with_context(|| format!("Failed to read config: {}", config_path))?;
    log::info!("Writing reports to {}", config.output_dir.display());

    loop {
        println!("Debt Report");
        println!("[1] Load a dataset");
        println!("[2] Generate Reports\n");
        let Some(choice) = read_choice() else {
            println!("\nExiting the program.");
            break;
        };
        match choice.as_str() {
            "1" => handle_load(&config),
            "2" => {
                println!();
                handle_generate_reports(&config);
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            _ => println!("Invalid choice. Please enter 1 or 2.\n"),
        }
    }
    Ok(())
}
