//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::{CsvAdapter, FORECAST_FILE, GAP_FILE, TRANSFER_FILE};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::arima::{Arima111, DEFAULT_MAX_ITERATIONS, DEFAULT_MIN_OBSERVATIONS};
use crate::domain::config_validation::{int_or_default, validate_config};
use crate::domain::error::StockshiftError;
use crate::domain::execution::{execute_transfer, TransferRequest};
use crate::domain::forecast::{forecast_demand, DEFAULT_HORIZON_DAYS};
use crate::domain::live::{recommend_transfers, LiveConfig, DEFAULT_LOW_THRESHOLD, DEFAULT_MOVE_QTY};
use crate::domain::matcher::{MatcherConfig, DEFAULT_SHORTAGE_THRESHOLD, DEFAULT_SURPLUS_THRESHOLD};
use crate::domain::plan::{build_plan, PlanConfig};
use crate::domain::records::TransferRecommendation;
use crate::domain::summary::InventorySummary;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "stockshift", about = "Inventory rebalancing recommendations")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Forecast weekly demand from sales history
    Forecast {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
    /// Run forecast, gap analysis and transfer matching
    Plan {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
    /// Suggest transfers from current stock levels
    Suggest {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show inventory totals per store
    Summary {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Move stock between two stores in the inventory file
    Transfer {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        #[arg(long)]
        product: String,
        #[arg(long)]
        qty: u32,
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Forecast { config, output_dir } => run_forecast(&config, output_dir),
        Command::Plan { config, output_dir } => run_plan(&config, output_dir),
        Command::Suggest { config } => run_suggest(&config),
        Command::Summary { config } => run_summary(&config),
        Command::Transfer {
            config,
            from,
            to,
            product,
            qty,
            dry_run,
        } => run_transfer(
            &config,
            TransferRequest {
                from_store: from,
                to_store: to,
                product,
                quantity: qty,
            },
            dry_run,
        ),
        Command::Validate { config } => run_validate(&config),
    }
}

fn fail(err: StockshiftError) -> ExitCode {
    eprintln!("error: {err}");
    (&err).into()
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        fail(StockshiftError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        })
    })
}

/// Loads and validates the config, then builds the CSV adapter from it.
fn load_validated(
    path: &PathBuf,
    output_dir: Option<PathBuf>,
) -> Result<(FileConfigAdapter, CsvAdapter), ExitCode> {
    eprintln!("Loading config from {}", path.display());
    let config = load_config(path)?;
    validate_config(&config).map_err(fail)?;
    let mut adapter = CsvAdapter::from_config(&config).map_err(fail)?;
    if let Some(dir) = output_dir {
        adapter = adapter.with_output_dir(dir);
    }
    Ok((config, adapter))
}

fn int_setting<T: TryFrom<i64>>(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: i64,
) -> Result<T, StockshiftError> {
    let value = int_or_default(config, section, key, default)?;
    T::try_from(value).map_err(|_| StockshiftError::ConfigInvalid {
        section: section.into(),
        key: key.into(),
        reason: format!("{} is out of range", value),
    })
}

pub fn build_plan_config(config: &dyn ConfigPort) -> Result<PlanConfig, StockshiftError> {
    Ok(PlanConfig {
        horizon_days: int_setting(config, "forecast", "horizon_days", DEFAULT_HORIZON_DAYS as i64)?,
        model: Arima111 {
            min_observations: int_setting(
                config,
                "forecast",
                "min_observations",
                DEFAULT_MIN_OBSERVATIONS as i64,
            )?,
            max_iterations: int_setting(
                config,
                "forecast",
                "max_iterations",
                DEFAULT_MAX_ITERATIONS as i64,
            )?,
        },
        matcher: MatcherConfig {
            surplus_threshold: int_or_default(
                config,
                "matcher",
                "surplus_threshold",
                DEFAULT_SURPLUS_THRESHOLD,
            )?,
            shortage_threshold: int_or_default(
                config,
                "matcher",
                "shortage_threshold",
                DEFAULT_SHORTAGE_THRESHOLD,
            )?,
        },
    })
}

pub fn build_live_config(config: &dyn ConfigPort) -> Result<LiveConfig, StockshiftError> {
    Ok(LiveConfig {
        low_threshold: int_setting(config, "live", "low_threshold", i64::from(DEFAULT_LOW_THRESHOLD))?,
        move_qty: int_setting(config, "live", "move_qty", i64::from(DEFAULT_MOVE_QTY))?,
    })
}

fn run_forecast(config_path: &PathBuf, output_dir: Option<PathBuf>) -> ExitCode {
    let (config, adapter) = match load_validated(config_path, output_dir) {
        Ok(loaded) => loaded,
        Err(code) => return code,
    };
    let plan_config = match build_plan_config(&config) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };

    let sales = match adapter.fetch_sales() {
        Ok(s) => s,
        Err(e) => return fail(e),
    };
    eprintln!("Forecasting {} sales records...", sales.len());

    let forecasts = forecast_demand(&sales, &plan_config.model, plan_config.horizon_days);
    if let Err(e) = adapter.write_forecasts(&forecasts) {
        return fail(e);
    }

    eprintln!(
        "{} forecasts written to: {}",
        forecasts.len(),
        adapter.output_path(FORECAST_FILE).display()
    );
    ExitCode::SUCCESS
}

fn run_plan(config_path: &PathBuf, output_dir: Option<PathBuf>) -> ExitCode {
    let (config, adapter) = match load_validated(config_path, output_dir) {
        Ok(loaded) => loaded,
        Err(code) => return code,
    };
    let plan_config = match build_plan_config(&config) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };

    let code = run_plan_pipeline(&adapter, &adapter, &plan_config);
    if code == ExitCode::SUCCESS {
        eprintln!("\nTables written to:");
        for file in [FORECAST_FILE, GAP_FILE, TRANSFER_FILE] {
            eprintln!("  {}", adapter.output_path(file).display());
        }
    }
    code
}

/// Full batch pass against arbitrary ports: fetch, plan, print, write.
pub fn run_plan_pipeline(
    data_port: &dyn DataPort,
    report_port: &dyn ReportPort,
    config: &PlanConfig,
) -> ExitCode {
    // Stage 1: Load inputs
    let sales = match data_port.fetch_sales() {
        Ok(s) => s,
        Err(e) => return fail(e),
    };
    let inventory = match data_port.fetch_inventory() {
        Ok(i) => i,
        Err(e) => return fail(e),
    };

    eprintln!(
        "Planning: {} sales records, {} inventory rows, {}-day horizon",
        sales.len(),
        inventory.len(),
        config.horizon_days
    );

    // Stage 2: Forecast, gaps, matching
    let plan = build_plan(&sales, &inventory, config);

    // Stage 3: Console summary
    eprintln!("\n=== Rebalance Plan ===");
    eprintln!("Forecasts:        {}", plan.forecasts.len());
    eprintln!("Gap rows:         {}", plan.gaps.len());
    eprintln!("Shortages:        {}", plan.shortage_count(&config.matcher));
    eprintln!("Surpluses:        {}", plan.surplus_count(&config.matcher));
    eprintln!("Transfers:        {}", plan.transfers.len());
    eprintln!("Units moved:      {}", plan.units_moved());
    print_transfers(&plan.transfers);

    // Stage 4: Write tables
    match report_port.write_plan(&plan) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => fail(e),
    }
}

fn print_transfers(transfers: &[TransferRecommendation]) {
    if transfers.is_empty() {
        return;
    }
    eprintln!("\n=== Transfers ===");
    for t in transfers {
        eprintln!(
            "  {} -> {}: {} x {} ({})",
            t.from_store, t.to_store, t.quantity, t.product, t.reason
        );
    }
}

fn run_suggest(config_path: &PathBuf) -> ExitCode {
    let (config, adapter) = match load_validated(config_path, None) {
        Ok(loaded) => loaded,
        Err(code) => return code,
    };
    let live = match build_live_config(&config) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };
    let inventory = match adapter.fetch_inventory() {
        Ok(i) => i,
        Err(e) => return fail(e),
    };

    let suggestions = recommend_transfers(&inventory, &live);
    if suggestions.is_empty() {
        eprintln!("No transfers suggested");
        return ExitCode::SUCCESS;
    }

    for s in &suggestions {
        println!(
            "{},{},{},{},{}",
            s.from_store, s.to_store, s.product, s.quantity, s.reason
        );
    }
    eprintln!("{} transfers suggested", suggestions.len());
    ExitCode::SUCCESS
}

fn run_summary(config_path: &PathBuf) -> ExitCode {
    let (config, adapter) = match load_validated(config_path, None) {
        Ok(loaded) => loaded,
        Err(code) => return code,
    };
    let live = match build_live_config(&config) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };
    let inventory = match adapter.fetch_inventory() {
        Ok(i) => i,
        Err(e) => return fail(e),
    };

    let summary = InventorySummary::compute(&inventory, live.low_threshold);
    println!("Total products:   {}", summary.total_products);
    println!("Total stock:      {}", summary.total_stock);
    println!(
        "Low stock rows:   {} (< {})",
        summary.low_stock_count, live.low_threshold
    );
    for store in &summary.stores {
        println!("\n{}: {} units", store.store, store.total_stock);
        for line in &store.products {
            println!("  {:<12} {}", line.product, line.units_in_stock);
        }
    }
    ExitCode::SUCCESS
}

fn run_transfer(config_path: &PathBuf, request: TransferRequest, dry_run: bool) -> ExitCode {
    let (_config, adapter) = match load_validated(config_path, None) {
        Ok(loaded) => loaded,
        Err(code) => return code,
    };
    let inventory = match adapter.fetch_inventory() {
        Ok(i) => i,
        Err(e) => return fail(e),
    };

    let updated = match execute_transfer(&inventory, &request) {
        Ok(u) => u,
        Err(e) => return fail(e),
    };

    let remaining = updated
        .get(&request.from_store, &request.product)
        .unwrap_or(0);
    let received = updated.get(&request.to_store, &request.product).unwrap_or(0);
    eprintln!(
        "{} x {}: {} -> {} (now {} / {})",
        request.quantity,
        request.product,
        request.from_store,
        request.to_store,
        remaining,
        received
    );

    if dry_run {
        eprintln!("Dry run: inventory not modified");
        return ExitCode::SUCCESS;
    }

    match adapter.write_inventory(&updated) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => fail(e),
    }
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    let (config, _adapter) = match load_validated(config_path, None) {
        Ok(loaded) => loaded,
        Err(code) => return code,
    };
    let plan = match build_plan_config(&config) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };
    let live = match build_live_config(&config) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };

    eprintln!("\nForecast:");
    eprintln!("  horizon_days:       {}", plan.horizon_days);
    eprintln!("  min_observations:   {}", plan.model.min_observations);
    eprintln!("  max_iterations:     {}", plan.model.max_iterations);
    eprintln!("\nMatcher:");
    eprintln!("  surplus_threshold:  {}", plan.matcher.surplus_threshold);
    eprintln!("  shortage_threshold: {}", plan.matcher.shortage_threshold);
    eprintln!("\nLive:");
    eprintln!("  low_threshold:      {}", live.low_threshold);
    eprintln!("  move_qty:           {}", live.move_qty);
    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}
