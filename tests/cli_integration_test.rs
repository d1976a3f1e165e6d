//! CLI integration tests for command orchestration.
//!
//! Tests cover:
//! - Config parsing (build_plan_config, build_live_config)
//! - Config validation failures surfacing as exit codes
//! - `plan`, `forecast`, `suggest`, `summary` with real CSV/INI files on disk
//! - `transfer` rewriting the inventory file, and its dry-run mode

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;
use stockshift::adapters::csv_adapter::{read_inventory, FORECAST_FILE, GAP_FILE, TRANSFER_FILE};
use stockshift::adapters::file_config_adapter::FileConfigAdapter;
use stockshift::cli::{self, Cli, Command};
use stockshift::domain::error::StockshiftError;
use tempfile::TempDir;

fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// Sales: Shop_A and Shop_B sell 10/day, Factory 5/day, for 21 days.
fn sales_csv() -> String {
    let mut csv = String::from("date,store,product_id,units_sold\n");
    for day in 1..=21 {
        for (store, units) in [("Shop_A", 10), ("Shop_B", 10), ("Factory", 5)] {
            csv.push_str(&format!("2024-01-{day:02},{store},P1,{units}\n"));
        }
    }
    csv
}

const INVENTORY_CSV: &str = "store,product_id,units_in_stock\n\
    Shop_A,P1,35\n\
    Shop_B,P1,60\n\
    Factory,P1,140\n\
    Shop_C,P2,20\n\
    Factory,P2,220\n";

struct Workspace {
    dir: TempDir,
    config: tempfile::NamedTempFile,
}

impl Workspace {
    fn new(extra: &str) -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("sales.csv"), sales_csv()).unwrap();
        fs::write(dir.path().join("inventory.csv"), INVENTORY_CSV).unwrap();

        let ini = format!(
            "[data]\nsales_path = {}\ninventory_path = {}\noutput_dir = {}\n{}",
            dir.path().join("sales.csv").display(),
            dir.path().join("inventory.csv").display(),
            dir.path().join("out").display(),
            extra
        );
        let config = write_temp_ini(&ini);
        Self { dir, config }
    }

    fn config_path(&self) -> std::path::PathBuf {
        self.config.path().to_path_buf()
    }

    fn out(&self, file: &str) -> std::path::PathBuf {
        self.dir.path().join("out").join(file)
    }

    fn inventory(&self) -> String {
        fs::read_to_string(self.dir.path().join("inventory.csv")).unwrap()
    }
}

fn run(command: Command) -> ExitCode {
    cli::run(Cli { command })
}

fn data_rows(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .skip(1)
        .map(str::to_string)
        .collect()
}

mod config_loading {
    use super::*;

    #[test]
    fn build_plan_config_uses_defaults() {
        let adapter = FileConfigAdapter::from_string("[data]\n").unwrap();
        let config = cli::build_plan_config(&adapter).unwrap();

        assert_eq!(config.horizon_days, 7);
        assert_eq!(config.model.min_observations, 10);
        assert_eq!(config.model.max_iterations, 500);
        assert_eq!(config.matcher.surplus_threshold, 30);
        assert_eq!(config.matcher.shortage_threshold, -20);
    }

    #[test]
    fn build_plan_config_custom_values() {
        let ini = r#"
[forecast]
horizon_days = 14
min_observations = 20
max_iterations = 1000

[matcher]
surplus_threshold = 10
shortage_threshold = -5
"#;
        let adapter = FileConfigAdapter::from_string(ini).unwrap();
        let config = cli::build_plan_config(&adapter).unwrap();

        assert_eq!(config.horizon_days, 14);
        assert_eq!(config.model.min_observations, 20);
        assert_eq!(config.model.max_iterations, 1000);
        assert_eq!(config.matcher.surplus_threshold, 10);
        assert_eq!(config.matcher.shortage_threshold, -5);
    }

    #[test]
    fn build_plan_config_rejects_negative_horizon() {
        let adapter = FileConfigAdapter::from_string("[forecast]\nhorizon_days = -1\n").unwrap();
        let err = cli::build_plan_config(&adapter).unwrap_err();
        assert!(matches!(err, StockshiftError::ConfigInvalid { key, .. } if key == "horizon_days"));
    }

    #[test]
    fn build_plan_config_rejects_mistyped_threshold() {
        let adapter =
            FileConfigAdapter::from_string("[matcher]\nsurplus_threshold = 3O\n").unwrap();
        let err = cli::build_plan_config(&adapter).unwrap_err();
        assert!(
            matches!(err, StockshiftError::ConfigInvalid { key, .. } if key == "surplus_threshold")
        );
    }

    #[test]
    fn build_live_config_defaults_and_overrides() {
        let defaults = FileConfigAdapter::from_string("[live]\n").unwrap();
        let config = cli::build_live_config(&defaults).unwrap();
        assert_eq!(config.low_threshold, 50);
        assert_eq!(config.move_qty, 40);

        let custom =
            FileConfigAdapter::from_string("[live]\nlow_threshold = 25\nmove_qty = 10\n").unwrap();
        let config = cli::build_live_config(&custom).unwrap();
        assert_eq!(config.low_threshold, 25);
        assert_eq!(config.move_qty, 10);
    }

    #[test]
    fn load_config_missing_file() {
        let result = cli::load_config(&"/nonexistent/stockshift.ini".into());
        assert_eq!(result.err(), Some(ExitCode::from(2)));
    }
}

mod commands {
    use super::*;

    #[test]
    fn plan_writes_three_tables() {
        let ws = Workspace::new("");
        let code = run(Command::Plan {
            config: ws.config_path(),
            output_dir: None,
        });
        assert_eq!(code, ExitCode::SUCCESS);

        let forecasts = data_rows(&ws.out(FORECAST_FILE));
        assert_eq!(
            forecasts,
            vec!["Factory,P1,35", "Shop_A,P1,70", "Shop_B,P1,70"]
        );

        let gaps = data_rows(&ws.out(GAP_FILE));
        assert_eq!(gaps, vec!["Shop_A,P1,-35", "Shop_B,P1,-10", "Factory,P1,105"]);

        let transfers = data_rows(&ws.out(TRANSFER_FILE));
        assert_eq!(transfers.len(), 1);
        assert!(transfers[0].starts_with("Factory,Shop_A,P1,35,"));
    }

    #[test]
    fn plan_output_dir_override() {
        let ws = Workspace::new("");
        let alt = ws.dir.path().join("alt");
        let code = run(Command::Plan {
            config: ws.config_path(),
            output_dir: Some(alt.clone()),
        });

        assert_eq!(code, ExitCode::SUCCESS);
        assert!(alt.join(TRANSFER_FILE).exists());
        assert!(!ws.out(TRANSFER_FILE).exists());
    }

    #[test]
    fn plan_with_custom_thresholds() {
        let ws = Workspace::new("[matcher]\nsurplus_threshold = 30\nshortage_threshold = -5\n");
        let code = run(Command::Plan {
            config: ws.config_path(),
            output_dir: None,
        });
        assert_eq!(code, ExitCode::SUCCESS);

        // Shop_B's -10 now counts as a shortage and draws on Factory's remainder.
        let transfers = data_rows(&ws.out(TRANSFER_FILE));
        assert_eq!(transfers.len(), 2);
        assert!(transfers[1].starts_with("Factory,Shop_B,P1,10,"));
    }

    #[test]
    fn forecast_writes_only_forecast_table() {
        let ws = Workspace::new("");
        let code = run(Command::Forecast {
            config: ws.config_path(),
            output_dir: None,
        });

        assert_eq!(code, ExitCode::SUCCESS);
        assert!(ws.out(FORECAST_FILE).exists());
        assert!(!ws.out(GAP_FILE).exists());
    }

    #[test]
    fn invalid_config_fails_with_config_exit_code() {
        let ws = Workspace::new("[matcher]\nshortage_threshold = 15\n");
        let code = run(Command::Plan {
            config: ws.config_path(),
            output_dir: None,
        });
        assert_eq!(code, ExitCode::from(2));
    }

    #[test]
    fn mistyped_number_fails_with_config_exit_code() {
        let ws = Workspace::new("[forecast]\nhorizon_days = seven\n");
        let code = run(Command::Plan {
            config: ws.config_path(),
            output_dir: None,
        });
        assert_eq!(code, ExitCode::from(2));
        assert!(!ws.out(FORECAST_FILE).exists());
    }

    #[test]
    fn plan_without_matches_still_writes_headers() {
        let ws = Workspace::new("[matcher]\nsurplus_threshold = 1000\n");
        let code = run(Command::Plan {
            config: ws.config_path(),
            output_dir: None,
        });
        assert_eq!(code, ExitCode::SUCCESS);
        assert_eq!(
            fs::read_to_string(ws.out(TRANSFER_FILE)).unwrap(),
            "from_store,to_store,product,quantity,reason\n"
        );
    }

    #[test]
    fn malformed_inventory_fails_with_record_exit_code() {
        let ws = Workspace::new("");
        fs::write(
            ws.dir.path().join("inventory.csv"),
            "store,product,units_in_stock\nShop_A,P1,-4\n",
        )
        .unwrap();

        let code = run(Command::Plan {
            config: ws.config_path(),
            output_dir: None,
        });
        assert_eq!(code, ExitCode::from(4));
    }

    #[test]
    fn suggest_and_summary_succeed() {
        let ws = Workspace::new("");
        assert_eq!(
            run(Command::Suggest {
                config: ws.config_path()
            }),
            ExitCode::SUCCESS
        );
        assert_eq!(
            run(Command::Summary {
                config: ws.config_path()
            }),
            ExitCode::SUCCESS
        );
    }

    #[test]
    fn validate_succeeds_on_valid_config() {
        let ws = Workspace::new("[live]\nlow_threshold = 30\n");
        assert_eq!(
            run(Command::Validate {
                config: ws.config_path()
            }),
            ExitCode::SUCCESS
        );
    }
}

mod transfers {
    use super::*;

    fn transfer(ws: &Workspace, from: &str, to: &str, qty: u32, dry_run: bool) -> ExitCode {
        run(Command::Transfer {
            config: ws.config_path(),
            from: from.into(),
            to: to.into(),
            product: "P2".into(),
            qty,
            dry_run,
        })
    }

    #[test]
    fn transfer_rewrites_inventory() {
        let ws = Workspace::new("");
        assert_eq!(transfer(&ws, "Factory", "Shop_C", 40, false), ExitCode::SUCCESS);

        let inventory = read_inventory(ws.inventory().as_bytes()).unwrap();
        assert_eq!(inventory.get("Factory", "P2"), Some(180));
        assert_eq!(inventory.get("Shop_C", "P2"), Some(60));
        assert_eq!(inventory.get("Shop_A", "P1"), Some(35));
    }

    #[test]
    fn dry_run_leaves_inventory_untouched() {
        let ws = Workspace::new("");
        assert_eq!(transfer(&ws, "Factory", "Shop_C", 40, true), ExitCode::SUCCESS);
        assert_eq!(ws.inventory(), INVENTORY_CSV);
    }

    #[test]
    fn insufficient_stock_is_rejected() {
        let ws = Workspace::new("");
        assert_eq!(transfer(&ws, "Shop_C", "Factory", 21, false), ExitCode::from(5));
        assert_eq!(ws.inventory(), INVENTORY_CSV);
    }
}
