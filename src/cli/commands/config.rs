use crate::cli::parser::Commands;
use crate::config::{Config, migrate};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};
use std::fs;

pub fn handle(cmd: &Commands, _cfg: &Config) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        check,
        migrate: run_migrate,
    } = cmd
    {
        let path = Config::config_file();

        //
        // 1) PRINT
        //
        if *print_config {
            if path.exists() {
                let content = fs::read_to_string(&path)?;
                println!("📄 {}\n", path.display());
                println!("{}", content);
            } else {
                warning(format!(
                    "No config file at {}: using built-in defaults.",
                    path.display()
                ));
            }
        }

        //
        // 2) CHECK
        //
        if *check {
            if !path.exists() {
                warning("No config file found. Run `fieldlog init` first.");
                return Ok(());
            }

            let missing = migrate::missing_keys(&path)?;

            if missing.is_empty() {
                success("Configuration file is complete.");
            } else {
                for key in &missing {
                    warning(format!("Missing config key: {}", key));
                }
                info("Run `fieldlog config --migrate` to add the missing keys.");
            }
        }

        //
        // 3) MIGRATE
        //
        if *run_migrate {
            let updated = migrate::run_config_migration().map_err(AppError::Io)?;
            if !updated {
                info("Config file already up to date.");
            }
        }
    }

    Ok(())
}
