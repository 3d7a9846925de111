use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

pub mod migrate; // use submodule at src/config/migrate.rs

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    pub tenant_code: String,
    pub project_code: String,
    #[serde(default = "default_session_ttl")]
    pub session_ttl_minutes: i64,
    #[serde(default = "default_retry_count")]
    pub identity_retry_count: u32,
    #[serde(default = "default_retry_interval")]
    pub identity_retry_interval_ms: u64,
    #[serde(default = "default_clear_progress_on_logout")]
    pub clear_progress_on_logout: bool,
    #[serde(default = "default_otp_length")]
    pub otp_length: usize,
    #[serde(default = "default_separator_char")]
    pub separator_char: String,
}

fn default_session_ttl() -> i64 {
    720
}
fn default_retry_count() -> u32 {
    3
}
fn default_retry_interval() -> u64 {
    200
}
fn default_clear_progress_on_logout() -> bool {
    true
}
fn default_otp_length() -> usize {
    6
}
fn default_separator_char() -> String {
    "-".to_string()
}

impl Default for Config {
    fn default() -> Self {
        let db_path = Self::database_file();
        Self {
            database: db_path.to_string_lossy().to_string(),
            tenant_code: "acme".to_string(),
            project_code: "retail".to_string(),
            session_ttl_minutes: default_session_ttl(),
            identity_retry_count: default_retry_count(),
            identity_retry_interval_ms: default_retry_interval(),
            clear_progress_on_logout: default_clear_progress_on_logout(),
            otp_length: default_otp_length(),
            separator_char: default_separator_char(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("fieldlog")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".fieldlog")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("fieldlog.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("fieldlog.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> Self {
        let path = Self::config_file();

        if path.exists() {
            let content = fs::read_to_string(&path).expect("❌ Failed to read configuration file");
            serde_yaml::from_str(&content).expect("❌ Failed to parse configuration file")
        } else {
            Config::default()
        }
    }

    /// Initialize configuration and database files
    pub fn init_all(custom_name: Option<String>, is_test: bool) -> io::Result<()> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        // DB name: user provided or default
        let db_path = if let Some(name) = custom_name {
            let p = std::path::Path::new(&name);
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                dir.join(p)
            }
        } else {
            Self::database_file()
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        // Write config file
        if !is_test {
            let yaml = serde_yaml::to_string(&config).unwrap();
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        // Create empty DB file if not exists
        if !db_path.exists() {
            fs::File::create(&db_path)?;
        }

        println!("✅ Database:    {:?}", db_path);

        Ok(())
    }
}
