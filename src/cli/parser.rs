use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for fieldlog
/// CLI application to track outlet attendance with SQLite
#[derive(Parser)]
#[command(
    name = "fieldlog",
    version = env!("CARGO_PKG_VERSION"),
    about = "Field-staff attendance CLI: geofenced outlet check-in/out and session-scoped survey progress",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or verify)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(long = "migrate", help = "Run configuration file migrations if needed")]
        migrate: bool,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Open a login session on this device
    Login {
        /// Staff user id
        user_id: String,

        #[arg(long = "marker", help = "Use a fixed session marker instead of a random one")]
        marker: Option<String>,

        #[arg(long = "ttl", help = "Session lifetime in minutes (default from config)")]
        ttl: Option<i64>,
    },

    /// Close the device session and clear session-scoped survey progress
    Logout,

    /// Manage outlet reference data
    Outlet {
        #[command(subcommand)]
        action: OutletAction,
    },

    /// Manage the work shift at an outlet
    Shift {
        #[command(subcommand)]
        action: ShiftAction,
    },

    /// Record a geofenced check-in for the active shift
    Checkin {
        #[arg(long = "lat", allow_hyphen_values = true, help = "Observed latitude in decimal degrees")]
        lat: f64,

        #[arg(long = "lng", allow_hyphen_values = true, help = "Observed longitude in decimal degrees")]
        lng: f64,

        #[arg(long = "outlet", help = "Require the active shift to be at this outlet")]
        outlet: Option<String>,
    },

    /// Record a geofenced check-out for the active shift
    Checkout {
        #[arg(long = "lat", allow_hyphen_values = true, help = "Observed latitude in decimal degrees")]
        lat: f64,

        #[arg(long = "lng", allow_hyphen_values = true, help = "Observed longitude in decimal degrees")]
        lng: f64,

        #[arg(long = "outlet", help = "Require the active shift to be at this outlet")]
        outlet: Option<String>,
    },

    /// Walk through a survey/gift flow step by step
    Survey {
        /// Flow name (gift-progress, survey-progress)
        flow: String,

        #[command(subcommand)]
        action: SurveyAction,
    },

    /// List attendance events and shifts
    List {
        #[arg(long = "date", help = "Filter by date (YYYY-MM-DD)")]
        date: Option<String>,

        #[arg(long = "events", help = "Show attendance events only")]
        events: bool,

        #[arg(long = "shifts", help = "Show shifts only")]
        shifts: bool,
    },

    /// Export attendance events
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(
            long,
            value_name = "RANGE",
            help = "Filter export by year/month/day or a custom range"
        )]
        range: Option<String>,

        #[arg(long, short = 'f')]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum OutletAction {
    /// Register an outlet with its geofence
    Add {
        /// Outlet id (short code)
        id: String,

        #[arg(long = "name", help = "Display name")]
        name: String,

        #[arg(long = "lat", allow_hyphen_values = true, help = "Center latitude in decimal degrees")]
        lat: f64,

        #[arg(long = "lng", allow_hyphen_values = true, help = "Center longitude in decimal degrees")]
        lng: f64,

        #[arg(long = "radius", help = "Allowed check-in radius in meters")]
        radius: u32,
    },

    /// List registered outlets
    List,
}

#[derive(Subcommand)]
pub enum ShiftAction {
    /// Start a shift at an outlet
    Start {
        #[arg(long = "outlet", help = "Outlet id to work at")]
        outlet: String,
    },

    /// End the active shift
    End,

    /// Show the active shift, if any
    Status,
}

#[derive(Subcommand)]
pub enum SurveyAction {
    /// Move to the next step
    Advance,

    /// Jump to a named step (no forward skips)
    Goto { step: String },

    /// Show current step and history
    Show,
}
