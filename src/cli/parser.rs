use clap::{Parser, Subcommand, ValueEnum};

/// Command-line interface definition for Flow Tracker
/// CLI application to track urological health data with SQLite
#[derive(Parser)]
#[command(
    name = "flowtracker",
    version = env!("CARGO_PKG_VERSION"),
    about = "Track urination, hydration and pelvic-floor exercise logs using SQLite",
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
    /// Initialize the configuration and the database
    Init,

    /// Manage the configuration file
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for invalid fields")]
        check: bool,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(
            long = "check",
            help = "Check database integrity, including duplicate timestamps"
        )]
        check: bool,

        #[arg(
            long = "repair",
            help = "Remove duplicate-timestamp records (last write wins)"
        )]
        repair: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Add a log entry or a custom resource
    Add {
        #[command(subcommand)]
        entry: AddCommands,
    },

    /// List log entries or custom resources
    List {
        /// What to list
        #[arg(value_enum)]
        what: ListTarget,
    },

    /// Delete a record by its timestamp (or a resource by its id)
    Del {
        /// Collection to delete from
        #[arg(value_enum)]
        collection: DelTarget,

        /// Timestamp of the entry (or resource id)
        key: String,
    },

    /// Create a backup copy of the database file
    Backup {
        /// Destination file path
        #[arg(long, value_name = "FILE")]
        file: String,

        /// Compress the backup into a zip archive
        #[arg(long)]
        compress: bool,

        /// Overwrite the destination without confirmation
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Manage the auto-backup snapshot
    Snapshot {
        #[arg(long = "create", help = "Write a fresh snapshot of all collections")]
        create: bool,

        #[arg(
            long = "restore",
            help = "Restore the snapshot (only into an empty database)"
        )]
        restore: bool,

        #[arg(long = "status", help = "Show whether a snapshot exists and its age")]
        status: bool,
    },

    /// Export all data to a portable file
    Export {
        /// Output file path (default: flow-tracker-export-<date>.json)
        #[arg(long, value_name = "FILE")]
        file: Option<String>,

        /// Export format
        #[arg(long, value_enum, default_value = "json")]
        format: ExportFormat,

        /// Overwrite the output file without confirmation
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Import a previously exported file
    Import {
        /// File to import
        file: String,

        /// Replace existing data instead of merging (destructive)
        #[arg(long)]
        replace: bool,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Clear or delete the database
    Reset {
        #[arg(
            long = "clear-data",
            help = "Delete every record but keep the database schema"
        )]
        clear_data: bool,

        #[arg(
            long = "delete-database",
            help = "Delete the database file and recreate it from scratch"
        )]
        delete_database: bool,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum AddCommands {
    /// Record a urination event
    Uro {
        /// Timestamp (RFC 3339); defaults to now
        #[arg(long = "at", value_name = "TIMESTAMP")]
        at: Option<String>,

        /// Volume in millilitres
        #[arg(long)]
        volume: f64,

        /// Duration in seconds
        #[arg(long)]
        duration: f64,

        /// Flow rate in mL/s (derived from volume/duration when omitted)
        #[arg(long = "rate")]
        flow_rate: Option<f64>,

        /// Urine color (e.g. "Pale Yellow")
        #[arg(long)]
        color: Option<String>,

        /// Urgency level (e.g. "Normal", "High")
        #[arg(long)]
        urgency: Option<String>,

        /// Concern tag; repeat for multiple
        #[arg(long = "concern")]
        concerns: Vec<String>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Record a fluid-intake event
    Hydro {
        /// Timestamp (RFC 3339); defaults to now
        #[arg(long = "at", value_name = "TIMESTAMP")]
        at: Option<String>,

        /// Beverage type (e.g. "Water", "Coffee", "Other")
        #[arg(long = "type", value_name = "BEVERAGE")]
        beverage: String,

        /// Free-form label, used when --type is "Other"
        #[arg(long = "custom")]
        custom_type: Option<String>,

        /// Amount in the configured unit
        #[arg(long)]
        amount: f64,

        /// Unit override: mL or oz (default from config)
        #[arg(long)]
        unit: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Record a pelvic-floor exercise session
    Kegel {
        /// Timestamp (RFC 3339); defaults to now
        #[arg(long = "at", value_name = "TIMESTAMP")]
        at: Option<String>,

        /// Repetitions per set
        #[arg(long)]
        reps: i64,

        /// Hold time per rep, in seconds
        #[arg(long = "hold")]
        hold_time: f64,

        /// Number of sets
        #[arg(long, default_value = "1")]
        sets: i64,

        /// Total session time in seconds (default: reps * hold * sets)
        #[arg(long = "total")]
        total_time: Option<f64>,

        /// Mark the session as not completed
        #[arg(long)]
        incomplete: bool,
    },

    /// Save a custom reference resource
    Resource {
        #[arg(long)]
        title: String,

        #[arg(long)]
        url: String,

        #[arg(long, default_value = "General")]
        category: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListTarget {
    Uro,
    Hydro,
    Kegel,
    Resources,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DelTarget {
    Uro,
    Hydro,
    Kegel,
    Resource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Csv,
}
