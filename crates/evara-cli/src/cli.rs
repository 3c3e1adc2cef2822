use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "evara")]
#[command(about = "Plan a wedding from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Optional path to local database file
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// Optional path to the config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage the guest list
    #[command(alias = "guest")]
    Guests {
        #[command(subcommand)]
        command: GuestCommands,
    },
    /// Manage the vendor directory
    #[command(alias = "vendor")]
    Vendors {
        #[command(subcommand)]
        command: VendorCommands,
    },
    /// Manage the wedding checklist
    #[command(alias = "task")]
    Tasks {
        #[command(subcommand)]
        command: TaskCommands,
    },
    /// Manage the wedding calendar
    #[command(alias = "event")]
    Events {
        #[command(subcommand)]
        command: EventCommands,
    },
    /// Ask the planning assistant a question
    Ask {
        /// Question text; prints the greeting and suggestions when omitted
        question: Vec<String>,
    },
    /// Sync local replica with remote Turso database
    Sync,
    /// Show or write the planner config file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

#[derive(Subcommand)]
pub enum GuestCommands {
    /// List guests
    List {
        /// RSVP filter: all, pending, confirmed or declined
        #[arg(long, default_value = "all")]
        rsvp: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a guest
    Add {
        /// Guest name
        name: Vec<String>,
        /// RSVP status
        #[arg(long, value_name = "STATUS")]
        rsvp: Option<String>,
        #[arg(long, value_name = "TEXT")]
        dietary: Option<String>,
        /// Name of the guest's plus-one
        #[arg(long, value_name = "NAME")]
        plus_one: Option<String>,
    },
    /// Edit a guest; pass an empty value to clear an optional field
    Edit {
        /// Guest ID or unique ID prefix
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, value_name = "STATUS")]
        rsvp: Option<String>,
        #[arg(long, value_name = "TEXT")]
        dietary: Option<String>,
        #[arg(long, value_name = "NAME")]
        plus_one: Option<String>,
    },
    /// Remove a guest
    #[command(alias = "rm")]
    Remove {
        /// Guest ID or unique ID prefix
        id: String,
    },
    /// Show RSVP totals
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Contact fields shared by `vendors add` and `vendors edit`
#[derive(Args)]
pub struct VendorFields {
    #[arg(long, value_name = "TEXT")]
    pub description: Option<String>,
    #[arg(long, value_name = "PHONE")]
    pub phone: Option<String>,
    #[arg(long, value_name = "EMAIL")]
    pub email: Option<String>,
    /// Portfolio image URL
    #[arg(long, value_name = "URL")]
    pub image: Option<String>,
}

#[derive(Subcommand)]
pub enum VendorCommands {
    /// List vendors
    List {
        /// Service type to show, or "all"
        #[arg(long, default_value = "all")]
        service: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a vendor
    Add {
        /// Vendor name
        name: Vec<String>,
        /// Service type, e.g. Photography
        #[arg(long, value_name = "TYPE")]
        service: String,
        #[command(flatten)]
        fields: VendorFields,
    },
    /// Edit a vendor; pass an empty value to clear an optional field
    Edit {
        /// Vendor ID or unique ID prefix
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, value_name = "TYPE")]
        service: Option<String>,
        #[command(flatten)]
        fields: VendorFields,
    },
    /// Remove a vendor
    #[command(alias = "rm")]
    Remove {
        /// Vendor ID or unique ID prefix
        id: String,
    },
    /// List the distinct service types in the directory
    Services,
}

/// Optional task fields shared by `tasks add` and `tasks edit`
#[derive(Args)]
pub struct TaskFields {
    #[arg(long)]
    pub category: Option<String>,
    /// Due date, e.g. 2026-05-01
    #[arg(long, value_name = "DATE")]
    pub due: Option<String>,
    #[arg(long, value_name = "TEXT")]
    pub description: Option<String>,
    #[arg(long, value_name = "NAME")]
    pub assigned_to: Option<String>,
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// List tasks grouped by category
    List {
        /// Completion filter: all, completed or pending
        #[arg(long, default_value = "all")]
        status: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a task
    Add {
        /// Task name
        name: Vec<String>,
        #[command(flatten)]
        fields: TaskFields,
    },
    /// Edit a task; pass an empty value to clear an optional field
    Edit {
        /// Task ID or unique ID prefix
        id: String,
        #[arg(long)]
        name: Option<String>,
        /// Completion status: pending or completed
        #[arg(long)]
        status: Option<String>,
        #[command(flatten)]
        fields: TaskFields,
    },
    /// Flip a task between pending and completed
    #[command(alias = "done")]
    Toggle {
        /// Task ID or unique ID prefix
        id: String,
    },
    /// Remove a task
    #[command(alias = "rm")]
    Remove {
        /// Task ID or unique ID prefix
        id: String,
    },
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum EventWindow {
    #[default]
    All,
    Upcoming,
    Past,
}

/// Optional event fields shared by `events add` and `events edit`
#[derive(Args)]
pub struct EventFields {
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long, value_name = "TEXT")]
    pub description: Option<String>,
    /// Event image URL
    #[arg(long, value_name = "URL")]
    pub image: Option<String>,
    /// Link for the event, e.g. a livestream or RSVP page
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,
}

#[derive(Subcommand)]
pub enum EventCommands {
    /// List events in date order
    List {
        #[arg(long, value_enum, default_value_t = EventWindow::All)]
        when: EventWindow,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add an event
    Add {
        /// Event title
        title: Vec<String>,
        /// Start time, e.g. 2026-06-20T15:30
        #[arg(long, value_name = "DATETIME")]
        at: String,
        #[command(flatten)]
        fields: EventFields,
    },
    /// Edit an event; pass an empty value to clear an optional field
    Edit {
        /// Event ID or unique ID prefix
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, value_name = "DATETIME")]
        at: Option<String>,
        #[command(flatten)]
        fields: EventFields,
    },
    /// Remove an event
    #[command(alias = "rm")]
    Remove {
        /// Event ID or unique ID prefix
        id: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the resolved configuration
    Show,
    /// Create or update the config file
    Init {
        /// Assistant reply delay in milliseconds
        #[arg(long, value_name = "MS")]
        reply_delay_ms: Option<u64>,
        /// Default vendor portfolio image URL
        #[arg(long, value_name = "URL")]
        vendor_image: Option<String>,
        /// Default event image URL
        #[arg(long, value_name = "URL")]
        event_image: Option<String>,
        /// Database file to store in the config
        #[arg(long, value_name = "PATH")]
        database: Option<PathBuf>,
        /// Remote libSQL URL for `evara sync`
        #[arg(long, value_name = "URL")]
        sync_url: Option<String>,
    },
}
