//! Clap derive structures for the `climadesk` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! Depends on clap only, so `build.rs` can include it for man pages.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// climadesk -- front-desk CLI for hotel room climate control and billing
#[derive(Debug, Parser)]
#[command(
    name = "climadesk",
    version,
    about = "Hotel room climate control and billing from the command line",
    long_about = "Drive the hotel climate-control backend: room status, bills,\n\
        check-in/out, per-room AC commands, usage reports, and replayable\n\
        time-sliced AC schedules.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend profile to use
    #[arg(long, short = 'p', env = "CLIMADESK_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Backend base URL, e.g. http://localhost:8080/api (overrides profile)
    #[arg(long, short = 's', env = "CLIMADESK_SERVER", global = true)]
    pub server: Option<String>,

    /// Bearer token sent with every request
    #[arg(long, env = "CLIMADESK_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "CLIMADESK_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "CLIMADESK_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "CLIMADESK_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FanSpeedArg {
    Low,
    #[value(alias = "mid")]
    Medium,
    High,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Authenticate a front-desk or manager account
    Login(LoginArgs),

    /// Room status
    #[command(alias = "r")]
    Rooms(RoomsArgs),

    /// Room bills
    Bills(BillsArgs),

    /// Check guests in and out
    Stays(StaysArgs),

    /// Control a room's air conditioner
    Ac(AcArgs),

    /// Usage and per-room reports
    Reports(ReportsArgs),

    /// Resolve application locations to views
    Routes(RoutesArgs),

    /// Replay time-sliced AC schedules
    #[command(alias = "sched")]
    Schedule(ScheduleArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Login ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account name (defaults to the profile's account)
    #[arg(long, short = 'a')]
    pub account: Option<String>,
}

// ── Rooms ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RoomsArgs {
    #[command(subcommand)]
    pub command: RoomsCommand,
}

#[derive(Debug, Subcommand)]
pub enum RoomsCommand {
    /// Status of every room
    #[command(alias = "ls")]
    List,

    /// Status of one room
    Status {
        /// Room number, e.g. 203
        room: String,
    },
}

// ── Bills ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct BillsArgs {
    #[command(subcommand)]
    pub command: BillsCommand,
}

#[derive(Debug, Subcommand)]
pub enum BillsCommand {
    /// Bill totals for a room's current or last stay
    Summary {
        /// Room number
        room: String,
    },

    /// Itemized AC charges for a room's current or last stay
    Detail {
        /// Room number
        room: String,
    },
}

// ── Stays ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct StaysArgs {
    #[command(subcommand)]
    pub command: StaysCommand,
}

#[derive(Debug, Subcommand)]
pub enum StaysCommand {
    /// Open a stay for a guest
    CheckIn {
        /// Room number
        room: String,

        /// Guest name
        #[arg(long, short = 'g')]
        guest: String,

        /// Guest identity document number
        #[arg(long)]
        id_number: Option<String>,

        /// Guest phone number
        #[arg(long)]
        phone: Option<String>,
    },

    /// Close the room's open stay
    CheckOut {
        /// Room number
        room: String,

        /// Stay identifier, when the backend requires one
        #[arg(long)]
        stay: Option<String>,
    },
}

// ── AC ───────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AcArgs {
    #[command(subcommand)]
    pub command: AcCommand,
}

#[derive(Debug, Subcommand)]
pub enum AcCommand {
    /// Power the unit on
    On {
        /// Room number
        room: String,
    },

    /// Power the unit off
    Off {
        /// Room number
        room: String,
    },

    /// Set fan speed
    Speed {
        /// Room number
        room: String,

        #[arg(value_enum)]
        speed: FanSpeedArg,
    },

    /// Set target temperature in °C
    #[command(alias = "temperature")]
    Temp {
        /// Room number
        room: String,

        /// Target temperature (bounded by the profile, default 16-30)
        #[arg(allow_negative_numbers = true)]
        celsius: f64,
    },

    /// Send commands in order (on, off, speed=high, temp=22)
    Send {
        /// Room number
        room: String,

        /// Commands in short form
        #[arg(required = true, num_args = 1..)]
        commands: Vec<String>,
    },
}

// ── Reports ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ReportsArgs {
    #[command(subcommand)]
    pub command: ReportsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ReportsCommand {
    /// Aggregate usage over [from, to)
    Usage {
        /// Range start (RFC 3339 or YYYY-MM-DD, UTC)
        #[arg(long, requires = "to", conflicts_with = "last")]
        from: Option<String>,

        /// Range end, exclusive (RFC 3339 or YYYY-MM-DD, UTC)
        #[arg(long, requires = "from")]
        to: Option<String>,

        /// Range ending now, e.g. 24h, 7d (default: 24h)
        #[arg(long)]
        last: Option<String>,
    },

    /// Usage counters and AC state for one room
    Room {
        /// Room number
        room: String,
    },
}

// ── Routes ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RoutesArgs {
    #[command(subcommand)]
    pub command: RoutesCommand,
}

#[derive(Debug, Subcommand)]
pub enum RoutesCommand {
    /// List registered routes
    #[command(alias = "ls")]
    List,

    /// Resolve a location such as /aircon/203
    Resolve {
        location: String,
    },

    /// Canonical path for a view
    Href {
        /// View name, e.g. ac-panel, front-desk, monitor
        view: String,

        /// Room number, for views that need one
        #[arg(long)]
        room: Option<String>,
    },
}

// ── Schedule ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ScheduleArgs {
    #[command(subcommand)]
    pub command: ScheduleCommand,
}

#[derive(Debug, Args)]
pub struct ScheduleSource {
    /// Schedule file (TOML); the built-in acceptance plan when omitted
    #[arg(long, short = 'f')]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum ScheduleCommand {
    /// Execute a schedule against the backend
    Run {
        #[command(flatten)]
        source: ScheduleSource,

        /// Seconds between slices (overrides the schedule)
        #[arg(long)]
        interval: Option<u64>,

        /// Milliseconds between a room's commands (overrides the schedule)
        #[arg(long)]
        gap_ms: Option<u64>,
    },

    /// Print a schedule without running it
    Show {
        #[command(flatten)]
        source: ScheduleSource,
    },

    /// Write the acceptance plan as TOML, as a starting point
    Export,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Set a value on the active profile
    Set {
        /// Key: server, account, password_env, timeout, insecure, ca_cert,
        /// min_temperature, max_temperature
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store the active profile's password in the system keyring
    SetPassword,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
