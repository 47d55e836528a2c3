//! Clap derive structures for the `microsite` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// microsite -- URL migration and membership tooling for micro sites
#[derive(Debug, Parser)]
#[command(
    name = "microsite",
    version,
    about = "Migrate micro site URLs and inspect site membership",
    long_about = "Administrative tool for installations serving many micro sites\n\
        from one content pool.\n\n\
        `status` previews the URL overrides from the configuration, `update`\n\
        applies them once per site, `reset` forgets which sites were migrated.",
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
    /// Configuration file (defaults to the platform config directory)
    #[arg(long, env = "MICROSITE_CONFIG", global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output format (defaults to `defaults.output` from the config file)
    #[arg(long, short = 'o', env = "MICROSITE_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

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

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List micro sites which can be updated according to the overrides
    #[command(alias = "misis", alias = "micro-site-status")]
    Status(TypesArgs),

    /// Apply the URL overrides to micro sites not yet processed
    #[command(alias = "misiup", alias = "micro-site-update")]
    Update(TypesArgs),

    /// Forget the processed status of micro sites
    ///
    /// Without TYPES or --ids the whole processed-state store is cleared.
    /// That full reset asks for confirmation first; in scripts and other
    /// non-interactive use it fails with exit code 2 unless --yes is given.
    #[command(alias = "misire", alias = "micro-site-reset")]
    Reset(ResetArgs),

    /// Manage micro site entities
    Sites(SitesArgs),

    /// Show which micro sites a content entity belongs to
    #[command(alias = "info")]
    Membership(MembershipArgs),

    /// Inspect CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  MIGRATION
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Optional site type restriction shared by the migration commands.
#[derive(Debug, Args)]
pub struct TypesArgs {
    /// Restrict to a comma-separated list of site types (e.g. generic,one_page)
    #[arg(value_name = "TYPES")]
    pub types: Option<String>,
}

#[derive(Debug, Args)]
pub struct ResetArgs {
    /// Restrict to a comma-separated list of site types
    #[arg(value_name = "TYPES")]
    pub types: Option<String>,

    /// Restrict to a comma-separated list of site IDs (e.g. 1,2,3)
    #[arg(long, value_name = "IDS")]
    pub ids: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SITES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SitesArgs {
    #[command(subcommand)]
    pub command: SitesCommand,
}

#[derive(Debug, Subcommand)]
pub enum SitesCommand {
    /// List micro sites
    #[command(alias = "ls")]
    List(TypesArgs),

    /// Show one micro site
    Get {
        /// Micro site ID
        id: String,
    },

    /// Create a micro site
    Add {
        /// Site type (bundle)
        #[arg(long = "type", value_name = "TYPE")]
        site_type: String,

        /// Hostname, e.g. one.microsite.local
        #[arg(long)]
        url: String,

        /// Display name (defaults to the hostname)
        #[arg(long)]
        label: Option<String>,

        /// Serve the site over HTTPS
        #[arg(long)]
        https: bool,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  MEMBERSHIP
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct MembershipArgs {
    /// JSON file describing the content entity
    #[arg(value_name = "ENTITY_JSON")]
    pub entity: PathBuf,

    /// ID of the micro site serving the current request
    #[arg(long, value_name = "ID")]
    pub active_site: Option<String>,

    /// Include the active site in the output
    #[arg(long)]
    pub display_active_site: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display current resolved configuration
    Show,

    /// Print the configuration file path
    Path,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
