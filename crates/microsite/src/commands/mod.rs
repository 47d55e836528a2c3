//! Command handlers, one module per command group.

pub mod config_cmd;
pub mod membership;
pub mod migrate;
pub mod sites;
pub mod util;

use std::path::PathBuf;

use microsite_core::{CoreError, FileSiteDirectory, FileStateStore};

use crate::cli::{Command, GlobalOpts, OutputFormat};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

/// Everything a handler needs: resolved config plus output settings.
pub struct Context {
    pub config: Config,
    pub config_path: PathBuf,
    pub format: OutputFormat,
    pub color: bool,
}

impl Context {
    pub fn load(global: &GlobalOpts) -> Result<Self, CliError> {
        let config_path = config::active_config_path(global);
        let config = config::load_config_from(&config_path)?;
        let format = config::resolve_output(global, &config)?;
        let color = output::should_color(&config::resolve_color(global, &config));
        Ok(Self {
            config,
            config_path,
            format,
            color,
        })
    }

    pub fn sites_path(&self) -> PathBuf {
        config::anchor_path(&self.config_path, &self.config.storage.sites)
    }

    pub fn state_path(&self) -> PathBuf {
        config::anchor_path(&self.config_path, &self.config.storage.state)
    }

    pub fn open_sites(&self) -> Result<FileSiteDirectory, CliError> {
        Ok(FileSiteDirectory::open(self.sites_path())?)
    }

    pub fn open_state(&self) -> Result<FileStateStore, CliError> {
        Ok(FileStateStore::open(self.state_path())?)
    }

    /// Map a domain error for display, pointing help text at the config
    /// file in use.
    pub fn explain(&self, err: CoreError) -> CliError {
        CliError::from_core(err, &self.config_path)
    }
}

pub fn dispatch(cmd: Command, ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Status(args) => migrate::status(ctx, &args, global),
        Command::Update(args) => migrate::update(ctx, &args, global),
        Command::Reset(args) => migrate::reset(ctx, &args, global),
        Command::Sites(args) => sites::handle(ctx, args, global),
        Command::Membership(args) => membership::handle(ctx, &args, global),
        Command::Config(args) => config_cmd::handle(ctx, &args, global),
        Command::Completions(_) => unreachable!("handled in main"),
    }
}
