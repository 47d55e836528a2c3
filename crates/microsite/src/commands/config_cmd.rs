//! Config subcommand handlers.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::Context;

pub fn handle(ctx: &Context, args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let rendered = toml::to_string_pretty(&ctx.config)?;
            let mut out = format!("# {}\n", ctx.config_path.display());
            out.push_str(&rendered);
            if ctx.config.override_url.is_empty() {
                out.push_str("\n# no [override_url] entries: status and update will refuse to run\n");
            }
            output::print_output(out.trim_end(), global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&ctx.config_path.display().to_string(), global.quiet);
            Ok(())
        }
    }
}
