//! Migration command handlers: status, update, reset.

use tabled::Tabled;

use microsite_core::{Migration, ResetReport, StatusRow, UpdateReport};

use crate::cli::{GlobalOpts, ResetArgs, TypesArgs};
use crate::error::CliError;
use crate::output;

use super::{Context, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct StatusTableRow {
    #[tabled(rename = "Micro Site ID")]
    id: String,
    #[tabled(rename = "Type")]
    site_type: String,
    #[tabled(rename = "Site URL")]
    site_url: String,
    #[tabled(rename = "HTTPS")]
    https: String,
    #[tabled(rename = "Site URL (new)")]
    site_url_new: String,
    #[tabled(rename = "HTTPS (new)")]
    https_new: String,
}

impl From<&StatusRow> for StatusTableRow {
    fn from(r: &StatusRow) -> Self {
        Self {
            id: r.id.to_string(),
            site_type: r.site_type.clone(),
            site_url: r.site_url.clone(),
            https: r.https.clone(),
            site_url_new: r.site_url_new.clone(),
            https_new: r.https_new.clone(),
        }
    }
}

// ── Handlers ────────────────────────────────────────────────────────

pub fn status(ctx: &Context, args: &TypesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let filter = util::filter(ctx, args.types.as_deref(), None)?;
    let mut sites = ctx.open_sites()?;
    let mut state = ctx.open_state()?;

    let rows = Migration::new(&ctx.config.override_url, &mut sites, &mut state)
        .status(&filter)
        .map_err(|e| ctx.explain(e))?;

    let out = output::render_list(
        &ctx.format,
        &rows,
        |r| StatusTableRow::from(r),
        |r| r.id.to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

pub fn update(ctx: &Context, args: &TypesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let filter = util::filter(ctx, args.types.as_deref(), None)?;
    let mut sites = ctx.open_sites()?;
    let mut state = ctx.open_state()?;

    let report = Migration::new(&ctx.config.override_url, &mut sites, &mut state)
        .update(&filter)
        .map_err(|e| ctx.explain(e))?;

    let out = output::render_single(
        &ctx.format,
        &report,
        |r| update_summary(r, ctx.color),
        |r| r.updated().to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

pub fn reset(ctx: &Context, args: &ResetArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let filter = util::filter(ctx, args.types.as_deref(), args.ids.as_deref())?;
    if filter.is_empty()
        && !util::confirm(
            "Reset the processed status of ALL micro sites?",
            "reset",
            global.yes,
        )?
    {
        return Ok(());
    }

    let mut sites = ctx.open_sites()?;
    let mut state = ctx.open_state()?;

    let report = Migration::new(&ctx.config.override_url, &mut sites, &mut state)
        .reset(&filter)
        .map_err(|e| ctx.explain(e))?;

    let out = output::render_single(
        &ctx.format,
        &report,
        |r| reset_summary(r, ctx.color),
        |r| r.cleared().map_or_else(|| "all".into(), |n| n.to_string()),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Summaries ───────────────────────────────────────────────────────

fn update_summary(report: &UpdateReport, color: bool) -> String {
    let mut out = output::success(
        &format!("{} micro sites processed.", report.updated()),
        color,
    );
    let failed = report.failed();
    if failed > 0 {
        out.push('\n');
        out.push_str(&output::warning(
            &format!("{failed} micro sites failed and will be retried on the next update."),
            color,
        ));
    }
    out
}

fn reset_summary(report: &ResetReport, color: bool) -> String {
    let message = match report {
        ResetReport::All => "All micro sites status reset.".to_owned(),
        ResetReport::Sites { cleared, .. } => format!("{} micro sites status reset.", cleared.len()),
    };
    output::success(&message, color)
}
