//! Site command handlers.

use tabled::Tabled;

use microsite_core::{CoreError, NewSite, Scheme, Site, SiteDirectory, SiteId};

use crate::cli::{GlobalOpts, SitesArgs, SitesCommand};
use crate::error::CliError;
use crate::output;

use super::{Context, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct SiteRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Type")]
    site_type: String,
    #[tabled(rename = "Name")]
    label: String,
    #[tabled(rename = "Site URL")]
    site_url: String,
    #[tabled(rename = "HTTPS")]
    https: String,
}

impl From<&Site> for SiteRow {
    fn from(s: &Site) -> Self {
        Self {
            id: s.id.to_string(),
            site_type: s.site_type.clone(),
            label: s.label.clone(),
            site_url: s.site_url.clone(),
            https: s.site_scheme.yes_no().into(),
        }
    }
}

fn detail(site: &Site) -> String {
    [
        format!("ID:       {}", site.id),
        format!("Name:     {}", site.label),
        format!("Type:     {}", site.site_type),
        format!("URL:      {}", site.base_url()),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(ctx: &Context, args: SitesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        SitesCommand::List(list) => {
            let filter = util::filter(ctx, list.types.as_deref(), None)?;
            let sites = ctx.open_sites()?.list(&filter)?;
            let out = output::render_list(
                &ctx.format,
                &sites,
                |s| SiteRow::from(s),
                |s| s.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SitesCommand::Get { id } => {
            let id: SiteId = id.parse().map_err(|e| ctx.explain(e))?;
            let site = ctx
                .open_sites()?
                .get(id)?
                .ok_or_else(|| ctx.explain(CoreError::SiteNotFound { id }))?;
            let out = output::render_single(&ctx.format, &site, detail, |s| s.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SitesCommand::Add {
            site_type,
            url,
            label,
            https,
        } => {
            let draft = NewSite {
                site_type,
                label: label.unwrap_or_else(|| url.clone()),
                site_url: url,
                site_scheme: Scheme::from(https),
            };
            draft.validate().map_err(|e| ctx.explain(e))?;

            let site = ctx.open_sites()?.create(draft)?;
            tracing::info!(site_id = %site.id, site_url = %site.site_url, "micro site created");
            let out = output::render_single(
                &ctx.format,
                &site,
                |s| format!("Micro site {} created ({})", s.id, s.base_url()),
                |s| s.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
