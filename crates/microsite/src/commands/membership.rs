//! Membership command handler: which micro sites a content entity is on.

use std::fmt::Write;

use microsite_core::membership::{self, CACHE_CONTEXTS};
use microsite_core::{ContentEntity, MembershipOptions, Site, SiteId, SiteMembership};

use crate::cli::{GlobalOpts, MembershipArgs};
use crate::error::CliError;
use crate::output;

use super::{Context, util};

fn site_line(site: &Site) -> String {
    format!("{} (ID:{}, {})", site.label, site.id, site.base_url())
}

fn detail(m: &SiteMembership) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Entity:      {}", m.entity);
    if let Some(ref active) = m.active_site {
        let _ = writeln!(out, "Active site: {}", site_line(active));
    }
    let main = m.main_site.as_ref().map_or_else(|| "-".into(), site_line);
    let _ = writeln!(out, "Main site:   {main}");
    if m.other_sites.is_empty() {
        let _ = writeln!(out, "Other sites: -");
    } else {
        let _ = writeln!(out, "Other sites:");
        for site in &m.other_sites {
            let _ = writeln!(out, "  - {}", site_line(site));
        }
    }
    let all = if m.all_sites_label.is_empty() { "No" } else { m.all_sites_label.as_str() };
    let _ = writeln!(out, "All sites:   {all}");
    let _ = writeln!(out, "Cache tags:  {}", m.cache_tags.join(", "));
    let _ = write!(out, "Cache ctx:   {}", CACHE_CONTEXTS.join(", "));
    out
}

pub fn handle(ctx: &Context, args: &MembershipArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let entity: ContentEntity = util::read_json_file(&args.entity)?;
    let options = MembershipOptions {
        active_site: args
            .active_site
            .as_deref()
            .map(str::parse::<SiteId>)
            .transpose()
            .map_err(|e| ctx.explain(e))?,
        display_active_site: args.display_active_site,
    };

    let sites = ctx.open_sites()?;
    let resolved =
        membership::resolve(&entity, &sites, &options).map_err(|e| ctx.explain(e))?;

    let out = output::render_single(&ctx.format, &resolved, detail, |m| {
        m.main_site
            .iter()
            .chain(&m.other_sites)
            .map(|s| s.id.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
