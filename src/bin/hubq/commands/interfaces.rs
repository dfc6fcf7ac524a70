//! `hubq interfaces` command

use anyhow::{Context, Result};

use hubq::sources::ListInterfacesOptions;
use hubq::util::GlobalContext;

use crate::cli::InterfacesArgs;
use crate::commands::print_json;

pub fn execute(args: InterfacesArgs, ctx: &GlobalContext) -> Result<()> {
    let source = ctx.open_source()?;

    let mut opts = ListInterfacesOptions::default();
    if let Some(pattern) = args.path_pattern {
        opts = opts.with_path_pattern(pattern);
    }
    if args.latest {
        opts = opts.with_latest_revision();
    }
    if args.revisions {
        opts = opts.with_revisions();
    }

    let interfaces = source
        .list_interfaces(&opts)
        .context("failed to list Interfaces")?;

    print_json(&interfaces)
}
