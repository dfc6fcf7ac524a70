//! `hubq interface` command

use anyhow::{Context, Result};

use hubq::core::InterfaceReference;
use hubq::util::GlobalContext;

use crate::cli::InterfaceArgs;
use crate::commands::print_json;

pub fn execute(args: InterfaceArgs, ctx: &GlobalContext) -> Result<()> {
    let source = ctx.open_source()?;

    let iface = InterfaceReference::new(args.path, args.revision.unwrap_or_default());
    let revision = source
        .find_interface_revision(&iface)
        .with_context(|| format!("failed to find Interface {}", iface))?;

    if revision.is_none() {
        tracing::info!("Interface {} not found in {}", iface, source.name());
    }

    print_json(&revision)
}
