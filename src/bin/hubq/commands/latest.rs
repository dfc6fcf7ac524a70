//! `hubq latest` command

use anyhow::Result;

use hubq::core::InterfaceReference;
use hubq::util::GlobalContext;

use crate::cli::LatestArgs;

pub fn execute(args: LatestArgs, ctx: &GlobalContext) -> Result<()> {
    let source = ctx.open_source()?;

    let iface = InterfaceReference::latest(args.path);
    let revision = source.get_interface_latest_revision_string(&iface)?;
    println!("{}", revision);

    Ok(())
}
