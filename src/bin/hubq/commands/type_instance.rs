//! `hubq type-instance` command

use anyhow::{bail, Result};

use hubq::util::GlobalContext;

use crate::cli::TypeInstanceArgs;
use crate::commands::print_json;

pub fn execute(args: TypeInstanceArgs, ctx: &GlobalContext) -> Result<()> {
    if !ctx.config().local.load_type_instances {
        bail!("TypeInstances are not loaded\nhelp: pass --type-instances");
    }

    let source = ctx.open_local_source()?;

    match args.id {
        Some(id) => print_json(&source.find_type_instance(&id)),
        None => print_json(&source.list_type_instances_type_ref()),
    }
}
