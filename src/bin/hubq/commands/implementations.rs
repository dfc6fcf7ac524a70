//! `hubq implementations` command

use anyhow::{bail, Context, Result};

use hubq::core::{InterfaceReference, TypeReference};
use hubq::resolver::ImplementationRevisionFilter;
use hubq::util::GlobalContext;

use crate::cli::ImplementationsArgs;
use crate::commands::print_json;

pub fn execute(args: ImplementationsArgs, ctx: &GlobalContext) -> Result<()> {
    let filter = build_filter(&args)?;
    let source = ctx.open_source()?;

    let revisions = match args.interface {
        Some(path) => {
            let iface = InterfaceReference::new(path, args.revision.unwrap_or_default());
            source
                .list_implementation_revisions_for_interface(&iface, &filter)
                .with_context(|| format!("failed to list Implementations of {}", iface))?
        }
        None => source
            .list_implementation_revisions(&filter)
            .context("failed to list Implementations")?,
    };

    tracing::debug!("{} Implementation revisions match", revisions.len());

    print_json(&revisions)
}

fn build_filter(args: &ImplementationsArgs) -> Result<ImplementationRevisionFilter> {
    let mut filter = ImplementationRevisionFilter::new();

    if let Some(pattern) = &args.path_pattern {
        filter = filter.with_path_pattern(pattern.as_str());
    }
    for attr in &args.require_attr {
        let (path, revision) = split_attribute(attr);
        filter = filter.require_attribute(path, revision);
    }
    for attr in &args.reject_attr {
        let (path, revision) = split_attribute(attr);
        filter = filter.reject_attribute(path, revision);
    }

    if !args.satisfied_by.is_empty() {
        let mut types = Vec::with_capacity(args.satisfied_by.len());
        for arg in &args.satisfied_by {
            match arg.split_once(':') {
                Some((path, revision)) if !path.is_empty() => {
                    types.push(TypeReference::new(path, revision))
                }
                _ => bail!("invalid type reference `{}`: expected PATH:REVISION", arg),
            }
        }
        filter = filter.satisfied_by(types);
    }

    Ok(filter)
}

/// Split `PATH[:REVISION]`.
fn split_attribute(arg: &str) -> (&str, Option<String>) {
    match arg.split_once(':') {
        Some((path, revision)) if !revision.is_empty() => (path, Some(revision.to_string())),
        Some((path, _)) => (path, None),
        None => (arg, None),
    }
}
