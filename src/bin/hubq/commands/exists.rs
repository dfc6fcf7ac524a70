//! `hubq exists` command
//!
//! Checks every reference in a single batch and prints an object keyed by
//! `path:revision`. Keys are sorted, and a reference given twice appears once.

use anyhow::Result;
use serde_json::{Map, Value};

use hubq::core::ManifestReference;
use hubq::util::GlobalContext;

use crate::cli::ExistsArgs;
use crate::commands::print_json;

pub fn execute(args: ExistsArgs, ctx: &GlobalContext) -> Result<()> {
    let refs = args
        .refs
        .iter()
        .map(|s| s.parse::<ManifestReference>())
        .collect::<Result<Vec<_>, _>>()?;

    let source = ctx.open_source()?;
    let result = source.check_manifest_revisions_exist(&refs)?;

    let mut out = Map::new();
    for reference in &refs {
        let exists = result.get(reference).copied().unwrap_or(false);
        out.insert(reference.to_string(), Value::Bool(exists));
    }

    print_json(&out)
}
