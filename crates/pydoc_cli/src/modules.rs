//! The `pydoc modules` command: list what a snapshot can import

use anyhow::{bail, Context, Result};
use pydoc_etch::load_snapshot;

/// Run the modules command with the given arguments
pub fn run(args: &[String]) -> Result<()> {
    let [snapshot] = args else {
        bail!("modules requires exactly one snapshot file");
    };
    let graph = load_snapshot(snapshot)
        .with_context(|| format!("Failed to load snapshot {}", snapshot))?;

    for name in graph.module_names() {
        println!("{}", name);
    }
    for (name, missing) in graph.broken_imports() {
        println!("{} (fails to import: no module named '{}')", name, missing);
    }
    Ok(())
}
