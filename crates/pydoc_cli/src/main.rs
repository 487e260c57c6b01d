//! pydoc: describe Python objects from a reflection snapshot
//!
//! ```text
//! pydoc describe <snapshot.json> <module.path[:attribute]> [options]
//! pydoc modules <snapshot.json>
//! ```

use anyhow::{bail, Result};
use std::env;

mod describe;
mod modules;

const USAGE: &str = "\
Usage:
  pydoc describe <snapshot.json> <module.path[:attribute]> [options]
  pydoc modules <snapshot.json>

Options for describe:
  --config, -c <file>     Read autodoc flags from a TOML file
  --output, -o <file>     Write the descriptor to a file instead of stdout
  --follow-module-tree    Document child modules too
  --ignore-all            Document every member, ignoring __all__
  --compact               Print compact JSON

Set PYDOC_LOG to control logging (default: warn).";

fn main() -> Result<()> {
    // Initialize tracing with env-filter support
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_env("PYDOC_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("describe") => describe::run(&args[1..]),
        Some("modules") => modules::run(&args[1..]),
        Some("--help") | Some("-h") | None => {
            println!("{}", USAGE);
            Ok(())
        }
        Some(other) => bail!("Unknown command: {}\n\n{}", other, USAGE),
    }
}
