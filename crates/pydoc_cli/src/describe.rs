//! The `pydoc describe` command
//!
//! Resolves an import path against a snapshot and prints the descriptor
//! tree as JSON, the contract a renderer consumes.

use anyhow::{bail, Context, Result};
use pydoc_etch::{load_snapshot, AutodocConfig, Describe, Etcher};
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// Run the describe command with the given arguments
pub fn run(args: &[String]) -> Result<()> {
    let cmd = DescribeCommand::parse(args)?;

    let graph = load_snapshot(&cmd.snapshot)
        .with_context(|| format!("Failed to load snapshot {}", cmd.snapshot.display()))?;
    let config = cmd.autodoc_config()?;

    let descriptor = Etcher::new(&graph, config)
        .describe(&cmd.import_path)
        .with_context(|| format!("Failed to describe {}", cmd.import_path))?;
    info!(path = %cmd.import_path, kind = %descriptor.kind(), "described");

    let json = if cmd.compact {
        descriptor.to_compact_json()?
    } else {
        descriptor.to_json()?
    };

    match cmd.output {
        Some(ref output) => {
            fs::write(output, format!("{}\n", json))
                .with_context(|| format!("Failed to write {}", output.display()))?;
        }
        None => println!("{}", json),
    }

    Ok(())
}

/// Describe command configuration
#[derive(Debug, PartialEq)]
struct DescribeCommand {
    /// Snapshot of the introspected objects
    snapshot: PathBuf,
    /// `module.path` or `module.path:attribute`
    import_path: String,
    /// TOML file with autodoc flags
    config: Option<PathBuf>,
    /// File to write instead of stdout
    output: Option<PathBuf>,
    follow_module_tree: bool,
    ignore_all: bool,
    compact: bool,
}

impl DescribeCommand {
    fn parse(args: &[String]) -> Result<Self> {
        let mut positional = Vec::new();
        let mut config = None;
        let mut output = None;
        let mut follow_module_tree = false;
        let mut ignore_all = false;
        let mut compact = false;

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--config" | "-c" => {
                    if i + 1 < args.len() {
                        config = Some(PathBuf::from(&args[i + 1]));
                        i += 2;
                    } else {
                        bail!("--config requires a value");
                    }
                }
                "--output" | "-o" => {
                    if i + 1 < args.len() {
                        output = Some(PathBuf::from(&args[i + 1]));
                        i += 2;
                    } else {
                        bail!("--output requires a value");
                    }
                }
                "--follow-module-tree" => {
                    follow_module_tree = true;
                    i += 1;
                }
                "--ignore-all" => {
                    ignore_all = true;
                    i += 1;
                }
                "--compact" => {
                    compact = true;
                    i += 1;
                }
                arg if !arg.starts_with('-') => {
                    positional.push(arg.to_string());
                    i += 1;
                }
                _ => {
                    bail!("Unknown flag: {}", args[i]);
                }
            }
        }

        let mut positional = positional.into_iter();
        let (Some(snapshot), Some(import_path)) = (positional.next(), positional.next()) else {
            bail!("describe requires a snapshot file and an import path");
        };
        if let Some(extra) = positional.next() {
            bail!("Unexpected argument: {}", extra);
        }

        Ok(DescribeCommand {
            snapshot: PathBuf::from(snapshot),
            import_path,
            config,
            output,
            follow_module_tree,
            ignore_all,
            compact,
        })
    }

    /// Flags from the config file, with command line switches on top
    fn autodoc_config(&self) -> Result<AutodocConfig> {
        let mut config = match self.config {
            Some(ref path) => AutodocConfig::from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => AutodocConfig::default(),
        };
        if self.follow_module_tree {
            config = config.with_follow_module_tree(true);
        }
        if self.ignore_all {
            config = config.with_ignore_all(true);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_positional_and_flags() {
        let cmd = DescribeCommand::parse(&args(&[
            "snapshot.json",
            "pkg:Widget",
            "-c",
            "autodoc.toml",
            "--follow-module-tree",
            "--compact",
        ]))
        .unwrap();
        assert_eq!(
            cmd,
            DescribeCommand {
                snapshot: PathBuf::from("snapshot.json"),
                import_path: "pkg:Widget".into(),
                config: Some(PathBuf::from("autodoc.toml")),
                output: None,
                follow_module_tree: true,
                ignore_all: false,
                compact: true,
            }
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(DescribeCommand::parse(&args(&["snapshot.json"])).is_err());
        assert!(DescribeCommand::parse(&args(&["a.json", "pkg", "extra"])).is_err());
        assert!(DescribeCommand::parse(&args(&["a.json", "pkg", "--output"])).is_err());
        assert!(DescribeCommand::parse(&args(&["a.json", "pkg", "--verbose"])).is_err());
    }

    #[test]
    fn test_switches_override_defaults() {
        let cmd = DescribeCommand::parse(&args(&["a.json", "pkg", "--ignore-all"])).unwrap();
        let config = cmd.autodoc_config().unwrap();
        assert!(config.ignore_all);
        assert!(!config.follow_module_tree);
        assert!(config.ignore_private);
    }
}
