//! `pscope` — command-line shell for the Periscope value inspector.
//!
//! Renders one of the built-in sample values, expands the branches named by
//! `--expand` index paths, and prints the tree as text or HTML markup.
//!
//! ```text
//! pscope --sample cycle --expand 0 --expand 0.0
//! pscope --sample class --format markup --config periscope.toml
//! PSCOPE_LOG=periscope_core=debug pscope --sample hostile
//! ```

mod samples;

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use periscope_core::inspect::render::{render_markup, render_text};
use periscope_core::inspect::{
    AccessorPolicy, Inspector, InspectorOptions, NodeList, PrototypePolicy,
};
use periscope_core::realm::Realm;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "PSCOPE_LOG";

#[derive(Parser, Debug)]
#[command(name = "pscope", version)]
#[command(about = "Inspect sample JavaScript-style values as a lazily expanded tree")]
struct Args {
    /// Sample value to inspect
    #[arg(long, short, default_value = "plain")]
    sample: String,

    /// Expand the branch at an index path such as `2.0.1` (repeatable)
    #[arg(long, short)]
    expand: Vec<ExpandPath>,

    /// Output format
    #[arg(long, short, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// TOML file with inspector options
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Accessor rendering, overriding the config file
    #[arg(long, value_enum)]
    accessors: Option<AccessorMode>,

    /// Show the `[[Prototype]]` record even for `Object.prototype`
    #[arg(long)]
    all_prototypes: bool,

    /// Log filter directives (defaults to $PSCOPE_LOG, then `warn`)
    #[arg(long)]
    log: Option<String>,

    /// List the available samples and exit
    #[arg(long)]
    list: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Markup,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum AccessorMode {
    Split,
    Resolved,
}

impl From<AccessorMode> for AccessorPolicy {
    fn from(mode: AccessorMode) -> Self {
        match mode {
            AccessorMode::Split => Self::Split,
            AccessorMode::Resolved => Self::Resolved,
        }
    }
}

/// A dot-separated list of node indices.
#[derive(Clone, Debug, PartialEq, Eq)]
struct ExpandPath(Vec<usize>);

impl FromStr for ExpandPath {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split('.')
            .map(|part| {
                part.trim()
                    .parse::<usize>()
                    .map_err(|_| format!("invalid index `{part}` in path `{s}`"))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(ExpandPath)
    }
}

fn init_logging(directives: Option<&str>) -> Result<()> {
    let filter = match directives {
        Some(directives) => EnvFilter::try_new(directives)
            .with_context(|| format!("invalid log filter `{directives}`"))?,
        None => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
    Ok(())
}

fn load_options(args: &Args) -> Result<InspectorOptions> {
    let mut options = match &args.config {
        Some(path) => InspectorOptions::load(path)
            .with_context(|| format!("loading inspector options from {}", path.display()))?,
        None => InspectorOptions::default(),
    };
    if let Some(mode) = args.accessors {
        options = options.with_accessor_policy(mode.into());
    }
    if args.all_prototypes {
        options = options.with_prototype_policy(PrototypePolicy::Always);
    }
    Ok(options)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log.as_deref())?;

    if args.list {
        for (name, description) in samples::SAMPLES {
            println!("{name:<10} {description}");
        }
        return Ok(());
    }

    let options = load_options(&args)?;
    debug!(?options, "inspector options");

    let realm = Realm::new();
    let value = samples::build(&realm, &args.sample)?.with_context(|| {
        format!(
            "unknown sample `{}` (run with --list to see the choices)",
            args.sample
        )
    })?;

    let inspector = Inspector::new(&realm, options);
    let mut tree = NodeList::new();
    inspector.view(&value, &mut tree);
    for ExpandPath(path) in &args.expand {
        let branch = tree
            .expand_path(&inspector, path)
            .with_context(|| format!("cannot expand path {path:?}"))?;
        info!(header = %branch.header(), children = branch.children().len(), "expanded");
    }

    match args.format {
        OutputFormat::Text => print!("{}", render_text(&tree)),
        OutputFormat::Markup => println!("{}", render_markup(&tree)),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_expand_path() {
        assert_eq!("2.0.1".parse::<ExpandPath>().unwrap(), ExpandPath(vec![2, 0, 1]));
        assert_eq!("7".parse::<ExpandPath>().unwrap(), ExpandPath(vec![7]));
        assert!("1..2".parse::<ExpandPath>().is_err());
        assert!("a".parse::<ExpandPath>().is_err());
    }

    #[test]
    fn test_cli_arguments() {
        let args = Args::try_parse_from([
            "pscope", "--sample", "cycle", "-e", "0", "-e", "0.0", "--format", "markup",
            "--accessors", "resolved",
        ])
        .unwrap();
        assert_eq!(args.sample, "cycle");
        assert_eq!(args.expand, vec![ExpandPath(vec![0]), ExpandPath(vec![0, 0])]);
        assert_eq!(args.format, OutputFormat::Markup);
        let options = load_options(&args).unwrap();
        assert_eq!(options.accessor_policy, AccessorPolicy::Resolved);
        assert_eq!(options.prototype_policy, PrototypePolicy::SkipBaseline);
    }

    #[test]
    fn test_cli_verifies() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
