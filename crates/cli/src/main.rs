use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use config::{load_criteria, Config};
use itertools::Itertools;
use midiscope_events::{LabelStyle, RawEvent};
use midiscope_filter::{ChannelKey, FilterCriteria, Session};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

mod config;
mod render;

#[derive(Parser)]
#[command(name = "midiscope")]
#[command(about = "Browse MIDI events through a classification tree", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// TOML file with a label style and default filter criteria
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the event taxonomy with counts, codes and value ranges
    Tree(TreeArgs),

    /// Print the events that pass the filter
    List(ListArgs),
}

#[derive(Clone, Copy, ValueEnum)]
enum StyleArg {
    Descriptive,
    Mnemonic,
}

impl StyleArg {
    const fn as_domain(self) -> LabelStyle {
        match self {
            Self::Descriptive => LabelStyle::Descriptive,
            Self::Mnemonic => LabelStyle::Mnemonic,
        }
    }
}

#[derive(Args)]
struct TreeArgs {
    /// JSON file with an array of `{tick, track, bytes}` events
    events: PathBuf,

    /// Node label style (defaults to the config file, then descriptive)
    #[arg(long, value_enum)]
    style: Option<StyleArg>,

    /// Show only the root and its direct children
    #[arg(long)]
    collapse: bool,

    /// Expand the subtree of the node with this id (repeatable)
    #[arg(long = "expand", value_name = "ID")]
    expand: Vec<String>,
}

#[derive(Args)]
struct ListArgs {
    /// JSON file with an array of `{tick, track, bytes}` events
    events: PathBuf,

    /// Node label style used in the type column
    #[arg(long, value_enum)]
    style: Option<StyleArg>,

    /// Keep only this channel, 0-15 or `independent` (repeatable)
    #[arg(long = "channel", value_name = "CHANNEL")]
    channels: Vec<ChannelKey>,

    /// Keep only this track (repeatable)
    #[arg(long = "track", value_name = "TRACK")]
    tracks: Vec<u32>,

    /// First tick to keep
    #[arg(long)]
    from: Option<u64>,

    /// Last tick to keep
    #[arg(long)]
    to: Option<u64>,

    /// Keep only items at or below the node with this id (repeatable)
    #[arg(long = "type", value_name = "ID")]
    types: Vec<String>,

    /// Full filter criteria as JSON (or TOML with a .toml extension)
    #[arg(long)]
    criteria: Option<PathBuf>,

    /// Output JSON format
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Tree(args) => run_tree(args, &config)?,
        Commands::List(args) => run_list(args, &config)?,
    }

    Ok(())
}

fn run_tree(args: TreeArgs, config: &Config) -> Result<()> {
    let style = resolve_style(args.style, config);
    let mut session = Session::ingest(load_events(&args.events)?, style)
        .context("Failed to build taxonomy")?;

    let taxonomy = session.taxonomy_mut();
    if args.collapse || !args.expand.is_empty() {
        taxonomy.expand_or_collapse(&BTreeSet::new(), false);
    } else {
        taxonomy.expand_or_collapse(&BTreeSet::new(), true);
    }
    if !args.expand.is_empty() {
        let ids: BTreeSet<String> = args.expand.into_iter().collect();
        let targets = taxonomy.resolve_ids(&ids);
        if targets.is_empty() {
            log::warn!("No taxonomy node matches {}", ids.iter().join(", "));
        }
        for &target in &targets {
            taxonomy.reveal(target);
        }
        taxonomy.expand_or_collapse(&targets, true);
    }

    print!("{}", render::render_tree(session.taxonomy()));
    Ok(())
}

fn run_list(args: ListArgs, config: &Config) -> Result<()> {
    let style = resolve_style(args.style, config);
    let mut criteria = match &args.criteria {
        Some(path) => load_criteria(path)?,
        None => config.criteria.clone(),
    };
    override_criteria(&mut criteria, &args);
    criteria.validate().context("Invalid filter criteria")?;

    let mut session = Session::ingest(load_events(&args.events)?, style)
        .context("Failed to build taxonomy")?;
    session.apply(criteria);
    log::info!(
        "{} of {} events pass the filter",
        session.visible_count(),
        session.items().len()
    );

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&render::json_listing(&session))?
        );
    } else {
        print!("{}", render::render_table(&session));
    }
    Ok(())
}

fn resolve_style(arg: Option<StyleArg>, config: &Config) -> LabelStyle {
    arg.map(StyleArg::as_domain)
        .or(config.style)
        .unwrap_or_default()
}

/// Command-line filters replace the matching part of the loaded criteria
fn override_criteria(criteria: &mut FilterCriteria, args: &ListArgs) {
    if !args.channels.is_empty() {
        criteria.channels = args.channels.iter().copied().collect();
    }
    if !args.tracks.is_empty() {
        criteria.limit_tracks = true;
        criteria.tracks = args.tracks.iter().copied().collect();
    }
    if args.from.is_some() || args.to.is_some() {
        let defaults = FilterCriteria::default();
        criteria.limit_range = true;
        criteria.range_from = args.from.unwrap_or(defaults.range_from);
        criteria.range_to = args.to.unwrap_or(defaults.range_to);
    }
    if !args.types.is_empty() {
        criteria.limit_by_type = true;
        criteria.selected_node_ids = args.types.iter().cloned().collect();
    }
}

fn load_events(path: &Path) -> Result<Vec<RawEvent>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read events {}", path.display()))?;
    let events: Vec<RawEvent> = serde_json::from_str(&text)
        .with_context(|| format!("Invalid events file {}", path.display()))?;
    log::debug!("Loaded {} events from {}", events.len(), path.display());
    Ok(events)
}
