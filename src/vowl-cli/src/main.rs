// Copyright 2026 The Vowl Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{Level, info};

use vowl_engine::{
    EdgeType, FilterConfig, FilterPipeline, ForceLayout, Graph, LayoutConfig, NodeType,
    SearchFilter, Snapshot, compute_statistics,
};

/// Lay out and inspect OWL ontologies in VOWL JSON format.
#[derive(Parser, Debug)]
#[command(name = "vowl", version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Write output here instead of stdout
    #[arg(short, long, value_name = "FILE", global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the force layout and print a snapshot of the visible graph
    Layout(LayoutArgs),
    /// Print statistics for the visible graph
    Stats(StatsArgs),
    /// Rank nodes against a search query
    Search(SearchArgs),
    /// Print the JSON schema of the input format
    #[cfg(feature = "schema")]
    Schema,
}

#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// JSON file with a filter configuration; flags below override it
    #[arg(long, value_name = "FILE")]
    filter_config: Option<PathBuf>,
    /// Only show nodes of this type (repeatable), e.g. owl:Class
    #[arg(long = "node-type", value_name = "TYPE")]
    node_types: Vec<NodeType>,
    /// Only show edges of this type (repeatable), e.g. rdfs:subClassOf
    #[arg(long = "edge-type", value_name = "TYPE")]
    edge_types: Vec<EdgeType>,
    #[arg(long)]
    min_degree: Option<usize>,
    #[arg(long)]
    max_degree: Option<usize>,
    /// Fold class hierarchies into their roots
    #[arg(long)]
    collapse_subclasses: bool,
    /// Keep this hierarchy root expanded when collapsing (repeatable)
    #[arg(long = "expand", value_name = "ROOT")]
    expand: Vec<String>,
}

#[derive(Args, Debug)]
struct LayoutArgs {
    /// VOWL JSON ontology
    file: PathBuf,
    #[command(flatten)]
    filters: FilterArgs,
    /// JSON file with layout parameters
    #[arg(long, value_name = "FILE")]
    layout_config: Option<PathBuf>,
    /// Maximum number of simulation ticks
    #[arg(long, default_value_t = 300)]
    ticks: usize,
    /// Seed for initial placement (overrides the layout config)
    #[arg(long)]
    seed: Option<u64>,
    /// Preferred label language
    #[arg(long)]
    lang: Option<String>,
}

#[derive(Args, Debug)]
struct StatsArgs {
    file: PathBuf,
    #[command(flatten)]
    filters: FilterArgs,
}

#[derive(Args, Debug)]
struct SearchArgs {
    file: PathBuf,
    query: String,
    #[arg(long)]
    lang: Option<String>,
    /// Only print the best N hits
    #[arg(long)]
    limit: Option<usize>,
}

#[derive(Serialize)]
struct LayoutOutput {
    ticks: usize,
    converged: bool,
    alpha: f64,
    #[serde(flatten)]
    snapshot: Snapshot,
}

fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("reading {what} {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parsing {what} {}", path.display()))
}

fn load_graph(path: &Path) -> Result<Graph> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("reading ontology {}", path.display()))?;
    let graph = vowl_engine::parse(&contents)
        .with_context(|| format!("loading ontology {}", path.display()))?;
    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "loaded {}",
        path.display()
    );
    Ok(graph)
}

impl FilterArgs {
    fn config(&self) -> Result<FilterConfig> {
        let mut config = match &self.filter_config {
            Some(path) => read_json(path, "filter config")?,
            None => FilterConfig::default(),
        };
        if !self.node_types.is_empty() {
            config.node_types = Some(self.node_types.clone());
        }
        if !self.edge_types.is_empty() {
            config.edge_types = Some(self.edge_types.clone());
        }
        config.min_degree = self.min_degree.or(config.min_degree);
        config.max_degree = self.max_degree.or(config.max_degree);
        config.collapse_subclasses |= self.collapse_subclasses;
        Ok(config)
    }

    fn apply(&self, graph: &mut Graph) -> Result<()> {
        let mut pipeline = FilterPipeline::from_config(&self.config()?);
        if let Some(collapse) = pipeline.subclass_collapse_mut() {
            for root in &self.expand {
                collapse.expand(root);
            }
        }
        let summary = pipeline.apply(graph);
        info!(
            visible_nodes = summary.visible_nodes,
            visible_edges = summary.visible_edges,
            "applied filters"
        );
        Ok(())
    }
}

fn layout(args: &LayoutArgs) -> Result<LayoutOutput> {
    let mut graph = load_graph(&args.file)?;
    args.filters.apply(&mut graph)?;

    let mut config = match &args.layout_config {
        Some(path) => read_json(path, "layout config")?,
        None => LayoutConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    let mut layout = ForceLayout::new(config);
    let ticks = layout.run(&mut graph, args.ticks);
    info!(ticks, converged = layout.is_converged(), "layout finished");

    Ok(LayoutOutput {
        ticks,
        converged: layout.is_converged(),
        alpha: layout.alpha(),
        snapshot: Snapshot::capture(&graph, args.lang.as_deref()),
    })
}

fn write_json<T: Serialize>(value: &T, out: &mut dyn Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).context("writing output")?;
    writeln!(out)?;
    Ok(())
}

fn run(command: &Command, out: &mut dyn Write) -> Result<()> {
    match command {
        Command::Layout(args) => write_json(&layout(args)?, out),
        Command::Stats(args) => {
            let mut graph = load_graph(&args.file)?;
            args.filters.apply(&mut graph)?;
            write_json(&compute_statistics(&graph), out)
        }
        Command::Search(args) => {
            let graph = load_graph(&args.file)?;
            let mut search = SearchFilter::new(&args.query);
            if let Some(lang) = &args.lang {
                search = search.with_language(lang);
            }
            let mut hits = search.rank(&graph);
            if let Some(limit) = args.limit {
                hits.truncate(limit);
            }
            write_json(&hits, out)
        }
        #[cfg(feature = "schema")]
        Command::Schema => write_json(&schemars::schema_for!(vowl_engine::json::Ontology), out),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.output {
        Some(path) => {
            let mut file = fs::File::create(path)
                .with_context(|| format!("creating output {}", path.display()))?;
            run(&cli.command, &mut file)
        }
        None => run(&cli.command, &mut io::stdout().lock()),
    }
}
