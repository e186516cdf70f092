use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum Section {
    Data,
    Diagram,
    Interactions,
    Threats,
    Measures,
}

pub const ALL_SECTIONS: [Section; 5] = [
    Section::Data,
    Section::Diagram,
    Section::Interactions,
    Section::Threats,
    Section::Measures,
];

#[derive(Parser, Debug)]
#[command(name = "tml")]
#[command(about = "Compiles a TML threat model and renders its data flows, threats, and mitigations")]
#[command(version)]
pub struct Cli {
    /// Path to the root model file, or `-` to read from stdin
    pub model_file: String,

    /// Sections to render, in the given order (repeatable)
    #[arg(short = 'i', long = "include", value_enum, num_args = 1..)]
    pub include: Vec<Section>,

    /// Sections to drop from the include set
    #[arg(short = 'x', long = "exclude", value_enum, num_args = 1..)]
    pub exclude: Vec<Section>,

    /// Restrict every view to active components only
    #[arg(short, long)]
    pub active: bool,

    /// Run the grammar in diagnostic mode and print unmatched source, without rendering
    #[arg(short, long = "check-file")]
    pub check_file: bool,

    /// Emit only the diagram, in the given Graphviz format, to stdout
    #[arg(short, long)]
    pub diagram: Option<String>,

    /// Deterministic diagram layout shuffle: a literal seed string, or `random`
    #[arg(short, long)]
    pub seed: Option<String>,

    /// Raise log verbosity: warn (default), -v info, -vv debug
    #[arg(short, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Wrap diagram node labels at N characters
    #[arg(short, long = "wrap-labels")]
    pub wrap_labels: Option<u32>,

    /// Collapse parallel diagram edges with equal endpoints
    #[arg(long)]
    pub combine: bool,

    /// Suppress interaction ordinal labels on diagram edges
    #[arg(long)]
    pub no_numbers: bool,

    /// Suppress CSS injection in rendered HTML
    #[arg(long)]
    pub no_css: bool,

    /// Suppress dead-anchor stripping in rendered HTML
    #[arg(long)]
    pub no_anchors: bool,

    /// Read CSS from FILE instead of the built-in stylesheet
    #[arg(long)]
    pub css: Option<PathBuf>,

    /// Graphviz `graph` attributes, given as repeated `KEY=VALUE`
    #[arg(long = "graph-attrs", value_parser = parse_attr, num_args = 1..)]
    pub graph_attrs: Vec<(String, String)>,

    /// Graphviz cluster-subgraph attributes, given as repeated `KEY=VALUE`
    #[arg(long = "cluster-attrs", value_parser = parse_attr, num_args = 1..)]
    pub cluster_attrs: Vec<(String, String)>,

    /// Graphviz `node` attributes, given as repeated `KEY=VALUE`
    #[arg(long = "node-attrs", value_parser = parse_attr, num_args = 1..)]
    pub node_attrs: Vec<(String, String)>,

    /// Graphviz `edge` attributes, given as repeated `KEY=VALUE`
    #[arg(long = "edge-attrs", value_parser = parse_attr, num_args = 1..)]
    pub edge_attrs: Vec<(String, String)>,
}

fn parse_attr(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got {raw:?}"))
}

impl Cli {
    /// The effective section list: `include` (or all five, in the default
    /// order, if empty) minus `exclude`.
    pub fn sections(&self) -> Vec<Section> {
        let base: Vec<Section> = if self.include.is_empty() {
            ALL_SECTIONS.to_vec()
        } else {
            self.include.clone()
        };
        base.into_iter().filter(|s| !self.exclude.contains(s)).collect()
    }
}
