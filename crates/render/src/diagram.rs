//! Graphviz DOT generation, modeled on `dfdone.plot.build_diagram`/`add_node`:
//! role picks node shape, profile picks fill/font color, clusters become
//! named `cluster_*` subgraphs, and each interaction becomes a labeled edge.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::process::Command;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use tml_core::enums::{Profile, Role};
use tml_core::{DiagramOptions, RendererView};

#[derive(Debug, thiserror::Error)]
pub enum DiagramError {
    #[error("the `dot` binary failed to render: {0}")]
    GraphvizFailed(String),
    #[error("could not invoke the `dot` binary: {0}")]
    GraphvizUnavailable(#[from] std::io::Error),
}

fn node_shape(role: Role) -> &'static str {
    match role {
        Role::Service => "oval",
        Role::Storage => "box3d",
        Role::Agent => "box",
    }
}

fn node_colors(profile: Profile) -> (&'static str, &'static str) {
    match profile {
        Profile::Black => ("black", "white"),
        Profile::Grey => ("grey", "black"),
        Profile::White => ("white", "black"),
    }
}

fn seeded_order<T: Clone>(items: &[T], seed: &Option<u64>) -> Vec<T> {
    let mut items = items.to_vec();
    if let Some(seed) = seed {
        let mut rng = StdRng::seed_from_u64(*seed);
        items.shuffle(&mut rng);
    }
    items
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

fn wrap(label: &str, width: Option<u32>) -> String {
    let Some(width) = width else { return escape(label) };
    let width = width.max(1) as usize;
    let mut wrapped = String::new();
    let mut col = 0usize;
    for word in label.split_whitespace() {
        if col > 0 && col + 1 + word.len() > width {
            wrapped.push_str("\\n");
            col = 0;
        } else if col > 0 {
            wrapped.push(' ');
            col += 1;
        }
        wrapped.push_str(word);
        col += word.len();
    }
    escape(&wrapped)
}

fn attrs_block(attrs: &[(String, String)]) -> String {
    attrs.iter().map(|(k, v)| format!(" {k}=\"{}\"", escape(v))).collect()
}

/// Renders the DOT source for `view` honoring `opts`. Returns DOT text; use
/// [`render_bytes`] to additionally shell out to Graphviz for a binary
/// format such as `svg` or `png`.
pub fn build_diagram_dot(view: &RendererView<'_>, opts: &DiagramOptions) -> String {
    let mut dot = String::new();
    writeln!(dot, "digraph tml {{").unwrap();
    writeln!(dot, "  rankdir=TB;").unwrap();
    writeln!(dot, "  graph [{}];", attrs_block(&opts.graph_attrs).trim_start()).unwrap();
    if !opts.node_attrs.is_empty() {
        writeln!(dot, "  node [{}];", attrs_block(&opts.node_attrs).trim_start()).unwrap();
    }
    if !opts.edge_attrs.is_empty() {
        writeln!(dot, "  edge [{}];", attrs_block(&opts.edge_attrs).trim_start()).unwrap();
    }

    let elements: Vec<&tml_core::model::Element> = seeded_order(&view.elements().collect::<Vec<_>>(), &opts.seed);
    let mut clustered: HashMap<String, Vec<&tml_core::model::Element>> = HashMap::new();
    let mut unclustered: Vec<&tml_core::model::Element> = Vec::new();
    for &element in &elements {
        match &element.parent {
            Some(cluster) => clustered.entry(cluster.clone()).or_default().push(element),
            None => unclustered.push(element),
        }
    }

    for &element in &unclustered {
        write_node(&mut dot, element, opts);
    }

    let clusters = seeded_order(&view.clusters().collect::<Vec<_>>(), &opts.seed);
    let mut children_of: HashMap<String, Vec<&tml_core::model::Cluster>> = HashMap::new();
    for &cluster in &clusters {
        if let Some(parent) = &cluster.parent {
            children_of.entry(parent.clone()).or_default().push(cluster);
        }
    }
    let roots = seeded_order(&view.root_clusters().collect::<Vec<_>>(), &opts.seed);
    for root in &roots {
        write_cluster_subgraph(&mut dot, root, &clustered, &children_of, opts, 1);
    }

    let mut seen_edges: HashMap<(String, String), usize> = HashMap::new();
    for interaction in view.interactions() {
        let label = if opts.numbers {
            format!("({})", interaction.ordinal)
        } else {
            String::new()
        };
        for (from, to) in interaction.source_target_pairs() {
            if opts.combine {
                let count = seen_edges.entry((from.clone(), to.clone())).or_insert(0);
                *count += 1;
                if *count > 1 {
                    continue;
                }
            }
            writeln!(dot, "  \"{}\" -> \"{}\" [label=\"{}\"];", escape(&from), escape(&to), label).unwrap();
        }
    }

    writeln!(dot, "}}").unwrap();
    dot
}

/// Emits `cluster` as a named `cluster_*` subgraph holding its own elements,
/// then recurses into its child clusters so nesting in the model (arbitrary
/// `level`) is reflected as Graphviz subgraph nesting rather than siblings.
#[allow(clippy::too_many_arguments)]
fn write_cluster_subgraph(
    dot: &mut String,
    cluster: &tml_core::model::Cluster,
    clustered: &HashMap<String, Vec<&tml_core::model::Element>>,
    children_of: &HashMap<String, Vec<&tml_core::model::Cluster>>,
    opts: &DiagramOptions,
    depth: usize,
) {
    let indent = "  ".repeat(depth);
    writeln!(dot, "{indent}subgraph \"cluster_{}\" {{", escape(&cluster.common.name)).unwrap();
    writeln!(dot, "{indent}  label=\"{}\";", wrap(&cluster.common.label, opts.wrap_labels)).unwrap();
    writeln!(dot, "{indent}  style=filled; color=lightgrey;").unwrap();
    if !opts.cluster_attrs.is_empty() {
        writeln!(dot, "{indent}  graph [{}];", attrs_block(&opts.cluster_attrs).trim_start()).unwrap();
    }
    if let Some(members) = clustered.get(&cluster.common.name) {
        for &element in members {
            write_node(dot, element, opts);
        }
    }
    if let Some(children) = children_of.get(&cluster.common.name) {
        for &child in children {
            write_cluster_subgraph(dot, child, clustered, children_of, opts, depth + 1);
        }
    }
    writeln!(dot, "{indent}}}").unwrap();
}

fn write_node(dot: &mut String, element: &tml_core::model::Element, opts: &DiagramOptions) {
    let shape = node_shape(element.role);
    let (fill, font) = node_colors(element.profile);
    let label = wrap(&element.common.label, opts.wrap_labels);
    writeln!(
        dot,
        "  \"{}\" [label=\"{label}\", shape={shape}, style=filled, color={font}, fontcolor={font}, fillcolor={fill}];",
        escape(&element.common.name),
    )
    .unwrap();
}

/// Shells out to the system `dot` binary to convert DOT source into
/// `format` (`svg`, `png`, ...). `dot` itself natively emits `dot`/`xdot`
/// without invoking Graphviz at all.
pub fn render_bytes(dot_source: &str, format: &str) -> Result<Vec<u8>, DiagramError> {
    if format.eq_ignore_ascii_case("dot") || format.eq_ignore_ascii_case("xdot") {
        return Ok(dot_source.as_bytes().to_vec());
    }
    let output = Command::new("dot")
        .arg(format!("-T{format}"))
        .arg("-Gcharset=utf8")
        .stdin(std::process::Stdio::piped())
        .stdout(std::process::Stdio::piped())
        .stderr(std::process::Stdio::piped())
        .spawn()
        .and_then(|mut child| {
            use std::io::Write;
            child
                .stdin
                .take()
                .expect("stdin was piped")
                .write_all(dot_source.as_bytes())?;
            child.wait_with_output()
        })?;
    if !output.status.success() {
        return Err(DiagramError::GraphvizFailed(String::from_utf8_lossy(&output.stderr).to_string()));
    }
    Ok(output.stdout)
}
