mod args;
mod logging;

use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use colored::Colorize;
use tml_core::{DiagramOptions, RendererView};

use args::{Cli, Section};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.check_file {
        return run_check(&cli);
    }

    logging::init(cli.verbose);

    let compiled = if cli.model_file == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        tml_core::compile_str(Path::new("-"), &text)
    } else {
        tml_core::compile(Path::new(&cli.model_file))?
    };

    let view = compiled.view();

    if let Some(format) = &cli.diagram {
        return run_diagram(&cli, &view, format);
    }

    run_tables(&cli, &view)
}

fn run_check(cli: &Cli) -> anyhow::Result<()> {
    let (root_path, text) = if cli.model_file == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        (PathBuf::from("-"), text)
    } else {
        let path = PathBuf::from(&cli.model_file);
        let text = fs::read_to_string(&path)?;
        (path, text)
    };

    let report = tml_core::loader::check(&root_path, &text);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for (path, file_text, unmatched) in &report {
        writeln!(out, "{}", path.display().to_string().bold())?;
        let mut cursor = 0usize;
        for range in unmatched {
            if range.start > cursor {
                write!(out, "{}", &file_text[cursor..range.start])?;
            }
            write!(out, "{}", file_text[range.start..range.end].on_red())?;
            cursor = range.end;
        }
        if cursor < file_text.len() {
            write!(out, "{}", &file_text[cursor..])?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn seed_value(raw: &str) -> u64 {
    if raw.eq_ignore_ascii_case("random") {
        rand::random()
    } else {
        let mut hasher = DefaultHasher::new();
        raw.hash(&mut hasher);
        hasher.finish()
    }
}

fn diagram_options(cli: &Cli) -> DiagramOptions {
    DiagramOptions {
        format: cli.diagram.clone().unwrap_or_else(|| "svg".to_string()),
        combine: cli.combine,
        numbers: !cli.no_numbers,
        css: !cli.no_css,
        anchors: !cli.no_anchors,
        wrap_labels: cli.wrap_labels,
        seed: cli.seed.as_deref().map(seed_value),
        graph_attrs: cli.graph_attrs.clone(),
        cluster_attrs: cli.cluster_attrs.clone(),
        node_attrs: cli.node_attrs.clone(),
        edge_attrs: cli.edge_attrs.clone(),
    }
}

fn run_diagram(cli: &Cli, view: &RendererView<'_>, format: &str) -> anyhow::Result<()> {
    let opts = diagram_options(cli);
    let dot = tml_render::build_diagram_dot(view, &opts);
    let bytes = tml_render::render_bytes(&dot, format)?;
    io::stdout().write_all(&bytes)?;
    Ok(())
}

fn run_tables(cli: &Cli, view: &RendererView<'_>) -> anyhow::Result<()> {
    let mut html = String::new();

    if !cli.no_css {
        html.push_str(&tml_render::resolve_css(true, cli.css.as_deref())?);
    }

    for section in cli.sections() {
        match section {
            Section::Data => html.push_str(&tml_render::build_data_table(view, cli.active)),
            Section::Threats => html.push_str(&tml_render::build_threat_table(view, cli.active)),
            Section::Measures => html.push_str(&tml_render::build_measure_table(view, cli.active)),
            Section::Interactions => html.push_str(&tml_render::build_interaction_table(view, cli.active)),
            Section::Diagram => {
                let opts = diagram_options(cli);
                let dot = tml_render::build_diagram_dot(view, &opts);
                let svg = tml_render::render_bytes(&dot, &opts.format)?;
                html.push_str(&String::from_utf8_lossy(&svg));
            }
        }
        html.push('\n');
    }

    let html = if cli.no_anchors { html } else { tml_render::strip_dead_anchors(&html) };
    io::stdout().write_all(html.as_bytes())?;
    Ok(())
}
