use std::io;
use std::path::PathBuf;
use std::{env, process};

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use serde::Serialize;

use crate::config::resolve::resolve_roadmap_with_overrides;
use crate::core::exercise::ExerciseStatus;
use crate::core::node::SkillTreeNode;
use crate::core::roadmap::Roadmap;
use crate::error::{Result, SkillTreeError};
use crate::filter::visibility::apply_visibility;
use crate::filter::{FilterOptions, FilterState};
use crate::graph::check::{check_roadmap, RoadmapReport};
use crate::graph::layout::{canvas_bounds, CanvasBounds};
use crate::graph::ops::{
    dependencies_for, dependents_of, edges, find_node, learning_order, missing_dependencies,
    transitive_dependencies, transitive_dependents, Edge,
};
use crate::graph::viz;
use crate::util::logging::init_logging;
use crate::util::output;

#[derive(Parser, Debug)]
#[command(name = "skilltree")]
#[command(about = "Skills roadmap graph builder", long_about = None)]
pub struct Cli {
    #[arg(short, long)]
    pub root: Option<PathBuf>,
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
    #[arg(short, long)]
    pub quiet: bool,
    #[arg(long)]
    pub no_color: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Show(ShowArgs),
    Nodes(NodesArgs),
    Deps(DepsArgs),
    Dependents(DependentsArgs),
    Order(OrderArgs),
    Check(CheckArgs),
    Visibility(VisibilityArgs),
    Filters(FiltersArgs),
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    #[arg(long, default_value = "tree")]
    pub format: String,
}

#[derive(Args, Debug)]
pub struct NodesArgs {
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct DepsArgs {
    pub slug: String,
    #[arg(short = 't', long)]
    pub transitive: bool,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct DependentsArgs {
    pub slug: String,
    #[arg(short = 't', long)]
    pub transitive: bool,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct OrderArgs {
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    #[arg(long)]
    pub json: bool,
    /// Exit non-zero when any finding is reported.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args, Debug)]
pub struct VisibilityArgs {
    #[command(flatten)]
    pub filter: FilterArgs,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Path display name, repeatable or comma separated.
    #[arg(long = "path", value_delimiter = ',')]
    pub paths: Vec<String>,
    #[arg(long = "product", value_delimiter = ',')]
    pub products: Vec<String>,
    #[arg(long = "difficulty", value_delimiter = ',')]
    pub difficulties: Vec<String>,
    #[arg(long = "status", value_delimiter = ',')]
    pub statuses: Vec<ExerciseStatus>,
}

impl From<FilterArgs> for FilterState {
    fn from(args: FilterArgs) -> Self {
        FilterState {
            paths: args.paths.into_iter().collect(),
            products: args.products.into_iter().collect(),
            difficulties: args.difficulties.into_iter().collect(),
            statuses: args.statuses.into_iter().collect(),
        }
    }
}

#[derive(Args, Debug)]
pub struct FiltersArgs {
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    pub shell: Shell,
}

pub fn run() {
    let cli = Cli::parse();
    if cli.no_color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }
    init_logging(cli.verbose, cli.quiet);

    if let Err(err) = dispatch(cli) {
        output::error(&err.to_string());
        process::exit(1);
    }
}

fn dispatch(cli: Cli) -> Result<()> {
    if let Commands::Completions(args) = &cli.command {
        let mut command = Cli::command();
        clap_complete::generate(args.shell, &mut command, "skilltree", &mut io::stdout());
        return Ok(());
    }

    let roadmap = load_roadmap(cli.root, cli.config)?;
    match cli.command {
        Commands::Show(args) => handle_show(args, &roadmap),
        Commands::Nodes(args) => handle_nodes(args, &roadmap),
        Commands::Deps(args) => handle_deps(args, &roadmap),
        Commands::Dependents(args) => handle_dependents(args, &roadmap),
        Commands::Order(args) => handle_order(args, &roadmap),
        Commands::Check(args) => handle_check(args, &roadmap),
        Commands::Visibility(args) => handle_visibility(args, &roadmap),
        Commands::Filters(args) => handle_filters(args, &roadmap),
        Commands::Completions(_) => Ok(()),
    }
}

fn load_roadmap(root: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<Roadmap> {
    let cwd = env::current_dir()?;
    let resolved = resolve_roadmap_with_overrides(cwd, root, config_path)?;
    Roadmap::load_from(resolved.root, resolved.config_path)
}

fn handle_show(args: ShowArgs, roadmap: &Roadmap) -> Result<()> {
    match args.format.to_ascii_lowercase().as_str() {
        "tree" => {
            print!("{}", viz::render_tree(&roadmap.nodes));
            Ok(())
        }
        "flat" => {
            print!("{}", viz::render_flat(&roadmap.nodes));
            Ok(())
        }
        "dot" => {
            print!("{}", viz::render_dot(&roadmap.nodes));
            Ok(())
        }
        "json" => print_json(&graph_to_json(&roadmap.nodes)),
        other => Err(SkillTreeError::Other(anyhow::anyhow!(format!(
            "unknown graph format '{}'",
            other
        )))),
    }
}

fn handle_nodes(args: NodesArgs, roadmap: &Roadmap) -> Result<()> {
    let rows: Vec<NodeJson> = roadmap.nodes.iter().map(NodeJson::from).collect();
    if args.json {
        return print_json(&rows);
    }

    println!(
        "{}",
        output::heading(&format!(
            "{} ({} exercises, {} paths)",
            roadmap.name(),
            roadmap.exercises.len(),
            roadmap.paths.len()
        ))
    );
    println!();
    println!(
        "{:<32} {:<20} {:<10} {:>8} {:>8}",
        "Exercise", "Path", "Status", "X", "Y"
    );
    println!("{}", "-".repeat(82));
    for row in rows {
        println!(
            "{:<32} {:<20} {:<10} {:>8} {:>8}",
            row.slug, row.path, row.status, row.x, row.y
        );
    }
    Ok(())
}

fn handle_deps(args: DepsArgs, roadmap: &Roadmap) -> Result<()> {
    ensure_known(roadmap, &args.slug)?;
    let resolved = if args.transitive {
        transitive_dependencies(&roadmap.nodes, &args.slug)
    } else {
        dependencies_for(&roadmap.nodes, &args.slug)
    };

    let mut sources = vec![args.slug.as_str()];
    if args.transitive {
        sources.extend(resolved.iter().map(String::as_str));
    }
    let mut missing: Vec<String> = Vec::new();
    for dangling in missing_dependencies(&roadmap.nodes) {
        if sources.contains(&dangling.from.as_str()) && !missing.contains(&dangling.dependency) {
            missing.push(dangling.dependency);
        }
    }

    if args.json {
        return print_json(&DepsJson { resolved, missing });
    }
    for slug in &resolved {
        println!("{}", slug);
    }
    for slug in &missing {
        println!("{} (missing)", slug);
    }
    Ok(())
}

fn handle_dependents(args: DependentsArgs, roadmap: &Roadmap) -> Result<()> {
    ensure_known(roadmap, &args.slug)?;
    let dependents = if args.transitive {
        transitive_dependents(&roadmap.nodes, &args.slug)
    } else {
        dependents_of(&roadmap.nodes, &args.slug)
    };
    let heading = format!("dependents of {}:", args.slug);
    print_slug_list(&dependents, args.json, Some(&heading))
}

fn handle_order(args: OrderArgs, roadmap: &Roadmap) -> Result<()> {
    let order = learning_order(&roadmap.nodes).map_err(SkillTreeError::Other)?;
    print_slug_list(&order, args.json, None)
}

fn handle_check(args: CheckArgs, roadmap: &Roadmap) -> Result<()> {
    let report = check_roadmap(&roadmap.nodes, &roadmap.settings);

    if args.json {
        print_json(&report)?;
    } else {
        print_report(&report);
    }

    if args.strict && !report.is_clean() {
        return Err(SkillTreeError::Other(anyhow::anyhow!(
            "roadmap check reported findings"
        )));
    }
    Ok(())
}

fn handle_visibility(args: VisibilityArgs, roadmap: &Roadmap) -> Result<()> {
    let filter = FilterState::from(args.filter);
    let visible = apply_visibility(&roadmap.nodes, &filter);

    if args.json {
        let rows: Vec<VisibilityJson> = visible
            .iter()
            .map(|entry| VisibilityJson {
                slug: entry.node.slug().to_string(),
                visibility: entry.visibility,
            })
            .collect();
        return print_json(&rows);
    }

    for entry in visible {
        println!("{:<32} {:.2}", entry.node.slug(), entry.visibility);
    }
    Ok(())
}

fn handle_filters(args: FiltersArgs, roadmap: &Roadmap) -> Result<()> {
    let options = FilterOptions::collect(&roadmap.nodes);
    if args.json {
        return print_json(&options);
    }

    let join = |values: Vec<String>| values.join(", ");
    println!("paths: {}", join(options.paths.into_iter().collect()));
    println!("products: {}", join(options.products.into_iter().collect()));
    println!(
        "difficulties: {}",
        join(options.difficulties.into_iter().collect())
    );
    println!(
        "statuses: {}",
        join(
            options
                .statuses
                .into_iter()
                .map(|status| status.to_string())
                .collect()
        )
    );
    Ok(())
}

fn ensure_known(roadmap: &Roadmap, slug: &str) -> Result<()> {
    if find_node(&roadmap.nodes, slug).is_none() {
        return Err(SkillTreeError::Other(anyhow::anyhow!(format!(
            "unknown exercise {}",
            slug
        ))));
    }
    Ok(())
}

fn print_slug_list(slugs: &[String], json: bool, heading: Option<&str>) -> Result<()> {
    if json {
        return print_json(&slugs);
    }
    if let Some(heading) = heading {
        println!("{}", heading);
    }
    for slug in slugs {
        println!("{}", slug);
    }
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value)
            .map_err(|err| SkillTreeError::Other(anyhow::Error::new(err)))?
    );
    Ok(())
}

fn print_report(report: &RoadmapReport) {
    if report.is_clean() {
        output::success("roadmap is clean");
        return;
    }

    for missing in &report.missing {
        output::warn(&format!(
            "missing dependency: {} -> {}",
            missing.from, missing.dependency
        ));
    }
    for unresolved in &report.unresolved_paths {
        output::warn(&format!(
            "unknown path '{}' for {}, using '{}'",
            unresolved.requested, unresolved.exercise, unresolved.resolved
        ));
    }
    for cycle in &report.cycles {
        output::warn(&format!("dependency cycle: {}", cycle.join(" -> ")));
    }
    for overlap in &report.overlaps {
        output::warn(&format!("overlapping positions: {}", overlap.join(", ")));
    }
}

#[derive(Serialize)]
struct GraphJson {
    nodes: Vec<NodeJson>,
    edges: Vec<Edge>,
    bounds: CanvasBounds,
}

#[derive(Serialize)]
struct NodeJson {
    slug: String,
    name: String,
    path: String,
    color: String,
    status: String,
    x: f64,
    y: f64,
}

impl From<&SkillTreeNode> for NodeJson {
    fn from(node: &SkillTreeNode) -> Self {
        Self {
            slug: node.slug().to_string(),
            name: node.exercise.name.clone(),
            path: node.path.slug.clone(),
            color: node.path.color.clone(),
            status: node.exercise.status.to_string(),
            x: node.position.x,
            y: node.position.y,
        }
    }
}

#[derive(Serialize)]
struct DepsJson {
    resolved: Vec<String>,
    missing: Vec<String>,
}

#[derive(Serialize)]
struct VisibilityJson {
    slug: String,
    visibility: f64,
}

fn graph_to_json(nodes: &[SkillTreeNode]) -> GraphJson {
    GraphJson {
        nodes: nodes.iter().map(NodeJson::from).collect(),
        edges: edges(nodes),
        bounds: canvas_bounds(nodes),
    }
}
