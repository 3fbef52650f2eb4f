use anyhow::{bail, Context, Result};
use autobind_graph::{AssetGraph, AssetKind, DependencyCategorizer, GraphBuilder, Query};
use autobind_scene::{AutoBinder, NodeRenamer, Scene, SceneDocument, SlotReport};
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

mod config;
mod progress;

use config::ToolConfig;
use progress::BarProgress;

#[derive(Parser)]
#[command(name = "autobind")]
#[command(about = "Bind scene slots by name and query asset dependencies", long_about = None)]
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

    /// TOML config file with [bind] and [scan] sections
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Bind eligible slots to the uniquely named descendant of matching type
    Bind(PassArgs),

    /// Rename bound nodes to the name of the slot that holds them
    Rename(PassArgs),

    /// Categorize everything an asset depends on
    Deps(DepsArgs),

    /// Find prefabs and scenes that depend on an asset
    Refs(RefsArgs),

    /// List assets of one kind under a folder
    List(ListArgs),
}

#[derive(Args)]
struct PassArgs {
    /// Scene document (JSON)
    scene: PathBuf,

    /// Only process the host on this node path (default: every host)
    #[arg(long)]
    host: Option<String>,

    /// Report what would change without changing anything
    #[arg(long, conflicts_with = "write")]
    dry_run: bool,

    /// Write the updated scene document here
    #[arg(long, value_name = "OUT")]
    write: Option<PathBuf>,

    /// Output reports as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct DepsArgs {
    /// Project folder, or a JSON asset manifest
    project: PathBuf,

    /// Project-relative asset path, e.g. Assets/Prefabs/Hero.prefab
    asset: String,

    /// Follow only direct references
    #[arg(long)]
    direct: bool,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct RefsArgs {
    /// Project folder, or a JSON asset manifest
    project: PathBuf,

    /// Project-relative asset path
    asset: String,

    /// Folder searched for referrers (overrides config and AUTOBIND_SCOPE)
    #[arg(long)]
    scope: Option<String>,

    /// Follow only direct references
    #[arg(long)]
    direct: bool,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ListArgs {
    /// Project folder, or a JSON asset manifest
    project: PathBuf,

    /// Asset kind (prefab, model, scene, script, texture, ...)
    #[arg(long, value_parser = parse_kind)]
    kind: AssetKind,

    /// Folder to list (default: configured scope)
    #[arg(long)]
    folder: Option<String>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

fn parse_kind(name: &str) -> std::result::Result<AssetKind, String> {
    AssetKind::from_bucket(name)
        .filter(|kind| kind.is_recognized())
        .ok_or_else(|| {
            let known: Vec<&str> = AssetKind::RECOGNIZED.iter().map(|k| k.bucket()).collect();
            format!("unknown asset kind `{name}` (expected one of: {})", known.join(", "))
        })
}

fn print_stdout(text: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

fn main() -> Result<()> {
    let mut cli = Cli::parse();

    let json_output = match &cli.command {
        Commands::Bind(args) | Commands::Rename(args) => args.json,
        Commands::Deps(args) => args.json,
        Commands::Refs(args) => args.json,
        Commands::List(args) => args.json,
    };
    if json_output {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let config = ToolConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Bind(args) => run_pass(Pass::Bind, args, &config)?,
        Commands::Rename(args) => run_pass(Pass::Rename, args, &config)?,
        Commands::Deps(args) => run_deps(args, &config, cli.quiet)?,
        Commands::Refs(args) => run_refs(args, &config, cli.quiet)?,
        Commands::List(args) => run_list(args, &config, cli.quiet)?,
    }

    Ok(())
}

#[derive(Clone, Copy)]
enum Pass {
    Bind,
    Rename,
}

fn load_scene(path: &Path) -> Result<Scene> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read scene {}", path.display()))?;
    let scene = SceneDocument::from_json(&text)
        .and_then(SceneDocument::into_scene)
        .with_context(|| format!("Invalid scene {}", path.display()))?;
    Ok(scene)
}

fn run_pass(pass: Pass, args: PassArgs, config: &ToolConfig) -> Result<()> {
    let mut scene = load_scene(&args.scene)?;

    let targets: Vec<usize> = match &args.host {
        Some(path) => match scene.host_at(path) {
            Some(idx) => vec![idx],
            None => bail!("No host on node `{path}`"),
        },
        None => (0..scene.hosts.len()).collect(),
    };
    if targets.is_empty() {
        log::warn!("Scene {} declares no hosts", args.scene.display());
    }

    let mut reports: Vec<SlotReport> = Vec::with_capacity(targets.len());
    match pass {
        Pass::Bind => {
            let binder = AutoBinder::new(scene.types.clone(), config.bind.clone());
            for idx in targets {
                let report = if args.dry_run {
                    binder.plan(&scene.tree, &scene.hosts[idx])
                } else {
                    binder.resolve(&scene.tree, &mut scene.hosts[idx])
                };
                reports.push(report);
            }
        }
        Pass::Rename => {
            let renamer = NodeRenamer::new(config.bind.clone());
            for idx in targets {
                let report = if args.dry_run {
                    renamer.plan(&scene.tree, &scene.hosts[idx]).report
                } else {
                    renamer.rename_to_match_slots(&mut scene.tree, &scene.hosts[idx])
                };
                reports.push(report);
            }
        }
    }

    if let Some(out) = &args.write {
        let text = scene.to_document().to_json_pretty()?;
        fs::write(out, text).with_context(|| format!("Failed to write {}", out.display()))?;
        log::info!("Wrote {}", out.display());
    }

    if args.json {
        print_stdout(&format!("{}\n", serde_json::to_string_pretty(&reports)?))?;
    } else {
        let mut text = String::new();
        for report in &reports {
            text.push_str(&format!("[{}]\n", report.host));
            text.push_str(&report.to_string());
        }
        print_stdout(&text)?;
    }

    Ok(())
}

/// Scan a project folder, or read a manifest when `project` is a file
fn load_graph(project: &Path, config: &ToolConfig, quiet: bool) -> Result<AssetGraph> {
    if project.is_file() {
        let text = fs::read_to_string(project)
            .with_context(|| format!("Failed to read manifest {}", project.display()))?;
        let manifest = GraphBuilder::parse_manifest(&text)
            .with_context(|| format!("Invalid manifest {}", project.display()))?;
        return Ok(GraphBuilder::from_manifest(&manifest));
    }

    let builder = GraphBuilder::new(config.scan.clone())?;
    let progress = BarProgress::new("Scanning", quiet)?;
    let graph = builder
        .scan(project, &progress)
        .with_context(|| format!("Failed to scan {}", project.display()))?;
    Ok(graph)
}

fn run_query(
    graph: &AssetGraph,
    query: &Query,
    recursive: bool,
    json: bool,
    quiet: bool,
) -> Result<()> {
    if !graph.path_index.contains_key(query.asset()) {
        log::warn!("Asset not found: {}", query.asset());
    }

    let progress = BarProgress::new("Walking", quiet)?;
    let result = DependencyCategorizer::new(graph)
        .recursive(recursive)
        .with_progress(&progress)
        .categorize(query);

    if json {
        print_stdout(&format!("{}\n", serde_json::to_string_pretty(&result)?))?;
    } else {
        print_stdout(&result.to_string())?;
    }
    Ok(())
}

fn run_deps(args: DepsArgs, config: &ToolConfig, quiet: bool) -> Result<()> {
    let graph = load_graph(&args.project, config, quiet)?;
    let recursive = config.scan.recursive && !args.direct;
    run_query(
        &graph,
        &Query::dependencies_of(args.asset),
        recursive,
        args.json,
        quiet,
    )
}

fn run_refs(args: RefsArgs, config: &ToolConfig, quiet: bool) -> Result<()> {
    let graph = load_graph(&args.project, config, quiet)?;
    let scope = args.scope.unwrap_or_else(|| config.scan.scope.clone());
    let recursive = config.scan.recursive && !args.direct;
    run_query(
        &graph,
        &Query::references_to(args.asset, scope),
        recursive,
        args.json,
        quiet,
    )
}

fn run_list(args: ListArgs, config: &ToolConfig, quiet: bool) -> Result<()> {
    let graph = load_graph(&args.project, config, quiet)?;
    let folder = args.folder.unwrap_or_else(|| config.scan.scope.clone());
    let paths = graph.list_assets(args.kind, &folder);
    log::info!("{} {} assets under {}", paths.len(), args.kind, folder);

    if args.json {
        print_stdout(&format!("{}\n", serde_json::to_string_pretty(&paths)?))?;
    } else {
        let text: String = paths.iter().map(|path| format!("{path}\n")).collect();
        print_stdout(&text)?;
    }
    Ok(())
}
