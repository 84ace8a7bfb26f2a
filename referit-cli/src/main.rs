//! # referit CLI
//!
//! Command-line interface for resolving referring expressions against a
//! scene file.
//!
//! Usage:
//!   referit objects <scene.json> [--label <label>]
//!   referit resolve <scene.json> --target <label> --relation <rel> --anchor <ref>...
//!   referit resolve <scene.json> --query <query.json>
//!
//! Examples:
//!   referit objects demos/scene0536_01.json
//!   referit resolve demos/scene0536_01.json -t table -r between -a stairs -a pillow
//!   referit resolve demos/scene0536_01.json -t table -r nearest_to -a 9 --json

mod config;

use clap::{Parser, Subcommand};
use referit_scene::{
    AnchorRef, Error, ReferringExpressionResolver, Relation, Result, Scene, SceneObject,
    SceneObjectIndex, SpatialQuery,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "referit")]
#[command(author, version, about = "Find the object a spatial description refers to")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log candidate scores and anchor lookups to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print JSON instead of plain text
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the objects of a scene
    Objects {
        /// Path to the scene JSON file
        scene: PathBuf,

        /// Only list objects with this label (case-insensitive)
        #[arg(short, long)]
        label: Option<String>,
    },
    /// Resolve a referring expression to one object id
    Resolve {
        /// Path to the scene JSON file
        scene: PathBuf,

        /// Label the referred object carries
        #[arg(short, long, required_unless_present = "query")]
        target: Option<String>,

        /// between, nearest_to or farthest_from
        #[arg(short, long, required_unless_present = "query")]
        relation: Option<Relation>,

        /// Anchor object: a numeric id or a unique label (repeatable)
        #[arg(short, long = "anchor")]
        anchors: Vec<AnchorRef>,

        /// Read the whole query from a JSON file instead
        #[arg(short, long, conflicts_with_all = ["target", "relation", "anchors"])]
        query: Option<PathBuf>,

        /// Relative tolerance for treating scores as tied
        #[arg(long)]
        tolerance: Option<f64>,

        /// Resolver configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(config::LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_index(path: &Path) -> Result<SceneObjectIndex> {
    Scene::load(path)?.into_index()
}

fn to_json(value: &impl serde::Serialize) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| Error::from(e).with_operation("cli::to_json"))
}

fn format_objects<'a>(objects: impl IntoIterator<Item = &'a SceneObject>) -> String {
    let mut out = String::new();
    for obj in objects {
        out.push_str(&format!(
            "{:>5}  {:<12} center {}  size {}\n",
            obj.id,
            obj.label,
            obj.center(),
            obj.bbox.size()
        ));
    }
    if out.is_empty() {
        out.push_str("(no objects)\n");
    }
    out
}

fn list_objects(scene: &Path, label: Option<&str>, json: bool) -> Result<String> {
    let index = load_index(scene)?;
    let objects: Vec<&SceneObject> = match label {
        Some(label) => index.filter_by_label(label),
        None => index.iter().collect(),
    };

    if json {
        to_json(&objects)
    } else {
        Ok(format_objects(objects))
    }
}

fn read_query(path: &Path) -> Result<SpatialQuery> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::from(e)
            .with_operation("cli::read_query")
            .with_context("path", path.display().to_string())
    })?;
    serde_json::from_str(&content).map_err(|e| {
        Error::from(e)
            .with_operation("cli::read_query")
            .with_context("path", path.display().to_string())
    })
}

fn build_query(
    target: Option<String>,
    relation: Option<Relation>,
    anchors: Vec<AnchorRef>,
    query: Option<&Path>,
) -> Result<SpatialQuery> {
    if let Some(path) = query {
        return read_query(path);
    }
    match (target, relation) {
        (Some(target), Some(relation)) => Ok(SpatialQuery {
            target_label: target,
            relation,
            anchors,
        }),
        _ => Err(Error::invalid_argument("--target and --relation are required without --query")
            .with_operation("cli::build_query")),
    }
}

fn run(cli: Cli) -> Result<String> {
    match cli.command {
        Commands::Objects { scene, label } => list_objects(&scene, label.as_deref(), cli.json),
        Commands::Resolve {
            scene,
            target,
            relation,
            anchors,
            query,
            tolerance,
            config: config_path,
        } => {
            let query = build_query(target, relation, anchors, query.as_deref())?;
            let resolver_config = config::from_env(config_path.as_deref(), tolerance)?;
            tracing::debug!(tolerance = resolver_config.tolerance, "resolver config");
            let resolver = ReferringExpressionResolver::with_config(resolver_config)?;
            let index = load_index(&scene)?;

            let resolution = resolver.resolve_detailed(&index, &query)?;
            if cli.json {
                to_json(&resolution)
            } else {
                Ok(format!("{}\n", resolution.id))
            }
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
