//! layercake CLI - layered Spring boilerplate from JPA entity classes
//!
//! Generates repository, DTO, mapper, query, DAO (with MyBatis mapping file),
//! service and controller artifacts next to an existing entity.

use clap::{Parser, Subcommand};
use indexmap::IndexMap;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process;

use layercake::conventions::{entity_extends_base_entity, Conventions};
use layercake::java::parse_java_file;
use layercake::{
    ArtifactStatus, DirectoryIndex, EntityDescriptor, GenerationReport, GeneratorConfig, Outcome, Project,
};

#[derive(Parser)]
#[command(name = "layercake")]
#[command(version, about = "Generate layered Spring boilerplate from JPA entities", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate every layer for an entity class
    Generate {
        /// Path to the entity's .java file
        entity: PathBuf,

        /// Project root (default: nearest directory with a build file)
        #[arg(short, long)]
        project: Option<PathBuf>,

        /// Print the run report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the captured entity descriptor
    Inspect {
        /// Path to the entity's .java file
        entity: PathBuf,

        /// Print JSON instead of YAML
        #[arg(long)]
        json: bool,
    },

    /// Print the conventions the generator would apply
    Conventions {
        /// Path to the entity's .java file
        entity: PathBuf,

        /// Project root (default: nearest directory with a build file)
        #[arg(short, long)]
        project: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = GeneratorConfig::default();
    let result = match cli.command {
        Commands::Generate { entity, project, json } => {
            generate(&entity, project.as_deref(), json, &config)
        }
        Commands::Inspect { entity, json } => {
            inspect(&entity, json, &config)
        }
        Commands::Conventions { entity, project } => {
            show_conventions(&entity, project.as_deref(), &config)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn generate(entity: &Path, project: Option<&Path>, json: bool, config: &GeneratorConfig) -> Result<(), String> {
    if !json {
        println!("🔧 Generating layers for {}...", entity.display());
    }

    let outcome = layercake::generate(entity, config, project)
        .map_err(|e| format!("Generation failed: {}", e))?;

    if json {
        let rendered = serde_json::to_string_pretty(&outcome)
            .map_err(|e| format!("Failed to serialize report: {}", e))?;
        println!("{}", rendered);
        return Ok(());
    }

    match outcome {
        Outcome::Skipped { class_name, reason } => {
            println!("  ℹ Skipped {}: {}", class_name, reason);
        }
        Outcome::Generated(report) => print_report(&report),
    }
    Ok(())
}

fn print_report(report: &GenerationReport) {
    for dir in &report.created_dirs {
        println!("  📁 {}", dir.display());
    }
    for artifact in &report.artifacts {
        let marker = match artifact.status {
            ArtifactStatus::Created => "✓ created",
            ArtifactStatus::Reused => "↺ reused ",
            ArtifactStatus::Skipped => "⏭ skipped",
        };
        println!("  {} {:<22} {}", marker, artifact.kind.as_str(), artifact.path.display());
    }
    println!(
        "\n✅ {}: {} created, {} reused, {} skipped",
        report.entity,
        report.count(ArtifactStatus::Created),
        report.count(ArtifactStatus::Reused),
        report.count(ArtifactStatus::Skipped)
    );
}

fn inspect(entity: &Path, json: bool, config: &GeneratorConfig) -> Result<(), String> {
    let class = parse_java_file(entity).map_err(|e| e.to_string())?;
    // Inherited fields need the project; inspect still works on a lone file
    let project = Project::discover(&class, None, config).ok();
    let descriptor = EntityDescriptor::capture(&class, project.as_ref(), config)
        .ok_or_else(|| format!("{} is not a persistence entity", class.name))?;

    let rendered = if json {
        serde_json::to_string_pretty(&descriptor).map_err(|e| e.to_string())?
    } else {
        serde_yaml::to_string(&descriptor).map_err(|e| e.to_string())?
    };
    println!("{}", rendered);
    Ok(())
}

#[derive(Serialize)]
struct ConventionsView<'a> {
    project_root: &'a Path,
    source_root: &'a Path,
    resources_root: &'a Path,
    detected: &'a Conventions,
    entity_extends_base_entity: bool,
    directory_collisions: &'a IndexMap<String, Vec<PathBuf>>,
    config: &'a GeneratorConfig,
}

fn show_conventions(entity: &Path, project: Option<&Path>, config: &GeneratorConfig) -> Result<(), String> {
    let class = parse_java_file(entity).map_err(|e| e.to_string())?;
    let project = Project::discover(&class, project, config).map_err(|e| e.to_string())?;
    let descriptor = EntityDescriptor::capture(&class, Some(&project), config)
        .ok_or_else(|| format!("{} is not a persistence entity", class.name))?;

    let container = entity.parent().unwrap_or(project.source_root());
    let dirs = DirectoryIndex::build(container, &config.source_root_marker, project.root());
    let conventions = Conventions::detect(&project, config);

    let view = ConventionsView {
        project_root: project.root(),
        source_root: project.source_root(),
        resources_root: project.resources_root(),
        detected: &conventions,
        entity_extends_base_entity: entity_extends_base_entity(&descriptor, &project, config),
        directory_collisions: dirs.collisions(),
        config,
    };
    let rendered = serde_yaml::to_string(&view).map_err(|e| e.to_string())?;
    println!("{}", rendered);
    Ok(())
}
