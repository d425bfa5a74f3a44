use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::info;

use crewfit_core::app::{AppBuilder, ProjectService, bootstrap_if_empty, load_seed};
use crewfit_core::config::{CrewfitConfig, load_config};
use crewfit_core::domain::ProjectId;
use crewfit_core::impls::{GeminiOracle, InMemoryEntityStore};
use crewfit_core::observability::init_tracing;
use crewfit_core::ports::{EntityStore, SystemClock, UlidGenerator};

/// crewfit: staff projects with the right people
#[derive(Parser)]
#[command(name = "crewfit", version)]
struct Cli {
    /// Path to crewfit.toml (defaults are used when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Seed file; overrides [bootstrap].seed_path
    #[arg(long, global = true)]
    seed: Option<PathBuf>,

    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List people and projects
    List,

    /// Project counts per status
    Status,

    /// Rank the people pool against a project
    Match {
        project: ProjectId,
        #[arg(long)]
        top_n: Option<usize>,
    },

    /// Extract project fields from a document
    Extract {
        file: PathBuf,
        /// Mime type; guessed from the extension when omitted
        #[arg(long)]
        mime: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => CrewfitConfig::default(),
    };
    init_tracing(cli.verbose || config.logging.verbose)
        .map_err(|e| anyhow::anyhow!("failed to initialise logging: {e}"))?;

    let store = Arc::new(InMemoryEntityStore::new());
    if let Some(seed_path) = cli.seed.as_ref().or(config.bootstrap.seed_path.as_ref()) {
        let seed = load_seed(seed_path).await?;
        if bootstrap_if_empty(store.as_ref(), seed).await? {
            info!(path = %seed_path.display(), "store seeded");
        }
    }

    match cli.command {
        Command::List => list(&store).await,
        Command::Status => {
            let counts = local_service(store).status_counts().await?;
            println!("Not Started  {}", counts.not_started);
            println!("In Progress  {}", counts.in_progress);
            println!("Completed    {}", counts.completed);
            println!("Total        {}", counts.total());
            Ok(())
        }
        Command::Match { project, top_n } => {
            let app = AppBuilder::new()
                .store(store)
                .oracle(Arc::new(GeminiOracle::new_from_config(&config.oracle)?))
                .generate_phases(false)
                .with_config(&config)
                .build()?;
            let target = app.service.project(project).await?;
            let people = app.service.people().await?;
            let result = app
                .matching
                .find_matches(&target, &people, top_n.unwrap_or(app.top_n))
                .await?;

            for m in &result.best_matches {
                let name = people
                    .iter()
                    .find(|p| p.id == m.person_id)
                    .map_or("?", |p| p.name.as_str());
                println!("{:>5.1}%  {name}  {}", m.match_percentage, m.justification);
                for skill in &m.missing_skills {
                    match &skill.training_url {
                        Some(url) => println!("        missing {} ({url})", skill.skill),
                        None => println!("        missing {}", skill.skill),
                    }
                }
            }
            for r in &result.training_recommendations {
                println!("train {}: {}", r.person_id, r.reason);
            }
            Ok(())
        }
        Command::Extract { file, mime } => {
            let mime = match mime {
                Some(m) => m,
                None => guess_mime(&file)?.to_string(),
            };
            let app = AppBuilder::new()
                .store(store)
                .oracle(Arc::new(GeminiOracle::new_from_config(&config.oracle)?))
                .with_config(&config)
                .build()?;
            let result = app
                .extraction
                .extract_from_file(&file, &mime)
                .await
                .with_context(|| format!("extraction failed for {}", file.display()))?;
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
    }
}

async fn list(store: &InMemoryEntityStore) -> Result<()> {
    let snapshot = store.load_all().await?;
    println!("People ({})", snapshot.people.len());
    for p in &snapshot.people {
        println!(
            "  {}  {} ({}, {}y)  {}",
            p.id,
            p.name,
            p.role,
            p.experience_years,
            p.skills.join(", ")
        );
    }
    println!("Projects ({})", snapshot.projects.len());
    for p in &snapshot.projects {
        let progress = p
            .progress()
            .map_or_else(|| "-".to_string(), |r| format!("{:.0}%", r * 100.0));
        println!("  {}  {} [{}] phases {progress}", p.id, p.name, p.status);
    }
    Ok(())
}

fn local_service(store: Arc<InMemoryEntityStore>) -> ProjectService {
    let clock = Arc::new(SystemClock);
    ProjectService::new(store, clock.clone(), Arc::new(UlidGenerator::new(clock)))
}

fn guess_mime(path: &std::path::Path) -> Result<&'static str> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    Ok(match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => bail!("cannot guess mime type of {}; pass --mime", path.display()),
    })
}
