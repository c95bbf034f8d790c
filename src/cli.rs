///
/// This module implements the CLI interface for prep-organizer: command parsing,
/// input reading, and the orchestration that ties the core crate together.
///
/// All core logic (URL parsing, file rendering, the publish protocol) lives in
/// [`prep_organizer_core`]. This module is glue: it reads the solution and notes,
/// decides where output goes, and prints results.
///
/// ## How To Use
/// - From the shell: `prep-organizer --help`.
/// - Programmatically / in tests: call [`run`] with a constructed [`Cli`].
///
/// ## Output
/// Command results go to stdout; logs go to stderr via `tracing`.
use crate::github::GithubClient;
use crate::load_config::{load_config, resolve_store_path};
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use prep_organizer_core::config::Config;
use prep_organizer_core::contract::PublishError;
use prep_organizer_core::problem::{parse_problem_url, ProblemRecord};
use prep_organizer_core::publisher::{PublishKind, PublishRequest, RemotePublisher};
use prep_organizer_core::store::FileStore;
use prep_organizer_core::template::{render_solution_file, solution_file_name};
use std::io::Read;
use std::path::{Path, PathBuf};

pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

/// CLI for prep-organizer: capture interview problems with your solution and notes.
#[derive(Parser, Debug)]
#[clap(
    name = "prep-organizer",
    version,
    about = "Save coding-interview solutions locally or commit them to GitHub"
)]
pub struct Cli {
    /// Path to the YAML config file
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show what a problem URL parses to
    Parse {
        url: String,
        /// Print the record as JSON
        #[clap(long)]
        json: bool,
    },
    /// Render the solution file and write it to a local directory
    Save {
        #[clap(long)]
        url: String,
        /// File holding the solution code, or `-` for stdin
        #[clap(long)]
        solution: PathBuf,
        /// File holding free-form notes
        #[clap(long)]
        notes: Option<PathBuf>,
        /// Directory to write into (defaults to output.dir, then the current directory)
        #[clap(long)]
        out_dir: Option<PathBuf>,
    },
    /// Render the solution file and commit it to a GitHub repository
    Publish {
        #[clap(long)]
        url: String,
        /// File holding the solution code, or `-` for stdin
        #[clap(long)]
        solution: PathBuf,
        /// File holding free-form notes
        #[clap(long)]
        notes: Option<PathBuf>,
        /// Target repository as owner/name (defaults to github.repository)
        #[clap(long)]
        repo: Option<String>,
        /// Commit message (defaults to "Add solution for <title> - MM/DD")
        #[clap(long)]
        message: Option<String>,
    },
    /// List repositories for the stored credential, most recently updated first
    Repos,
    /// Manage the stored GitHub credential
    Auth {
        #[clap(subcommand)]
        action: AuthCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum AuthCommand {
    /// Store a GitHub token (from --token or GITHUB_TOKEN)
    Login {
        #[clap(long)]
        token: Option<String>,
    },
    /// Remove the stored token
    Logout,
    /// Show which account the stored token belongs to
    Status,
}

/// Async CLI entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    tracing::info!("trace_initialised");

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Parse { url, json } => parse_command(&config, &url, json),
        Commands::Save {
            url,
            solution,
            notes,
            out_dir,
        } => save_command(&config, &url, &solution, notes.as_deref(), out_dir),
        Commands::Publish {
            url,
            solution,
            notes,
            repo,
            message,
        } => {
            publish_command(
                &config,
                &url,
                &solution,
                notes.as_deref(),
                repo,
                message,
            )
            .await
        }
        Commands::Repos => repos_command(&config).await,
        Commands::Auth { action } => auth_command(&config, action).await,
    }
}

fn build_publisher(config: &Config) -> Result<RemotePublisher<GithubClient, FileStore>> {
    let store_path = resolve_store_path(config)?;
    tracing::debug!(store_path = %store_path.display(), "Using credential store");
    let client = GithubClient::from_config(&config.github)
        .context("Failed to construct GitHub client")?;
    Ok(RemotePublisher::new(client, FileStore::new(store_path)))
}

fn require_problem(url: &str) -> Result<ProblemRecord> {
    match parse_problem_url(url) {
        Some(record) => Ok(record),
        None => {
            tracing::warn!(url, "Unsupported problem URL");
            bail!(
                "Unsupported problem URL: {url}\n\
                 Expected https://leetcode.com/problems/<slug> or https://neetcode.io/problem/<slug>"
            )
        }
    }
}

fn read_input(path: &Path, what: &str) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .with_context(|| format!("Failed to read {what} from stdin"))?;
        return Ok(buf);
    }
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {what} from {}", path.display()))
}

/// Parses the URL and renders the file; refuses to continue without a solution.
fn prepare(
    url: &str,
    solution: &Path,
    notes: Option<&Path>,
) -> Result<(ProblemRecord, String)> {
    let record = require_problem(url)?;
    let solution = read_input(solution, "solution")?;
    if solution.trim().is_empty() {
        bail!("Missing solution: the solution input is empty");
    }
    let notes = match notes {
        Some(path) => read_input(path, "notes")?,
        None => String::new(),
    };
    let content = render_solution_file(&record, &solution, &notes);
    Ok((record, content))
}

fn parse_command(config: &Config, url: &str, json: bool) -> Result<()> {
    let record = require_problem(url)?;
    let file_name = solution_file_name(&record.title, &config.output.extension);
    if json {
        let value = serde_json::json!({
            "title": record.title,
            "platform": record.platform,
            "url": record.url,
            "identifier": record.identifier(),
            "file_name": file_name,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("Title:      {}", record.title);
        println!("Platform:   {}", record.platform.display_name());
        println!("Identifier: {}", record.identifier());
        println!("File:       {file_name}");
        println!("URL:        {}", record.url);
    }
    Ok(())
}

fn save_command(
    config: &Config,
    url: &str,
    solution: &Path,
    notes: Option<&Path>,
    out_dir: Option<PathBuf>,
) -> Result<()> {
    let (record, content) = prepare(url, solution, notes)?;
    let dir = out_dir
        .or_else(|| config.output.dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let target = dir.join(solution_file_name(&record.title, &config.output.extension));
    std::fs::write(&target, &content)
        .with_context(|| format!("Failed to write {}", target.display()))?;
    tracing::info!(path = %target.display(), bytes = content.len(), "Solution file saved");
    println!("Saved {}", target.display());
    Ok(())
}

async fn publish_command(
    config: &Config,
    url: &str,
    solution: &Path,
    notes: Option<&Path>,
    repo: Option<String>,
    message: Option<String>,
) -> Result<()> {
    let (record, content) = prepare(url, solution, notes)?;
    let Some(repository) = repo.or_else(|| config.github.repository.clone()) else {
        bail!("No target repository: pass --repo owner/name or set github.repository in the config");
    };
    if repository.split('/').filter(|s| !s.is_empty()).count() != 2 {
        bail!("Repository must look like owner/name, got {repository:?}");
    }

    let mut request = PublishRequest::for_problem(
        &record,
        &repository,
        config.github.directory.as_deref(),
        &config.output.extension,
        content,
    );
    if let Some(message) = message {
        request.message = message;
    }

    let publisher = build_publisher(config)?;
    match publisher.publish(&request).await {
        Ok(outcome) => {
            let verb = match outcome.kind {
                PublishKind::Created => "Created",
                PublishKind::Updated => "Updated",
            };
            println!("{verb} {} in {}", request.path, request.repository);
            if let Some(commit) = outcome.commit_sha {
                println!("Commit: {commit}");
            }
            Ok(())
        }
        Err(e) => Err(explain(e).context("Publishing to GitHub failed")),
    }
}

async fn repos_command(config: &Config) -> Result<()> {
    let publisher = build_publisher(config)?;
    let repos = publisher.list_repositories().await.map_err(explain)?;
    if repos.is_empty() {
        println!("No repositories found.");
    }
    for repo in repos {
        let visibility = if repo.is_private { "private" } else { "public" };
        println!("{}\t{visibility}", repo.full_name);
    }
    Ok(())
}

async fn auth_command(config: &Config, action: AuthCommand) -> Result<()> {
    let publisher = build_publisher(config)?;
    match action {
        AuthCommand::Login { token } => {
            let token = match token.or_else(|| std::env::var(TOKEN_ENV).ok()) {
                Some(token) if !token.trim().is_empty() => token.trim().to_string(),
                _ => bail!("No token given: pass --token or set {TOKEN_ENV}"),
            };
            publisher.set_credential(&token)?;
            println!("Token stored.");
        }
        AuthCommand::Logout => {
            publisher.clear_credential()?;
            println!("Token removed.");
        }
        AuthCommand::Status => {
            let identity = publisher.fetch_identity().await.map_err(explain)?;
            match identity.name {
                Some(name) => println!("Logged in as {} ({name})", identity.login),
                None => println!("Logged in as {}", identity.login),
            }
        }
    }
    Ok(())
}

/// Adds the next step a user should take to credential-related failures.
fn explain(e: PublishError) -> anyhow::Error {
    match e {
        PublishError::NoCredential => {
            anyhow::Error::new(e).context("Run `prep-organizer auth login --token <TOKEN>` first")
        }
        PublishError::Unauthorized { .. } => anyhow::Error::new(e)
            .context("The stored token was rejected; run `prep-organizer auth login` with a fresh token"),
        other => anyhow::Error::new(other),
    }
}
