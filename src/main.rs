use anyhow::{Context, Result};
use clap::Parser;
use genius_tagger::config::{default_token_path, load_or_prompt_token};
use genius_tagger::library::{collect_audio_files, query_for};
use genius_tagger::{SearchBackend, TagOutcome, Tagger, TaggerConfig};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "genius-tagger")]
#[command(version, about = "Tag metadata into song files", long_about = None)]
struct Cli {
    /// Source file(s) or folder(s)
    #[arg(required = true, value_name = "SOURCES")]
    sources: Vec<PathBuf>,

    /// Extra search terms prepended to the file name (use if the file name
    /// alone isn't enough to find the song)
    #[arg(short, long)]
    query: Option<String>,

    /// Genius.com page to use for tagging (use if the song isn't found)
    #[arg(long, value_name = "URL")]
    genius_url: Option<String>,

    /// Genius API token (skips the token file)
    #[arg(long, env = "GENIUS_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Token file location
    #[arg(long, value_name = "PATH")]
    token_file: Option<PathBuf>,

    /// How candidate pages are searched
    #[arg(long, value_enum, default_value_t = SearchBackend::Web)]
    search: SearchBackend,
}

fn prompt_token() -> Result<String> {
    print!("Genius API token not set! Please enter token: ");
    io::stdout().flush()?;

    let mut token = String::new();
    io::stdin().read_line(&mut token)?;
    Ok(token)
}

fn resolve_token(cli: &Cli) -> Result<String> {
    if let Some(token) = cli.token.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        return Ok(token.to_string());
    }

    let path = match &cli.token_file {
        Some(path) => path.clone(),
        None => default_token_path()
            .context("Cannot locate a configuration directory for the token file")?,
    };
    load_or_prompt_token(&path, prompt_token)
}

#[tokio::main]
async fn main() -> Result<()> {
    // RUST_LOG overrides, e.g. RUST_LOG=genius_tagger=debug
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("genius_tagger=info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let token = resolve_token(&cli)?;
    let config = TaggerConfig::new(token).with_search(cli.search);
    tracing::debug!("Configuration: {:?}", config);

    let tagger = Tagger::new(&config)?;

    let files = collect_audio_files(&cli.sources).await?;
    println!("\nFound {} audio file(s)", files.len());

    let mut outcomes = Vec::with_capacity(files.len());
    for path in &files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let query = query_for(path, cli.query.as_deref());

        println!("\nTagging {}...", name);
        let outcome = tagger.tag_file(path, &query, cli.genius_url.as_deref()).await;

        match &outcome {
            TagOutcome::Tagged { new_path, display, .. } => {
                let new_name = new_path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                println!("\t{}", display);
                println!("\tRenaming file to {}...", new_name);
                println!("\tDone!");
            }
            TagOutcome::Failed { reason, .. } => {
                println!("Failed to tag! {}", reason);
            }
        }

        outcomes.push(outcome);
    }

    let tagged = outcomes.iter().filter(|o| o.is_tagged()).count();
    println!("\nTagged {} of {} file(s)", tagged, outcomes.len());

    Ok(())
}
