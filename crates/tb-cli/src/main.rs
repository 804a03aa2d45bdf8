mod config;
mod http;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tb_core::{Kept, Persisted, RecordId, RunOutcome, TemplateStore, ThoughtBuffer};
use tb_store::DirStore;

use crate::config::Config;
use crate::http::HttpBackend;

const DEFAULT_QUESTION: &str = "Write Python code to find the maximum value of x^3+2*x-10 \
in the interval [0,100] and output the corresponding x.";

#[derive(Parser)]
#[command(name = "tb", about = "Buffer-of-thoughts question answering with reusable thought templates")]
struct Cli {
    /// Directory holding the thought templates
    #[arg(long, global = true)]
    templates_dir: Option<PathBuf>,

    /// TOML config file (defaults to $TB_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a question, then learn or refine a thought template from it
    Ask {
        /// Question text
        #[arg(default_value = DEFAULT_QUESTION)]
        question: String,
    },

    /// List stored thought templates
    List,

    /// Print one stored thought template
    Show {
        /// Record id, as printed by `list`
        id: String,
    },
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::resolve(cli.config.as_deref(), |key| std::env::var(key).ok())?;
    if let Some(dir) = &cli.templates_dir {
        config.store.dir = dir.clone();
    }
    Ok(config)
}

fn open_store(dir: &Path) -> Result<DirStore> {
    DirStore::open(dir)
        .with_context(|| format!("failed to open template store at {}", dir.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(&cli)?;
    match &cli.command {
        Commands::Ask { question } => cmd_ask(&cli, &config, question),
        Commands::List => cmd_list(&config),
        Commands::Show { id } => cmd_show(&config, id),
    }
}

fn cmd_ask(cli: &Cli, config: &Config, question: &str) -> Result<()> {
    let mut store = open_store(&config.store.dir)?;
    let api_key = config.backend.api_key(|key| std::env::var(key).ok())?;
    let backend = HttpBackend::new(config.backend.clone(), api_key)?;
    let mut rng = SmallRng::from_os_rng();

    let outcome = ThoughtBuffer::new(backend)
        .run(question, &mut store, &mut rng)
        .context("run failed, no template was stored")?;

    println!("{}", outcome.answer);
    if cli.verbose {
        eprintln!("--- {} ---", summarize(&outcome));
    }
    Ok(())
}

fn summarize(outcome: &RunOutcome) -> String {
    let used = outcome
        .selected
        .as_ref()
        .map_or_else(|| "none".to_string(), RecordId::to_string);
    let stored = match &outcome.persisted {
        Persisted::Created(id) => format!("created {id}"),
        Persisted::Overwritten { id, kept } => {
            let kept = match kept {
                Kept::Original => "original",
                Kept::Derived => "derived",
            };
            format!("overwrote {id}, kept {kept}")
        }
    };
    format!("template used: {used}, {stored}")
}

fn cmd_list(config: &Config) -> Result<()> {
    let store = open_store(&config.store.dir)?;
    let templates = store.load_all().context("failed to load templates")?;

    if templates.is_empty() {
        println!("(no templates)");
        return Ok(());
    }
    for template in &templates {
        if let Some(id) = &template.locator {
            println!("{id}\t{}", template.title);
        }
    }
    Ok(())
}

fn cmd_show(config: &Config, id: &str) -> Result<()> {
    let store = open_store(&config.store.dir)?;
    let id = RecordId::new(id);
    let template = store
        .get(&id)
        .with_context(|| format!("failed to load template {id}"))?
        .with_context(|| format!("no template with id {id}"))?;

    println!("{}\n\n{}", template.title, template.content);
    Ok(())
}
