//! saf-probe - Entry Point
//!
//! A thin host shell around the resolver: builds a local host from the
//! configured grants and resolves, lists, reads or writes a logical path.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use log::info;
use std::sync::Arc;

use saf_resolver::error::handlers::handle_error;
use saf_resolver::utils::logging::setup_logging;
use saf_resolver::{
    AccessIntent, AccessStrategySelector, BlockingResolver, LocalHost, LogicalPath, ResolverConfig,
    ResolverError,
};

#[derive(Parser)]
#[command(name = "saf-probe", about = "Resolve directories behind scoped access grants")]
struct Cli {
    /// Configuration file (defaults to ./config.toml when present)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a path and report how it was reached
    Resolve {
        owner: String,
        path: String,
        /// Resolve for writing, creating missing directories
        #[arg(long)]
        write: bool,
    },
    /// List the entries of a resolved directory
    List { owner: String, path: String },
    /// Print a file from a resolved directory
    Read {
        owner: String,
        path: String,
        name: String,
    },
    /// Write a file into a resolved directory
    Write {
        owner: String,
        path: String,
        name: String,
        content: String,
    },
    /// Show the consent request for a path
    Consent { owner: String, path: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ResolverConfig::load_from(path),
        None => ResolverConfig::load(),
    }
    .context("failed to load configuration")?;

    info!("Launching resolver with {} configured grants", config.grants.len());
    let host = Arc::new(LocalHost::from_config(&config.grants, config.broad_access));
    let resolver = BlockingResolver::new(AccessStrategySelector::for_host(host, config));

    if let Err(e) = run(&resolver, cli.command).await {
        if let Some(err) = e.downcast_ref::<ResolverError>() {
            handle_error(err);
        }
        return Err(e);
    }
    Ok(())
}

async fn run(resolver: &BlockingResolver, command: Command) -> Result<()> {
    match command {
        Command::Resolve { owner, path, write } => {
            let intent = if write {
                AccessIntent::Write
            } else {
                AccessIntent::Read
            };
            let handle = resolver.resolve(LogicalPath::new(owner, &path), intent).await?;
            println!(
                "{:?}: {} ({})",
                handle.quality(),
                handle.node().label(),
                handle.matched_segments().join("/")
            );
        }
        Command::List { owner, path } => {
            let handle = resolver
                .resolve(LogicalPath::new(owner, &path), AccessIntent::Read)
                .await?;
            if !handle.is_exact() {
                println!("Showing nearest ancestor: {}", handle.matched_segments().join("/"));
            }
            let entries = resolver.list(handle).await?;
            if entries.is_empty() {
                println!("Directory is empty");
            }
            for entry in entries {
                println!("{entry}");
            }
        }
        Command::Read { owner, path, name } => {
            let handle = resolver
                .resolve(LogicalPath::new(owner, &path), AccessIntent::Read)
                .await?;
            let content = resolver.read_file(handle, name).await?;
            println!("{}", String::from_utf8_lossy(&content));
        }
        Command::Write {
            owner,
            path,
            name,
            content,
        } => {
            let logical = LogicalPath::new(owner, &path);
            let handle = resolver.resolve(logical.clone(), AccessIntent::Write).await?;
            if !handle.is_exact() {
                bail!("only part of {logical} could be reached; refusing to write");
            }
            resolver
                .write_file(handle, name.clone(), content.into_bytes())
                .await?;
            println!("Wrote {name} to {logical}");
        }
        Command::Consent { owner, path } => {
            let request = resolver
                .selector()
                .consent_request(&LogicalPath::new(owner, &path));
            println!("document:      {}", request.document_id);
            println!("initial tree:  {}", request.initial_tree);
            println!("show advanced: {}", request.show_advanced);
        }
    }
    Ok(())
}
