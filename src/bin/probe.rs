//! Script mode binary for exercising a portal
//!
//! One-shot subcommands against a configured portal, printing JSON to
//! stdout. This is the consuming-collaborator side of the library
//! contract, useful for manual verification against a live portal.
//!
//! # Usage
//!
//! ```bash
//! stb-portal-probe --config portal.toml categories --kind catalog
//! stb-portal-probe --config portal.toml listing --kind catalog --category 12 --page 1
//! stb-portal-probe --config portal.toml stream --kind channel --id 99 --cmd "ffrt http://..." --prefer-raw
//! stb-portal-probe --config portal.toml favorite add --kind catalog --id 122
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stb_portal_client::{
    PortalClient,
    config::ConfigLoader,
    portal::{ListingRequest, StreamRequest},
    types::ContentKind,
    utils::get_version,
};

#[derive(Parser)]
#[command(author, about, long_about = None)]
#[command(name = "stb-portal-probe")]
#[command(disable_version_flag = true)]
struct Cli {
    /// Configuration file (TOML); environment variables override it
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Show version information
    #[arg(long)]
    version: bool,

    /// Enable verbose logging
    #[arg(long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

/// Content domain selector for probe subcommands
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Kind {
    Catalog,
    Channel,
    Series,
}

impl From<Kind> for ContentKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Catalog => ContentKind::Catalog,
            Kind::Channel => ContentKind::Channel,
            Kind::Series => ContentKind::Series,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Fetch the category or genre catalog for a content domain
    Categories {
        /// Content domain
        #[arg(long, value_enum)]
        kind: Kind,
    },
    /// Fetch one logical listing page (a window of upstream pages)
    Listing {
        /// Content domain
        #[arg(long, value_enum)]
        kind: Kind,
        /// Category or genre identifier
        #[arg(long)]
        category: Option<String>,
        /// Start page of the window
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Search filter (blank terms are omitted)
        #[arg(long)]
        search: Option<String>,
        /// Restrict to favorited content
        #[arg(long)]
        favorites: bool,
    },
    /// Resolve a playable stream URL
    Stream {
        /// Content domain
        #[arg(long, value_enum)]
        kind: Kind,
        /// Content identifier
        #[arg(long)]
        id: String,
        /// Episode index for series content
        #[arg(long, default_value_t = 0)]
        episode: u32,
        /// Raw upstream playback command (fallback strategy input)
        #[arg(long)]
        cmd: Option<String>,
        /// Resolve by raw command directly
        #[arg(long)]
        prefer_raw: bool,
    },
    /// Toggle a favorite
    Favorite {
        #[command(subcommand)]
        op: FavoriteOp,
    },
}

#[derive(Subcommand)]
enum FavoriteOp {
    /// Mark content as a favorite
    Add {
        /// Content domain
        #[arg(long, value_enum)]
        kind: Kind,
        /// Content identifier
        #[arg(long)]
        id: String,
    },
    /// Remove content from favorites
    Remove {
        /// Content domain
        #[arg(long, value_enum)]
        kind: Kind,
        /// Content identifier
        #[arg(long)]
        id: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Handle version flag early
    if cli.version {
        println!("{}", get_version());
        return Ok(());
    }

    // Initialize logging (stderr only; stdout is reserved for JSON output)
    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let Some(command) = cli.command else {
        eprintln!("No subcommand given; see --help");
        std::process::exit(2);
    };

    let settings = ConfigLoader::new().load(cli.config.as_deref())?;
    let mut client = PortalClient::new(settings)?;

    match command {
        Command::Categories { kind } => {
            let categories = client.get_categories(kind.into())?;
            println!("{}", serde_json::to_string_pretty(&categories)?);
        }
        Command::Listing {
            kind,
            category,
            page,
            search,
            favorites,
        } => {
            let mut request = ListingRequest::new(kind.into()).favorites_only(favorites);
            if let Some(category) = category {
                request = request.with_category(category);
            }
            if let Some(search) = search {
                request = request.with_search_term(search);
            }
            let listing = client.get_listing(&request, page)?;
            println!("{}", serde_json::to_string_pretty(&listing)?);
        }
        Command::Stream {
            kind,
            id,
            episode,
            cmd,
            prefer_raw,
        } => {
            let mut request = StreamRequest::new(kind.into(), id)
                .with_episode(episode)
                .prefer_raw_cmd(prefer_raw);
            if let Some(cmd) = cmd {
                request = request.with_raw_cmd(cmd);
            }
            let url = client.resolve_stream(&request)?;
            println!("{}", serde_json::json!({ "url": url }));
        }
        Command::Favorite { op } => {
            let (kind, id, added) = match op {
                FavoriteOp::Add { kind, id } => {
                    client.add_favorite(kind.into(), &id)?;
                    (kind, id, true)
                }
                FavoriteOp::Remove { kind, id } => {
                    client.remove_favorite(kind.into(), &id)?;
                    (kind, id, false)
                }
            };
            println!(
                "{}",
                serde_json::json!({
                    "kind": ContentKind::from(kind).as_str(),
                    "id": id,
                    "favorite": added,
                })
            );
        }
    }

    Ok(())
}
