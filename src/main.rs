//! CLI entry point for roal-site

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "roal-site")]
#[command(version)]
#[command(about = "RO-AL Mobileri website and bilingual blog", long_about = None)]
struct Cli {
    /// Set the site directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web server
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Read posts from a JSON export instead of Firestore
        #[arg(long)]
        posts: Option<PathBuf>,
    },

    /// Write sitemap.xml
    Sitemap {
        /// Output file (`-` for stdout, defaults to public/sitemap.xml)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Read posts from a JSON export instead of Firestore
        #[arg(long)]
        posts: Option<PathBuf>,
    },

    /// List blog posts
    List {
        /// Language to list titles and dates in (en, sq)
        #[arg(short, long, default_value = "en")]
        lang: String,

        /// Read posts from a JSON export instead of Firestore
        #[arg(long)]
        posts: Option<PathBuf>,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "roal_site=debug,tower_http=debug,info"
    } else {
        "roal_site=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Serve { port, ip, posts } => {
            let site = roal_site::Site::new(&base_dir)?;
            let store = site.store(posts.as_deref())?;

            tracing::info!("Starting server at http://{}:{}", ip, port);
            roal_site::server::start(&site, store, &ip, port).await?;
        }

        Commands::Sitemap { output, posts } => {
            let site = roal_site::Site::new(&base_dir)?;
            let store = site.store(posts.as_deref())?;
            roal_site::commands::sitemap::run(&site, &store, output.as_deref()).await?;
        }

        Commands::List { lang, posts } => {
            let site = roal_site::Site::new(&base_dir)?;
            let store = site.store(posts.as_deref())?;
            roal_site::commands::list::run(&store, &lang).await?;
        }

        Commands::Version => {
            println!("roal-site version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
