//! CLI entry point for canopy

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use canopy::title::TitleMode;
use canopy::Site;

#[derive(Parser)]
#[command(name = "canopy")]
#[command(version)]
#[command(about = "Serve a hierarchical markdown content tree", long_about = None)]
struct Cli {
    /// Set the site base directory (defaults to current directory)
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
    /// Start the content server
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// Render one page to HTML on stdout
    Render {
        /// Request path, e.g. /somewhere/else
        path: String,

        /// Skip the heading and details prefix
        #[arg(long)]
        no_details: bool,
    },

    /// Resolve a page title
    Title {
        /// Request path
        path: String,

        /// One of: page, title, heading, book-end
        #[arg(short, long, default_value = "page")]
        mode: String,
    },

    /// Derive the description and social image for a page
    Describe {
        /// Request path
        path: String,
    },

    /// Assemble the RSS feed to stdout
    Feed,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "canopy=debug,info"
    } else {
        "canopy=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = cli.cwd.unwrap_or_else(|| std::env::current_dir().unwrap());

    match cli.command {
        Commands::Serve { port, ip } => {
            let site = tokio::task::spawn_blocking(move || Site::new(&base_dir)).await??;
            tracing::info!("starting server at http://{}:{}", ip, port);
            canopy::server::start(site, &ip, port).await?;
        }

        Commands::Render { path, no_details } => {
            let html = tokio::task::spawn_blocking(move || -> Result<String> {
                let site = Site::new(&base_dir)?;
                Ok(site.render_page(&path, !no_details)?)
            })
            .await??;
            println!("{}", html);
        }

        Commands::Title { path, mode } => {
            let mode: TitleMode = mode.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            let title = tokio::task::spawn_blocking(move || -> Result<String> {
                let site = Site::new(&base_dir)?;
                Ok(site.page_title(&path, mode))
            })
            .await??;
            println!("{}", title);
        }

        Commands::Describe { path } => {
            let (description, image) =
                tokio::task::spawn_blocking(move || -> Result<(String, String)> {
                    let site = Site::new(&base_dir)?;
                    Ok((site.description(&path), site.social_image(&path)))
                })
                .await??;
            println!("description: {}", description);
            println!(
                "social image: {}",
                if image.is_empty() { "(none)" } else { image.as_str() }
            );
        }

        Commands::Feed => {
            let xml = tokio::task::spawn_blocking(move || -> Result<String> {
                let site = Site::new(&base_dir)?;
                Ok(site.feed()?)
            })
            .await??;
            println!("{}", xml);
        }
    }

    Ok(())
}
