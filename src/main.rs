use anyhow::{Context, Result};
use blogview::config::Config;
use blogview::db::Database;
use blogview::web::{self, Site};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "blogview", version, about = "Serves a blog's post, tag, and contact pages")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the site
    Serve {
        /// Directory to start searching for `blog.yaml` from
        #[arg(long, default_value = ".")]
        project: PathBuf,

        /// Address to listen on; overrides `bind` from `blog.yaml`
        #[arg(long)]
        bind: Option<String>,
    },

    /// Create the blog tables in the configured database if they're missing
    InitDb {
        #[arg(long, default_value = ".")]
        project: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match Cli::parse().command {
        Command::Serve { project, bind } => {
            actix_web::rt::System::new().block_on(serve(&project, bind))
        }
        Command::InitDb { project } => init_db(&project),
    }
}

fn init_db(project: &std::path::Path) -> Result<()> {
    let config = Config::from_directory(project)?;
    Database::open(&config.database)
        .with_context(|| format!("Initializing `{}`", config.database.display()))?;
    tracing::info!(database = %config.database.display(), "schema ready");
    Ok(())
}

async fn serve(project: &std::path::Path, bind: Option<String>) -> Result<()> {
    let config = Config::from_directory(project)?;
    let bind = bind.unwrap_or_else(|| config.bind.clone());

    // Fail before binding if the theme doesn't parse; workers parse it again.
    Site::from_config(&config).context("Loading theme")?;

    tracing::info!(
        %bind,
        site_root = %config.urls.site_root,
        database = %config.database.display(),
        "starting server"
    );
    actix_web::HttpServer::new(move || {
        let config = config.clone();
        actix_web::App::new()
            .wrap(TracingLogger::default())
            .data_factory(move || {
                let config = config.clone();
                async move { Site::from_config(&config) }
            })
            .configure(web::configure)
    })
    .bind(&bind)
    .with_context(|| format!("Binding `{}`", bind))?
    .run()
    .await?;
    Ok(())
}
