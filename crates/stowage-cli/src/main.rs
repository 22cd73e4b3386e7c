//! Stowage - signature server and command-line uploader

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use stowage_cli::{
    commands::{self, UploadArgs},
    run_server_with_shutdown, SignatureServerConfig,
};
use stowage_client::DEFAULT_ENDPOINT;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "stowage")]
#[command(about = "Signature server and uploader for Stowage presigned uploads")]
#[command(version)]
struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true, env = "STOWAGE_DEBUG")]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the signature endpoint server
    Serve {
        /// Host to bind to
        #[arg(short = 'H', long, default_value = "127.0.0.1", env = "STOWAGE_HOST")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value = "8787", env = "STOWAGE_PORT")]
        port: u16,

        /// Secret key used for signing
        #[arg(long, env = "STOWAGE_SECRET_KEY", hide_env_values = true)]
        secret_key: String,

        /// Route serving signatures
        #[arg(long, default_value = "/api/signature")]
        route: String,

        /// Allowed CORS origins (repeatable, `*` for any)
        #[arg(long = "cors-origin", default_value = "*")]
        cors_origins: Vec<String>,

        /// Disable CORS headers
        #[arg(long)]
        no_cors: bool,
    },

    /// Print one signed payload as JSON
    Sign {
        /// Secret key used for signing
        #[arg(long, env = "STOWAGE_SECRET_KEY", hide_env_values = true)]
        secret_key: String,
    },

    /// Upload a file and print the stored object as JSON
    Upload {
        /// File to upload
        file: PathBuf,

        /// Public key of the application
        #[arg(long, env = "STOWAGE_PUBLIC_KEY")]
        public_key: String,

        /// API base URL
        #[arg(long, default_value = DEFAULT_ENDPOINT, env = "STOWAGE_ENDPOINT")]
        endpoint: String,

        /// Display name (defaults to the file name)
        #[arg(long)]
        name: Option<String>,

        /// Destination path
        #[arg(long)]
        path: Option<String>,

        /// Content type (guessed from the extension by default)
        #[arg(long)]
        content_type: Option<String>,

        /// Signature endpoint to call before preparing the upload
        #[arg(long, env = "STOWAGE_SIGNATURE_URL")]
        signature_url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Setup logging
    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "stowage={0},stowage_cli={0},stowage_client={0},tower_http={0}",
                    log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match args.command {
        Command::Serve {
            host,
            port,
            secret_key,
            route,
            cors_origins,
            no_cors,
        } => {
            if no_cors {
                tracing::warn!("CORS is disabled - browsers on other origins cannot reach the endpoint");
            }

            let config = SignatureServerConfig {
                host,
                port,
                secret_key,
                signature_route: route,
                cors_enabled: !no_cors,
                cors_origins,
            };

            run_server_with_shutdown(config, async {
                tokio::signal::ctrl_c().await.ok();
            })
            .await
        }
        Command::Sign { secret_key } => {
            let signed = commands::sign(&secret_key)?;
            println!("{}", serde_json::to_string_pretty(&signed)?);
            Ok(())
        }
        Command::Upload {
            file,
            public_key,
            endpoint,
            name,
            path,
            content_type,
            signature_url,
        } => {
            let result = commands::upload(UploadArgs {
                file,
                public_key,
                endpoint,
                name,
                path,
                content_type,
                signature_url,
            })
            .await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
    }
}
