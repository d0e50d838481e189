use std::sync::Arc;

use clap::Parser;
use poem::{listener::TcpListener, Server};

use estagiogo_backend::api;
use estagiogo_backend::cli::{self, Cli, Commands};
use estagiogo_backend::config::{self, init_logging, LoggingConfig, ServerSettings, SystemEnvironment};
use estagiogo_backend::AppData;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let env = SystemEnvironment;
    init_logging(&LoggingConfig::from_env_provider(&env))?;

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Serve { host: None, port: None });

    let settings = ServerSettings::from_env_provider(&env)?;
    let db = config::connect(settings.database_url()).await?;

    match command {
        Commands::Migrate => {
            config::migrate(&db).await?;
            tracing::info!("Migrations completed");
            Ok(())
        }
        Commands::Serve { host, port } => {
            config::migrate(&db).await?;
            let settings = settings.with_overrides(host, port);
            let app_data = Arc::new(AppData::init(db, &env)?);
            serve(app_data, &settings).await
        }
        command => {
            config::migrate(&db).await?;
            let app_data = Arc::new(AppData::init(db, &env)?);
            cli::execute_command(command, app_data).await
        }
    }
}

async fn serve(app_data: Arc<AppData>, settings: &ServerSettings) -> Result<(), Box<dyn std::error::Error>> {
    let address = settings.server_address();
    let public_url = format!("http://localhost:{}", settings.port());
    let app = api::build_app(app_data, &public_url);

    tracing::info!("Starting server on http://{}", address);
    tracing::info!("Swagger UI available at {}/swagger", public_url);
    tracing::info!("API endpoints available at {}/api", public_url);

    Server::new(TcpListener::bind(address)).run(app).await?;

    Ok(())
}
