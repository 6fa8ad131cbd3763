use recipebox_server::config::Config;
use recipebox_server::{api, app, db, telemetry, AppState};
use std::env;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // Check for --openapi flag to dump spec and exit
    if env::args().any(|arg| arg == "--openapi") {
        match api::openapi().to_pretty_json() {
            Ok(spec) => {
                println!("{}", spec);
                return ExitCode::SUCCESS;
            }
            Err(e) => {
                eprintln!("Failed to serialize OpenAPI spec: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    telemetry::init_telemetry();

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    if env::args().any(|arg| arg == "--revert-migrations") {
        return revert_migrations(&config.database_url);
    }

    let pool = match db::create_pool(&config.database_url) {
        Ok(p) => p,
        Err(e) => {
            tracing::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let bind_addr = config.bind_addr.clone();
    let app = app(AppState::new(pool, config));

    let listener = match tokio::net::TcpListener::bind(&bind_addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", bind_addr, e);
            return ExitCode::FAILURE;
        }
    };

    tracing::info!("Server listening on {}", bind_addr);
    tracing::info!("Swagger UI available at /swagger-ui/");
    tracing::info!("OpenAPI spec available at /api-docs/openapi.json");

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Roll the schema all the way back. Used to reset a development database.
fn revert_migrations(database_url: &str) -> ExitCode {
    use diesel::Connection;

    let mut conn = match diesel::PgConnection::establish(database_url) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Failed to connect to database: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match db::revert_migrations(&mut conn) {
        Ok(reverted) => {
            for version in &reverted {
                tracing::info!("Reverted migration {}", version);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
