use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;
use exchange_desk::{
    api::{self, AppState, auth::issue_token},
    config::{
        self,
        database::{create_connection, create_tables},
    },
    core::employee::{get_employee_by_email, seed_bootstrap_admins},
    errors::{Error, Result},
    notify::{BroadcastNotifier, DEFAULT_CHANNEL_CAPACITY, log_notifications},
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

enum Command {
    Serve,
    IssueToken(String),
}

fn parse_command() -> Result<Command> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [] => Ok(Command::Serve),
        [cmd] if cmd == "serve" => Ok(Command::Serve),
        [cmd, email] if cmd == "issue-token" => Ok(Command::IssueToken(email.clone())),
        _ => Err(Error::Config {
            message: "usage: exchange-desk [serve | issue-token <email>]".to_string(),
        }),
    }
}

#[actix_web::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; variables may also be set externally
    dotenv().ok();

    let command = parse_command()?;

    // 3. Load the main application configuration
    let app_config = config::load_default_config()
        .inspect_err(|e| error!("Critical error loading application configuration: {}", e))?;
    info!("Successfully processed application configuration.");

    // 4. Initialize database
    let db = create_connection(&app_config.database.url)
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    create_tables(&db).await?;
    info!("Database initialized successfully.");

    // 5. Seed configured administrators
    let seeded = seed_bootstrap_admins(&db, &app_config.admins).await?;
    if seeded > 0 {
        info!("Seeded {} administrator(s).", seeded);
    }

    if let Command::IssueToken(email) = command {
        let employee = get_employee_by_email(&db, &email)
            .await?
            .filter(|e| e.is_active)
            .ok_or_else(|| Error::not_found("employee", &email))?;
        println!("{}", issue_token(&employee, &app_config.auth)?);
        return Ok(());
    }

    // 6. Start the notification log consumer
    let notifier = BroadcastNotifier::new(DEFAULT_CHANNEL_CAPACITY);
    tokio::spawn(log_notifications(notifier.subscribe()));

    // 7. Run the HTTP server
    let state = web::Data::new(AppState {
        database: db,
        notifier: Arc::new(notifier),
        auth: app_config.auth.clone(),
    });
    let address = (app_config.server.host.clone(), app_config.server.port);
    info!("Listening on {}:{}", address.0, address.1);

    HttpServer::new(move || App::new().app_data(state.clone()).configure(api::configure))
        .bind(address)?
        .run()
        .await?;

    Ok(())
}
