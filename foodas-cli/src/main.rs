mod commands;

use clap::{Args, Parser, Subcommand};
use foodas::auth::{SessionContext, SledStore};
use foodas::{ApiClient, AppRouter, MemoryHistory, SessionStore};
use shared::config::Config;
use shared_http::api::Role;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Api(#[from] foodas::ApiError),
    #[error("{0}")]
    Setup(#[from] shared::Error),
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("not allowed here, redirected to {0}")]
    Denied(String),
    #[error("invalid JSON output: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "foodas", about = "Restaurant directory and owner verification client")]
pub struct Cli {
    /// Overrides FOODAS_API_URL
    #[arg(long)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and store the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "FOODAS_PASSWORD", hide_env_values = true)]
        password: String,
        /// Path to continue to after signing in
        #[arg(long)]
        from: Option<String>,
    },
    Logout,
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, env = "FOODAS_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Show the signed-in user
    Whoami,
    /// Navigation links for the current user
    Menu {
        /// Highlight links active at this path
        #[arg(long, default_value = "/")]
        at: String,
    },
    /// Resolve a path through the route guard
    Open { path: String },
    Restaurants(RestaurantsCommand),
    Owner(OwnerCommand),
    Admin(AdminCommand),
    Users(UsersCommand),
}

#[derive(Args, Debug)]
pub struct RestaurantsCommand {
    #[command(subcommand)]
    pub command: RestaurantsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum RestaurantsSubcommand {
    List {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = "")]
        city: String,
    },
    Show { id: u64 },
    /// The signed-in owner's restaurant
    Mine,
    Update {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        operating_hours: Option<String>,
        #[arg(long)]
        google_maps_link: Option<String>,
    },
    /// Upload an image and attach it to the owner's restaurant
    AddPhoto {
        file: String,
        #[arg(long, default_value = "")]
        caption: String,
        #[arg(long, default_value_t = 0)]
        order: u32,
    },
    DeletePhoto { id: u64 },
}

#[derive(Args, Debug)]
pub struct OwnerCommand {
    #[command(subcommand)]
    pub command: OwnerSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum OwnerSubcommand {
    Apply {
        #[arg(long)]
        restaurant_name: String,
        #[arg(long)]
        address: String,
        #[arg(long)]
        city: String,
        #[arg(long)]
        contact_name: String,
        #[arg(long)]
        contact_phone: String,
        #[arg(long, default_value = "")]
        operating_hours: String,
        /// Proof document to upload before applying
        #[arg(long)]
        proof: Option<String>,
        /// Already uploaded proof document URL
        #[arg(long, default_value = "")]
        proof_url: String,
        #[arg(long)]
        accept_declaration: bool,
    },
    Status,
    Upload { file: String },
}

#[derive(Args, Debug)]
pub struct AdminCommand {
    #[command(subcommand)]
    pub command: AdminSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AdminSubcommand {
    List,
    Show { id: u64 },
    Approve {
        id: u64,
        #[arg(long, default_value = "")]
        notes: String,
    },
    Reject {
        id: u64,
        #[arg(long, default_value = "")]
        notes: String,
    },
}

#[derive(Args, Debug)]
pub struct UsersCommand {
    #[command(subcommand)]
    pub command: UsersSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum UsersSubcommand {
    List {
        #[arg(long, default_value = "")]
        search: String,
    },
    Show { id: u64 },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, env = "FOODAS_NEW_USER_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long, default_value = "USER")]
        role: Role,
    },
    Update {
        id: u64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        role: Option<Role>,
        #[arg(long)]
        active: Option<bool>,
    },
}

/// Everything one invocation needs, built once at startup
pub struct App {
    pub session: Arc<SessionStore>,
    pub router: AppRouter,
    pub history: Arc<MemoryHistory>,
}

impl App {
    fn open(config: Config) -> Result<Self, CliError> {
        config.validate()?;

        let store = Arc::new(SledStore::open(config.token_store_path())?);
        let context = Arc::new(SessionContext::open(store)?);
        let history = Arc::new(MemoryHistory::starting_at("/"));
        let client = ApiClient::new(config, context, history.clone())?;
        let session = Arc::new(SessionStore::new(client));
        let router = AppRouter::new(session.clone(), history.clone());

        Ok(Self {
            session,
            router,
            history,
        })
    }

    pub fn client(&self) -> &ApiClient {
        self.session.client()
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match dotenvy::dotenv() {
        Ok(path) => info!("Loaded environment variables from {}", path.display()),
        Err(_) => info!("No .env file found, using system environment variables"),
    }

    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(url) = cli.api_url.as_deref() {
        config = Config::new(url)
            .with_data_dir(config.data_dir)
            .with_request_timeout(config.request_timeout);
    }
    info!("Using API at {}", config.api_base_url);

    let app = match App::open(config) {
        Ok(app) => app,
        Err(e) => {
            error!("Startup failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    app.session.initialize().await;

    let wording = commands::wording(&cli.command);
    match commands::run(&app, cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", commands::describe(&e, wording));
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_role_arguments_parse_case_insensitively() {
        let cli = Cli::try_parse_from([
            "foodas", "users", "create", "--name", "Ravi", "--email", "ravi@example.com",
            "--password", "secret123", "--role", "admin",
        ])
        .unwrap();

        let Command::Users(UsersCommand {
            command: UsersSubcommand::Create { role, .. },
        }) = cli.command
        else {
            panic!("expected users create");
        };
        assert_eq!(role, Role::Admin);
    }

    #[test]
    fn test_unassignable_role_message_is_shown_verbatim() {
        let error = CliError::Api(foodas::ApiError::InvalidRequest(
            "Role SUPER_ADMIN cannot be assigned".to_string(),
        ));
        assert_eq!(
            commands::describe(&error, commands::wording(&Command::Whoami)),
            "Invalid request: Role SUPER_ADMIN cannot be assigned"
        );
    }
}
