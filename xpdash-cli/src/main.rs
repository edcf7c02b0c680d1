//! xpdash — sign in to the learning platform and print your progress dashboard.
//!
//! # Subcommands
//! - `login [-u <identifier>] [--password <pw>] [--force]` — exchange credentials for a session
//! - `logout`                                           — forget the stored session
//! - `status`                                           — show whether the session is valid
//! - `dashboard [--json] [--all-skills]`                — fetch and summarise progress
//! - `query <query> [--variables <json>]`               — run a raw GraphQL query

mod render;

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};
use xpdash_core::{
    CredentialError, DashboardLoad, GuardActivation, GuardState, QueryOutcome, View, XpdashClient,
    XpdashConfig,
};

const DEFAULT_CONFIG: &str = "xpdash.toml";

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Debug, Parser)]
#[command(name = "xpdash", version, about = "Learning-progress dashboard in your terminal")]
struct Cli {
    /// Path to the config file (optional; defaults apply when absent)
    #[arg(short, long, env = "XPDASH_CONFIG", default_value = DEFAULT_CONFIG)]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Sign in with your username or email
    Login {
        /// Username or email
        #[arg(short = 'u', long, env = "XPDASH_IDENTIFIER")]
        identifier: Option<String>,

        /// Password (prompted for when omitted)
        #[arg(long, env = "XPDASH_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        /// Sign in again even if the current session is still valid
        #[arg(long)]
        force: bool,
    },

    /// Sign out and remove the stored session
    Logout,

    /// Show the current session status
    Status,

    /// Fetch and display the dashboard
    Dashboard {
        /// Output the dashboard as JSON
        #[arg(long)]
        json: bool,

        /// Show every skill instead of the top five
        #[arg(long)]
        all_skills: bool,
    },

    /// Run a raw GraphQL query and print the data payload as JSON
    Query {
        /// Query text
        query: String,

        /// Query variables as a JSON object
        #[arg(long)]
        variables: Option<String>,
    },
}

const SIGN_IN_AGAIN: &str = "not signed in or session expired; run `xpdash login`";

// ============================================================================
// Commands
// ============================================================================

async fn do_login(
    app: &XpdashClient,
    identifier: Option<String>,
    password: Option<String>,
    force: bool,
) -> anyhow::Result<()> {
    let mut activation = GuardActivation::redirect_if_authenticated();
    if !force {
        if let GuardState::Redirecting(View::Dashboard) = activation.check(app.session()) {
            match app.session().expires_at() {
                Some(exp) => println!("Already signed in (session valid until {}).", exp.to_rfc3339()),
                None => println!("Already signed in."),
            }
            println!("Use --force to sign in again.");
            return Ok(());
        }
    }

    let identifier = match identifier {
        Some(i) => i,
        None => dialoguer::Input::<String>::new()
            .with_prompt("Username or email")
            .interact_text()?,
    };
    let password = match password {
        Some(p) => p,
        None => dialoguer::Password::new().with_prompt("Password").interact()?,
    };

    match app.exchanger().login(&identifier, &password).await {
        Ok(_) => {
            println!("Signed in as {}.", identifier);
            Ok(())
        }
        Err(e @ CredentialError::InvalidCredentials { .. }) => Err(anyhow!(e)),
        Err(e) => Err(anyhow!(e).context("could not reach the sign-in service")),
    }
}

fn do_logout(app: &XpdashClient) -> anyhow::Result<()> {
    app.logout()?;
    println!("Signed out.");
    Ok(())
}

fn do_status(app: &XpdashClient) -> anyhow::Result<()> {
    if app.session().is_valid() {
        match app.session().expires_at() {
            Some(exp) => println!("Signed in. Session expires {}.", exp.to_rfc3339()),
            None => println!("Signed in."),
        }
    } else if app.session().current_token().is_some() {
        println!("Session expired or invalid. Run `xpdash login`.");
    } else {
        println!("Not signed in.");
    }
    Ok(())
}

async fn do_dashboard(app: &XpdashClient, json: bool, all_skills: bool) -> anyhow::Result<()> {
    let view = match app.dashboard().await? {
        DashboardLoad::Ready(view) => view,
        DashboardLoad::Redirect(_) => bail!(SIGN_IN_AGAIN),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", render::render_dashboard(&view, all_skills)?);
    }
    Ok(())
}

async fn do_query(app: &XpdashClient, query: &str, variables: Option<&str>) -> anyhow::Result<()> {
    let variables: serde_json::Value = match variables {
        Some(v) => serde_json::from_str(v).context("--variables must be a JSON object")?,
        None => serde_json::json!({}),
    };
    if !variables.is_object() {
        bail!("--variables must be a JSON object");
    }

    let outcome: QueryOutcome<serde_json::Value> = app.gateway().execute(query, variables).await?;
    match outcome {
        QueryOutcome::Data(data) => println!("{}", serde_json::to_string_pretty(&data)?),
        QueryOutcome::AuthExpired => bail!(SIGN_IN_AGAIN),
    }
    Ok(())
}

// ============================================================================
// Main
// ============================================================================

fn init_logging(level: &str) {
    let level = level.parse::<tracing::Level>().unwrap_or(tracing::Level::WARN);
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Load .env file if present (dev convenience)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = match XpdashConfig::load(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("xpdash: failed to load config from {}: {}", cli.config, e);
            std::process::exit(1);
        }
    };
    init_logging(&config.service.log_level);

    let app = match XpdashClient::from_config(&config) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("xpdash: {}", e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Login { identifier, password, force } => do_login(&app, identifier, password, force).await,
        Commands::Logout => do_logout(&app),
        Commands::Status => do_status(&app),
        Commands::Dashboard { json, all_skills } => do_dashboard(&app, json, all_skills).await,
        Commands::Query { query, variables } => do_query(&app, &query, variables.as_deref()).await,
    };

    if let Err(e) = result {
        eprintln!("xpdash: {:#}", e);
        std::process::exit(1);
    }
}

// ============================================================================
// Tests
// ============================================================================
