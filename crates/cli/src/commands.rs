use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, anyhow, bail};
use clap::{Args, Subcommand};
use serde_json::{Value, json};

use deliveryhub_auth::{Action, Resource, Session, explain_access};
use deliveryhub_client::dashboard::{CURRENCY, CardFormat};
use deliveryhub_client::sections::{RouteDecision, route_guard};
use deliveryhub_client::{
    ClientConfig, Credentials, DashboardOverview, DashboardService, FileTokenStore, HttpApiClient,
    Registration, Section, SessionManager,
};

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and store the session tokens.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "DELIVERYHUB_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create a tenant and its owner account.
    Register(RegisterArgs),
    /// Sign out and forget the stored tokens.
    Logout,
    /// Print the current session.
    Whoami,
    /// Check whether the current user may perform an action on a resource.
    Can {
        resource: String,
        #[arg(default_value = "read")]
        action: String,
        /// Print the rule that decided the check.
        #[arg(long)]
        explain: bool,
    },
    /// List dashboard sections and whether each is reachable.
    Sections {
        /// Check a single route instead, e.g. `/orders/42`.
        path: Option<String>,
    },
    /// Show the landing dashboard summary.
    Dashboard {
        /// Keep refreshing at the configured interval.
        #[arg(long)]
        watch: bool,
    },
    /// Request a password reset email.
    ForgotPassword {
        #[arg(long)]
        email: String,
    },
    /// Set a new password using a reset token.
    ResetPassword {
        #[arg(long)]
        token: String,
        #[arg(long, env = "DELIVERYHUB_NEW_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[derive(Debug, Args)]
pub struct RegisterArgs {
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    email: String,
    #[arg(long, env = "DELIVERYHUB_PASSWORD", hide_env_values = true)]
    password: String,
    #[arg(long)]
    company: String,
    #[arg(long)]
    phone: Option<String>,
}

pub async fn run(
    command: Command,
    manager: &SessionManager,
    api: Arc<HttpApiClient>,
    tokens: &FileTokenStore,
    config: &ClientConfig,
) -> anyhow::Result<()> {
    match command {
        Command::Login { email, password } => {
            manager.login(&Credentials::new(email, password)).await?;
            print_greeting(manager);
        }
        Command::Register(args) => {
            let registration = Registration {
                first_name: args.first_name,
                last_name: args.last_name,
                email: args.email,
                password: args.password,
                company_name: args.company,
                phone: args.phone,
            };
            manager.register(&registration).await?;
            print_greeting(manager);
        }
        Command::Logout => {
            manager.logout().await?;
            println!("Signed out.");
        }
        Command::Whoami => {
            let report = whoami_report(&manager.snapshot(), tokens.path());
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Can {
            resource,
            action,
            explain,
        } => {
            let session = manager.snapshot();
            let resource = Resource::from(resource);
            let action = Action::from(action);
            if explain {
                let explanation = explain_access(session.user(), &resource, &action);
                println!("{}", serde_json::to_string_pretty(&explanation)?);
            } else {
                let allowed = session.can_access(&resource, &action);
                println!("{}", if allowed { "allowed" } else { "denied" });
            }
        }
        Command::Sections { path } => {
            let session = manager.snapshot();
            let sections = match path {
                Some(path) => vec![section_for(&path)?],
                None => Section::ALL.to_vec(),
            };
            for section in sections {
                let status = describe(route_guard(&session, section));
                println!("{:<20} {:<22} {}", section.title(), section.path(), status);
            }
        }
        Command::Dashboard { watch } => {
            let service = DashboardService::new(api, config.query_retries);
            loop {
                let session = manager.snapshot();
                let overview = service
                    .overview(&session)
                    .await
                    .context("Failed to load dashboard")?;
                let Some(overview) = overview else {
                    bail!("Not signed in; run `deliveryhub login` first");
                };
                print_overview(&overview);

                if !watch {
                    break;
                }
                tokio::time::sleep(config.dashboard_refresh).await;
            }
        }
        Command::ForgotPassword { email } => {
            manager.forgot_password(&email).await?;
            println!("If an account exists for {email}, a reset email is on its way.");
        }
        Command::ResetPassword { token, password } => {
            manager.reset_password(&token, &password).await?;
            println!("Password updated. You can now sign in.");
        }
    }

    Ok(())
}

fn whoami_report(session: &Session, token_path: &Path) -> Value {
    json!({
        "session": session.view(),
        "tokenPath": token_path.display().to_string(),
    })
}

fn section_for(path: &str) -> anyhow::Result<Section> {
    Section::for_path(path).ok_or_else(|| anyhow!("No dashboard section at {path}"))
}

fn describe(decision: RouteDecision) -> &'static str {
    match decision {
        RouteDecision::Allow => "allowed",
        RouteDecision::Forbidden => "forbidden",
        RouteDecision::RedirectToLogin => "sign in required",
        RouteDecision::Pending => "pending",
    }
}

fn print_greeting(manager: &SessionManager) {
    let session = manager.snapshot();
    if let (Some(user), Some(tenant)) = (session.user(), session.tenant()) {
        println!(
            "Signed in as {} ({}) at {}.",
            user.display_name(),
            user.role,
            tenant.name
        );
    }
}

fn print_overview(overview: &DashboardOverview) {
    println!("{}", overview.greeting);
    if let Some(plan) = &overview.subscription_plan {
        println!("{} ({plan} plan)", overview.tenant_name);
    } else {
        println!("{}", overview.tenant_name);
    }
    println!();

    for card in &overview.cards {
        let value = match card.format {
            CardFormat::Currency => format!("{:.2} {CURRENCY}", card.value),
            CardFormat::Plain | CardFormat::Percentage => format!("{}", card.value),
        };
        println!(
            "{:<18} {:>14} {:>+8.1}%  {}",
            card.title, value, card.change, card.subtitle
        );
    }
}
