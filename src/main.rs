use anyhow::{Context, Result};
use dialoguer::Password;
use reqwest::Method;
use serde_json::Value;
use std::sync::Arc;

use jobportal_client::auth::{SqliteCredentialStore, TracingNavigator};
use jobportal_client::config::{AccountKind, Command, Config};
use jobportal_client::models::{LoginRequest, RegisterEmployerRequest, RegisterJobSeekerRequest};
use jobportal_client::PortalClient;

#[tokio::main]
async fn main() -> Result<()> {
    let (config, command) = Config::load()?;
    config.validate()?;

    // Initialize logging with a configured level
    let log_level = config.log_level.to_lowercase();
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("API URL: {}", config.api_url);
    tracing::debug!("Session store: {}", config.credentials_db.display());

    let store = Arc::new(SqliteCredentialStore::open(&config.credentials_db)?);
    let client = PortalClient::new(&config, store, Arc::new(TracingNavigator))?;

    run(&client, command).await
}

async fn run(client: &PortalClient, command: Command) -> Result<()> {
    match command {
        Command::Login { email, password } => {
            let password = password_or_prompt(password)?;
            let response = client
                .auth()
                .login(&LoginRequest {
                    email: email.trim().to_lowercase(),
                    password,
                })
                .await?;

            match response.user {
                Some(user) => println!("Logged in as {} ({})", user.full_name, user.email),
                None => println!("Logged in"),
            }
        }

        Command::Register {
            role,
            full_name,
            email,
            password,
            company_name,
        } => {
            let password = password_or_prompt(password)?;
            let response = match role {
                AccountKind::JobSeeker => {
                    client
                        .auth()
                        .register_job_seeker(&RegisterJobSeekerRequest::new(
                            &full_name, &email, &password,
                        ))
                        .await?
                }
                AccountKind::Employer => {
                    let company = company_name
                        .context("--company-name is required for employer accounts")?;
                    client
                        .auth()
                        .register_employer(&RegisterEmployerRequest::new(
                            &full_name, &email, &password, &company,
                        ))
                        .await?
                }
            };
            match response.user {
                Some(user) => print_json(&serde_json::to_value(&user)?)?,
                None => println!("Registered {}", email),
            }
        }

        Command::Logout => {
            client.auth().logout().await;
            println!("Logged out");
        }

        Command::Whoami => match client.auth().current_user() {
            Some(user) => print_json(&serde_json::to_value(&user)?)?,
            None => println!("Not logged in"),
        },

        Command::Request { method, path, data } => {
            let method = Method::from_bytes(method.to_uppercase().as_bytes())
                .with_context(|| format!("Invalid HTTP method: {}", method))?;
            let body = data
                .map(|raw| serde_json::from_str::<Value>(&raw))
                .transpose()
                .context("--data must be valid JSON")?;

            let response = client
                .api()
                .request(method, &path, body, Vec::new())
                .await?;
            let value: Value = response.json()?;
            print_json(&value)?;
        }
    }

    Ok(())
}

fn password_or_prompt(password: Option<String>) -> Result<String> {
    match password {
        Some(p) => Ok(p),
        None => Password::new()
            .with_prompt("Password")
            .interact()
            .context("Failed to read password"),
    }
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
