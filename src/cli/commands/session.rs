use std::io::{self, BufRead, Write};

use serde_json::json;

use crate::auth::Role;
use crate::cli::commands::LocalSession;
use crate::cli::utils::{output_data, output_success};
use crate::cli::OutputFormat;
use crate::client::{resolve, page_access, AuthState, Guard, Location, Persisted};
use crate::paths::page;

pub async fn login(
    username: String,
    password: Option<String>,
    admin: bool,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let mut session = LocalSession::load()?;

    let login_page = if admin { page::ADMIN_LOGIN } else { page::LOGIN };
    let location = Location::new(login_page);
    if let Guard::Redirect { .. } = resolve(page_access(login_page), session.auth.is_authenticated(), &location) {
        return output_success(
            &output_format,
            &format!(
                "Already signed in as {} (run `roadmap logout` first)",
                session.auth.username.as_deref().unwrap_or("unknown")
            ),
            Some(json!({
                "username": session.auth.username,
                "role": session.auth.role,
            })),
        );
    }

    let password = match password {
        Some(password) => password,
        None => read_password()?,
    };

    let api = session.api();
    if admin {
        let signed_in = api.admin_login(&username, &password).await?;
        session.auth.sign_in(signed_in.token, signed_in.username, Role::Admin);
    } else {
        let signed_in = api.login(&username, &password).await?;
        session.auth.sign_in(signed_in.token, signed_in.user.username, Role::Member);
    }
    session.auth.save(&session.storage)?;

    output_success(
        &output_format,
        &format!(
            "Signed in as {}",
            session.auth.username.as_deref().unwrap_or(username.as_str())
        ),
        Some(json!({
            "username": session.auth.username,
            "role": session.auth.role,
        })),
    )
}

pub fn logout(output_format: OutputFormat) -> anyhow::Result<()> {
    let session = LocalSession::load()?;
    AuthState::clear(&session.storage)?;
    output_success(&output_format, "Signed out", None)
}

pub async fn status(output_format: OutputFormat) -> anyhow::Result<()> {
    let session = LocalSession::load()?;
    let api = session.api();

    let server = match api.health().await {
        Ok(_) => "ok".to_string(),
        Err(e) => format!("unreachable: {e}"),
    };

    let report = json!({
        "api_url": api.base_url(),
        "server": server,
        "signed_in": session.auth.is_authenticated(),
        "username": session.auth.username,
        "role": session.auth.role,
        "config_dir": session.storage.dir().display().to_string(),
    });

    output_data(&output_format, &report, |_| {
        println!("API:     {} ({})", api.base_url(), server);
        match (&session.auth.username, session.auth.role) {
            (Some(username), Some(role)) if session.auth.is_authenticated() => {
                println!("Session: {} ({})", username, role.as_str());
            }
            _ => println!("Session: not signed in"),
        }
    })
}

fn read_password() -> anyhow::Result<String> {
    print!("Password: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
