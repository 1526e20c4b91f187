//! Account command handlers: login, register, logout, whoami and profile updates

use super::{parse_record, print_json, AppContext};
use crate::api::UserProfile;
use crate::auth::AuthSession;
use crate::error::{Result, SolaceError};
use colored::Colorize;
use rustyline::DefaultEditor;

/// Log in and store the token locally
pub async fn login(ctx: &AppContext, username: String, password: Option<String>) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => prompt("Password: ")?,
    };

    let auth = AuthSession::new(ctx.client.clone(), ctx.store.clone());
    let user = auth.login(&username, &password).await?;

    println!(
        "{}",
        format!("Logged in as {}", display_name(user.as_ref(), &username)).green()
    );
    Ok(())
}

/// Create an account, prompting for the password twice when not given
pub async fn register(
    ctx: &AppContext,
    username: String,
    email: String,
    password: Option<String>,
) -> Result<()> {
    let (password, confirm) = match password {
        Some(p) => (p.clone(), p),
        None => (prompt("Password: ")?, prompt("Confirm password: ")?),
    };

    let auth = AuthSession::new(ctx.client.clone(), ctx.store.clone());
    auth.register(&username, &email, &password, &confirm).await?;

    if auth.is_logged_in() {
        println!(
            "{}",
            format!("Registered and logged in as {}", username).green()
        );
    } else {
        println!(
            "{}",
            format!("Registered {}. Run `solace login` to sign in.", username).green()
        );
    }
    Ok(())
}

/// Forget the stored token
pub async fn logout(ctx: &AppContext) -> Result<()> {
    let auth = AuthSession::new(ctx.client.clone(), ctx.store.clone());
    auth.logout().await?;
    println!("{}", "Logged out.".green());
    Ok(())
}

/// Print the profile of the logged-in account
pub async fn whoami(ctx: &AppContext) -> Result<()> {
    if ctx.client.token().is_none() {
        println!("{}", "Not logged in.".yellow());
        return Ok(());
    }

    let user = ctx.client.user_info().await?;
    println!("Username: {}", user.username.as_deref().unwrap_or("-").cyan());
    if let Some(id) = &user.id {
        println!("ID:       {}", id);
    }
    if let Some(email) = &user.email {
        println!("Email:    {}", email);
    }
    if let Some(role) = &user.role {
        println!("Role:     {}", role);
    }
    Ok(())
}

/// Send changed profile fields for the logged-in account
///
/// # Errors
///
/// Returns `SolaceError::Validation` if `json` is not a JSON object, or
/// `SolaceError::Authentication` when no token is stored
pub async fn update_profile(ctx: &AppContext, json: &str) -> Result<()> {
    let update = parse_record(json)?;
    if ctx.client.token().is_none() {
        return Err(SolaceError::Authentication(
            "log in before updating your profile".to_string(),
        )
        .into());
    }

    let updated = ctx.client.update_user_info(&update).await?;
    println!("{}", "Profile updated.".green());
    print_json(&updated)
}

fn display_name(user: Option<&UserProfile>, fallback: &str) -> String {
    user.and_then(|u| u.username.clone())
        .unwrap_or_else(|| fallback.to_string())
}

fn prompt(label: &str) -> Result<String> {
    let mut rl = DefaultEditor::new()?;
    let line = rl
        .readline(label)
        .map_err(|e| SolaceError::Validation(format!("no input read: {}", e)))?;
    Ok(line)
}
