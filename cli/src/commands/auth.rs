//! Auth relay commands. CMS responses are printed as received.

use anyhow::{Context, Result};
use content_hub_gateway::ContentGateway;

use super::print_json;

/// `hub-cli login`.
pub async fn login(gateway: &ContentGateway, identifier: &str, password: &str) -> Result<()> {
    let response = gateway
        .auth()
        .login(identifier, password)
        .await
        .context("login failed")?;
    print_json(&response)
}

/// `hub-cli register`.
pub async fn register(
    gateway: &ContentGateway,
    username: &str,
    email: &str,
    password: &str,
) -> Result<()> {
    let response = gateway
        .auth()
        .register(username, email, password)
        .await
        .context("registration failed")?;
    print_json(&response)
}

/// `hub-cli forgot-password`.
pub async fn forgot_password(gateway: &ContentGateway, email: &str) -> Result<()> {
    let response = gateway
        .auth()
        .request_password_reset(email)
        .await
        .context("password reset request failed")?;
    print_json(&response)
}

/// `hub-cli reset-password`.
pub async fn reset_password(
    gateway: &ContentGateway,
    code: &str,
    password: &str,
    confirmation: Option<&str>,
) -> Result<()> {
    let response = gateway
        .auth()
        .reset_password(code, password, confirmation.unwrap_or(password))
        .await
        .context("password reset failed")?;
    print_json(&response)
}
