//! Command dispatch.

pub mod auth;
pub mod content;
pub mod telemetry;

use anyhow::{Context, Result};
use content_hub_gateway::{ContentGateway, ListParams};
use serde::Serialize;

use crate::{
    cli::{Cli, Commands},
    utils,
};

/// Run one parsed command line against the configured CMS.
pub async fn run(cli: Cli) -> Result<()> {
    let config = utils::resolve_config(
        |key| std::env::var(key).ok(),
        cli.base_url.as_deref(),
        cli.token.as_deref(),
    )?;
    tracing::debug!(base_url = config.base_url(), "using CMS");
    let gateway = ContentGateway::new(config).context("failed to build CMS client")?;

    match cli.command {
        Commands::List {
            collection,
            page,
            page_size,
            sort,
            filters,
            matching,
        } => {
            let params = ListParams {
                page,
                page_size,
                sort,
                filters,
            };
            content::list(&gateway, collection, &params, matching.as_deref()).await
        },
        Commands::Get {
            collection,
            slug,
        } => content::get(&gateway, collection, &slug).await,
        Commands::Search {
            query,
            collections,
        } => content::search(&gateway, query, &collections).await,
        Commands::Categories => content::categories(&gateway).await,
        Commands::Tags => content::tags(&gateway).await,
        Commands::Stats => telemetry::stats(&gateway).await,
        Commands::Track {
            session_id,
            action,
            collection,
            content_id,
            metadata,
            best_effort,
        } => {
            telemetry::track(
                &gateway,
                session_id,
                action,
                collection,
                content_id,
                metadata.as_deref(),
                best_effort,
            )
            .await
        },
        Commands::Login {
            identifier,
            password,
        } => auth::login(&gateway, &identifier, &password).await,
        Commands::Register {
            username,
            email,
            password,
        } => auth::register(&gateway, &username, &email, &password).await,
        Commands::ForgotPassword {
            email,
        } => auth::forgot_password(&gateway, &email).await,
        Commands::ResetPassword {
            code,
            password,
            confirmation,
        } => auth::reset_password(&gateway, &code, &password, confirmation.as_deref()).await,
    }
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
