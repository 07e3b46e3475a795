//! Argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use content_hub_gateway::{
    model::{Collection, SessionActionKind},
    FieldFilter,
};

/// Top-level arguments.
#[derive(Debug, Parser)]
#[command(name = "hub-cli", version, about = "Query a Strapi content CMS through the gateway")]
pub struct Cli {
    /// CMS base URL (overrides STRAPI_URL).
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,
    /// Bearer token (overrides STRAPI_TOKEN).
    #[arg(long, global = true)]
    pub token: Option<String>,
    /// Also write daily-rolling logs into this directory.
    #[arg(long, global = true, value_name = "DIR")]
    pub log_file: Option<PathBuf>,
    /// Command to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// GET /api/<collection> with relations populated.
    List {
        /// news, articles, stories or videos.
        collection: Collection,
        /// 1-based page number.
        #[arg(long)]
        page: Option<u32>,
        /// Records per page.
        #[arg(long)]
        page_size: Option<u32>,
        /// Sort expression such as `publishedAt:desc`.
        #[arg(long)]
        sort: Option<String>,
        /// Field condition, repeatable: `field:operator:value`.
        #[arg(long = "filter", value_name = "FIELD:OP:VALUE")]
        filters: Vec<FieldFilter>,
        /// Keep only records whose title or excerpt contains this text.
        #[arg(long)]
        matching: Option<String>,
    },
    /// Fetch one record by slug.
    Get {
        /// news, articles, stories or videos.
        collection: Collection,
        /// Record slug.
        slug: String,
    },
    /// Search title, content and excerpt across collections.
    Search {
        /// Search text.
        query: String,
        /// Comma-separated collections; all four when omitted.
        #[arg(long, value_delimiter = ',')]
        collections: Vec<Collection>,
    },
    /// GET /api/categories
    Categories,
    /// GET /api/tags
    Tags,
    /// GET /api/content-stats (fallback figures when unavailable).
    Stats,
    /// POST /api/user-sessions
    Track {
        /// Opaque session identifier.
        session_id: String,
        /// view, like or share.
        action: SessionActionKind,
        /// Collection of the content.
        collection: Collection,
        /// Content record id.
        content_id: u64,
        /// Extra JSON object attached to the action.
        #[arg(long)]
        metadata: Option<String>,
        /// Run detached with the telemetry timeout and ignore failures.
        #[arg(long)]
        best_effort: bool,
    },
    /// POST /api/auth/local
    Login {
        /// Username or email.
        #[arg(long)]
        identifier: String,
        /// Account password.
        #[arg(long, env = "HUB_CLI_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// POST /api/auth/local/register
    Register {
        /// New username.
        #[arg(long)]
        username: String,
        /// Account email.
        #[arg(long)]
        email: String,
        /// Account password.
        #[arg(long, env = "HUB_CLI_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// POST /api/auth/forgot-password
    ForgotPassword {
        /// Account email.
        #[arg(long)]
        email: String,
    },
    /// POST /api/auth/reset-password
    ResetPassword {
        /// Code from the reset email.
        #[arg(long)]
        code: String,
        /// New password.
        #[arg(long, env = "HUB_CLI_PASSWORD", hide_env_values = true)]
        password: String,
        /// Confirmation; defaults to the new password.
        #[arg(long)]
        confirmation: Option<String>,
    },
}
