//! Stateless relay for the CMS's local-auth endpoints.
//!
//! Each call serializes its arguments into a JSON body, posts it, and hands
//! the CMS response back untouched. Nothing is validated or stored locally.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::{config::GatewayConfig, error::Result, http::CmsHttp};

const LOGIN_ENDPOINT: &str = "/auth/local";
const REGISTER_ENDPOINT: &str = "/auth/local/register";
const FORGOT_PASSWORD_ENDPOINT: &str = "/auth/forgot-password";
const RESET_PASSWORD_ENDPOINT: &str = "/auth/reset-password";

#[derive(Serialize)]
struct LoginRequest<'a> {
    identifier: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RegisterRequest<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct ForgotPasswordRequest<'a> {
    email: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResetPasswordRequest<'a> {
    code: &'a str,
    password: &'a str,
    password_confirmation: &'a str,
}

/// Passthrough client for login, registration and password reset.
#[derive(Debug, Clone)]
pub struct AuthRelay {
    http: Arc<CmsHttp>,
}

impl AuthRelay {
    /// Build a relay with its own transport.
    pub fn new(config: GatewayConfig) -> Result<Self> {
        Ok(Self::from_shared(Arc::new(CmsHttp::new(config)?)))
    }

    pub(crate) fn from_shared(http: Arc<CmsHttp>) -> Self {
        Self {
            http,
        }
    }

    /// `POST /auth/local`.
    pub async fn login(&self, identifier: &str, password: &str) -> Result<Value> {
        self.http
            .post_json(LOGIN_ENDPOINT, &LoginRequest {
                identifier,
                password,
            })
            .await
    }

    /// `POST /auth/local/register`.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<Value> {
        self.http
            .post_json(REGISTER_ENDPOINT, &RegisterRequest {
                username,
                email,
                password,
            })
            .await
    }

    /// `POST /auth/forgot-password`.
    pub async fn request_password_reset(&self, email: &str) -> Result<Value> {
        self.http
            .post_json(FORGOT_PASSWORD_ENDPOINT, &ForgotPasswordRequest {
                email,
            })
            .await
    }

    /// `POST /auth/reset-password`.
    pub async fn reset_password(
        &self,
        code: &str,
        password: &str,
        confirmation: &str,
    ) -> Result<Value> {
        self.http
            .post_json(RESET_PASSWORD_ENDPOINT, &ResetPasswordRequest {
                code,
                password,
                password_confirmation: confirmation,
            })
            .await
    }
}
