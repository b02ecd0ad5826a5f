//! HTTP client for the banking backend
//!
//! Thin wrappers around the backend routes. Nothing is cached or retried;
//! callers re-fetch after a mutation.

pub mod error;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::multipart::{Form, Part};
use reqwest::{Client as HttpClient, RequestBuilder};
use serde::de::DeserializeOwned;
use std::path::Path;
use std::time::Duration;
use vaultbank_config::Config;
use vaultbank_core::{Account, AmountRequest, AuthToken, Credentials, Transaction};

pub use error::{ApiError, ApiResult};

pub mod routes {
    pub const LOGIN: &str = "auth/login";
    pub const REGISTER: &str = "auth/register";
    pub const ME: &str = "auth/me";
    pub const USERS: &str = "auth/users";
    pub const USER: &str = "auth/user";
    pub const PROFILE: &str = "auth/profile";
    pub const TRANSACTIONS: &str = "transactions/my";
    pub const DEPOSIT: &str = "transactions/deposit";
    pub const WITHDRAW: &str = "transactions/withdraw";
    pub const TRANSFER: &str = "transactions/transfer";
}

const IMAGE_MIME: &str = "image/jpeg";

/// Client for the banking backend
pub struct BankClient {
    http: HttpClient,
    config: Config,
    token: Option<String>,
}

impl BankClient {
    pub fn new(config: &Config) -> ApiResult<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(config.api.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            config: config.clone(),
            token: None,
        })
    }

    /// Attach the session token to every following request
    pub fn with_token(mut self, token: Option<&str>) -> Self {
        self.set_token(token);
        self
    }

    pub fn set_token(&mut self, token: Option<&str>) {
        self.token = token.map(str::to_string);
    }

    pub fn url(&self, route: &str) -> String {
        self.config.endpoint(route)
    }

    fn headers(&self) -> ApiResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &self.token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|e| {
                ApiError::Transport {
                    message: format!("Invalid token header: {}", e),
                }
            })?;
            headers.insert(AUTHORIZATION, value);
        }
        Ok(headers)
    }

    fn get(&self, route: &str) -> ApiResult<RequestBuilder> {
        Ok(self.http.get(self.url(route)).headers(self.headers()?))
    }

    fn post(&self, route: &str) -> ApiResult<RequestBuilder> {
        Ok(self.http.post(self.url(route)).headers(self.headers()?))
    }

    fn put(&self, route: &str) -> ApiResult<RequestBuilder> {
        Ok(self.http.put(self.url(route)).headers(self.headers()?))
    }

    async fn send(&self, request: RequestBuilder, fallback: &str) -> ApiResult<reqwest::Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let error = ApiError::from_response(status.as_u16(), &body, fallback);
        log::warn!("request failed with {}: {}", status, error);
        Err(error)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder, fallback: &str) -> ApiResult<T> {
        let response = self.send(request, fallback).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode {
            message: e.to_string(),
        })
    }

    // ==================== Auth ====================

    pub async fn login(&self, credentials: &Credentials) -> ApiResult<AuthToken> {
        log::debug!("login as {}", credentials.username);
        let request = self.post(routes::LOGIN)?.json(credentials);
        self.send_json(request, "Invalid credentials. Please try again.").await
    }

    /// Create an account with a profile picture read from `image_path`
    pub async fn register(&self, credentials: &Credentials, image_path: &Path) -> ApiResult<AuthToken> {
        log::debug!("register {}", credentials.username);
        let form = Form::new()
            .text("username", credentials.username.clone())
            .text("password", credentials.password.clone())
            .part("image", image_part(image_path).await?);
        let request = self.post(routes::REGISTER)?.multipart(form);
        self.send_json(request, "Registration failed").await
    }

    pub async fn me(&self) -> ApiResult<Account> {
        self.send_json(self.get(routes::ME)?, "Could not load your profile").await
    }

    pub async fn users(&self) -> ApiResult<Vec<Account>> {
        self.send_json(self.get(routes::USERS)?, "Could not load users").await
    }

    pub async fn user(&self, id: &str) -> ApiResult<Account> {
        let route = format!("{}/{}", routes::USER, id);
        self.send_json(self.get(&route)?, "User not found").await
    }

    pub async fn update_profile_image(&self, image_path: &Path) -> ApiResult<Account> {
        let form = Form::new().part("image", image_part(image_path).await?);
        let request = self.put(routes::PROFILE)?.multipart(form);
        self.send_json(request, "Profile update failed").await
    }

    // ==================== Transactions ====================

    pub async fn transactions(&self) -> ApiResult<Vec<Transaction>> {
        self.send_json(self.get(routes::TRANSACTIONS)?, "Could not load transactions")
            .await
    }

    pub async fn deposit(&self, amount: f64) -> ApiResult<()> {
        let request = self.put(routes::DEPOSIT)?.json(&AmountRequest { amount });
        self.send(request, "Deposit failed. Please try again.").await?;
        log::info!("deposited {}", amount);
        Ok(())
    }

    pub async fn withdraw(&self, amount: f64) -> ApiResult<()> {
        let request = self.put(routes::WITHDRAW)?.json(&AmountRequest { amount });
        self.send(request, "Withdrawal failed. Please try again.").await?;
        log::info!("withdrew {}", amount);
        Ok(())
    }

    pub async fn transfer(&self, amount: f64, username: &str) -> ApiResult<()> {
        let route = format!("{}/{}", routes::TRANSFER, username);
        let request = self.put(&route)?.json(&AmountRequest { amount });
        self.send(request, "Transfer failed").await?;
        log::info!("transferred {} to {}", amount, username);
        Ok(())
    }
}

async fn image_part(path: &Path) -> ApiResult<Part> {
    let bytes = tokio::fs::read(path).await.map_err(|e| ApiError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    Part::bytes(bytes)
        .file_name("image")
        .mime_str(IMAGE_MIME)
        .map_err(ApiError::from)
}
