//! Authenticated HTTP client for the E-Kalolsavam portal API
//!
//! Wraps reqwest::Client with bearer-token injection and transparent,
//! single-flight token refresh. A request that draws a 401 refreshes the
//! access token and is retried exactly once; every other failure passes
//! through untouched. Concurrent 401s share one refresh round-trip: a fair
//! async mutex queues the callers, the first one performs the refresh, and
//! the rest wake in order to find the rotated (or cleared) store.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::auth::{AuthError, TokenStore};
use crate::config::Config;

/// Login endpoint issuing the initial token pair.
const TOKEN_PATH: &str = "/api/token/";

/// Refresh endpoint exchanging a refresh token for a new access token.
const REFRESH_PATH: &str = "/api/token/refresh/";

/// A refresh call that takes longer than this counts as failed, so a hung
/// endpoint cannot stall queued requests forever.
const REFRESH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    access: String,
    refresh: String,
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh: &'a str,
}

/// Refresh endpoint contract: a new access token, plus a replacement
/// refresh token when the server rotates it.
#[derive(Deserialize)]
struct RefreshResponse {
    access: String,
    refresh: Option<String>,
}

/// Authenticated client over a token store backend.
pub struct PortalClient<S: TokenStore> {
    http: reqwest::Client,
    base: String,
    store: Arc<Mutex<S>>,
    refresh_gate: tokio::sync::Mutex<()>,
    refresh_timeout: Duration,
}

impl PortalClient<Config> {
    /// Build a client from saved configuration.
    pub fn from_saved() -> anyhow::Result<Self> {
        Ok(Self::from_config(Config::load()?))
    }

    /// Build a client around loaded configuration.
    pub fn from_config(config: Config) -> Self {
        let base = config.resolved_api_base();
        Self::new(base, Arc::new(Mutex::new(config)))
    }
}

impl<S: TokenStore> PortalClient<S> {
    pub fn new(base: impl Into<String>, store: Arc<Mutex<S>>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base: base.into().trim_end_matches('/').to_string(),
            store,
            refresh_gate: tokio::sync::Mutex::new(()),
            refresh_timeout: REFRESH_TIMEOUT,
        }
    }

    /// GET request to a portal API path (bearer auth when logged in).
    pub async fn get(&self, path: &str) -> Result<reqwest::Response, AuthError> {
        self.request(reqwest::Method::GET, path, None).await
    }

    /// POST request to a portal API path (bearer auth when logged in).
    pub async fn post(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<reqwest::Response, AuthError> {
        self.request(reqwest::Method::POST, path, Some(body)).await
    }

    /// Exchange portal credentials for a token pair and store it.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), AuthError> {
        let url = format!("{}{}", self.base, TOKEN_PATH);
        tracing::debug!("POST {}", url);

        let resp = self
            .http
            .post(&url)
            .json(&LoginRequest { username, password })
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AuthError::Api {
                status: status.as_u16(),
                url,
                body,
            });
        }

        let tokens: LoginResponse = resp.json().await?;
        self.with_store(|s| s.set_tokens(Some(&tokens.access), Some(&tokens.refresh)));
        Ok(())
    }

    /// Force a refresh round-trip using the stored refresh token.
    pub async fn try_refresh(&self) -> Result<(), AuthError> {
        let access = self.with_store(|s| s.tokens().access);
        self.refresh_access_token(access.as_deref()).await.map(|_| ())
    }

    async fn request(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<reqwest::Response, AuthError> {
        let url = format!("{}{}", self.base, path);
        let access = self.with_store(|s| s.tokens().access);

        tracing::debug!("{} {}", method, url);
        let resp = self
            .send(method.clone(), &url, body, access.as_deref())
            .await?;
        if resp.status() != reqwest::StatusCode::UNAUTHORIZED {
            return check_response(resp, &url).await;
        }

        // First 401 on this request: refresh and retry once. A 401 on the
        // retry falls through check_response as a final error.
        tracing::debug!("401 for {}, refreshing access token", url);
        let fresh = self.refresh_access_token(access.as_deref()).await?;
        let resp = self.send(method, &url, body, Some(&fresh)).await?;
        check_response(resp, &url).await
    }

    async fn send(
        &self,
        method: reqwest::Method,
        url: &str,
        body: Option<&serde_json::Value>,
        access: Option<&str>,
    ) -> Result<reqwest::Response, AuthError> {
        let mut req = self.http.request(method, url);
        if let Some(token) = access {
            req = req.bearer_auth(token);
        }
        if let Some(json) = body {
            req = req.json(json);
        }
        Ok(req.send().await?)
    }

    /// Obtain a live access token after a 401, refreshing at most once
    /// across all concurrent callers.
    ///
    /// `stale` is the access token the caller presented when it was
    /// rejected; if the store holds a different one by the time the gate is
    /// acquired, another caller already refreshed and that token is reused
    /// without a network call.
    async fn refresh_access_token(&self, stale: Option<&str>) -> Result<String, AuthError> {
        let _refreshing = self.refresh_gate.lock().await;

        let current = self.with_store(|s| s.tokens());
        if let Some(access) = current.access {
            if stale != Some(access.as_str()) {
                return Ok(access);
            }
        }

        let Some(refresh) = current.refresh else {
            self.with_store(|s| s.clear_tokens());
            return Err(AuthError::SessionExpired);
        };

        tracing::info!("Access token rejected, refreshing...");
        match self.call_refresh_endpoint(&refresh).await {
            Ok(tokens) => {
                self.with_store(|s| {
                    s.set_tokens(Some(&tokens.access), tokens.refresh.as_deref())
                });
                tracing::info!("Access token refreshed");
                Ok(tokens.access)
            }
            Err(e) => {
                // A failed refresh ends the session; queued callers find the
                // cleared store and fail without hitting the endpoint again.
                self.with_store(|s| s.clear_tokens());
                tracing::warn!("Token refresh failed: {}", e);
                Err(e)
            }
        }
    }

    async fn call_refresh_endpoint(&self, refresh: &str) -> Result<RefreshResponse, AuthError> {
        let url = format!("{}{}", self.base, REFRESH_PATH);
        let send = self.http.post(&url).json(&RefreshRequest { refresh }).send();

        let resp = match tokio::time::timeout(self.refresh_timeout, send).await {
            Ok(Ok(resp)) => resp,
            Ok(Err(e)) => {
                return Err(AuthError::RefreshFailed {
                    status: 0,
                    message: e.to_string(),
                })
            }
            Err(_) => {
                return Err(AuthError::RefreshFailed {
                    status: 0,
                    message: format!("no response within {:?}", self.refresh_timeout),
                })
            }
        };

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AuthError::RefreshFailed {
                status: status.as_u16(),
                message: body,
            });
        }

        resp.json::<RefreshResponse>()
            .await
            .map_err(|e| AuthError::RefreshFailed {
                status: status.as_u16(),
                message: format!("unexpected response body: {e}"),
            })
    }

    fn with_store<T>(&self, f: impl FnOnce(&mut S) -> T) -> T {
        let mut store = self.store.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut store)
    }
}

/// Check HTTP response status code and return a clear error on failure.
async fn check_response(
    resp: reqwest::Response,
    url: &str,
) -> Result<reqwest::Response, AuthError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(AuthError::Api {
        status: status.as_u16(),
        url: url.to_string(),
        body,
    })
}
