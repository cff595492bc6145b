use std::collections::HashMap;

use chrono::Utc;
use url::Url;

use crate::{
    config::Config,
    error::{AuthError, AuthRequired},
    transport::HttpTransport,
    types::{Session, TokenResponse},
    warning,
};

/// Builds the URL the user is redirected to for granting access.
///
/// The result depends only on the configuration: client id, scope, redirect
/// target and whether the consent dialog is forced.
///
/// # Example
///
/// ```
/// let url = build_authorize_url(&config);
/// // https://accounts.spotify.com/authorize?client_id=...&response_type=code&...
/// ```
pub fn build_authorize_url(config: &Config) -> Url {
    let mut url = config.auth_url.clone();
    url.query_pairs_mut()
        .append_pair("client_id", config.client_id.as_str())
        .append_pair("response_type", "code")
        .append_pair("scope", &config.scope())
        .append_pair("redirect_uri", config.redirect_uri.as_str())
        .append_pair(
            "show_dialog",
            if config.show_dialog { "true" } else { "false" },
        );
    url
}

/// Exchanges an authorization code for the initial token pair.
///
/// Sends one form POST to the token endpoint with the `authorization_code`
/// grant, authenticating with the client id and secret from `config`.
///
/// # Arguments
///
/// * `transport` - HTTP collaborator used for the token request
/// * `config` - Client credentials, redirect URI and token endpoint
/// * `code` - Authorization code from the `/callback` query string
///
/// # Returns
///
/// A [`Session`] whose `expires_at` is the time of the call plus the
/// `expires_in` lifetime reported by the server.
///
/// # Errors
///
/// - [`AuthError::Transport`] when the request could not be sent
/// - [`AuthError::Rejected`] for a non-success status, e.g. a stale code
/// - [`AuthError::MalformedResponse`] when the body is not a token response,
///   lacks a refresh token, or reports a lifetime that does not fit in a
///   timestamp
///
/// No session is created when any of these happen.
///
/// # Example
///
/// ```
/// let transport = ReqwestTransport::new(config.http_timeout)?;
/// let session = exchange_code(&transport, &config, "AQD...").await?;
/// println!("token valid until {}", session.expires_at);
/// ```
pub async fn exchange_code(
    transport: &dyn HttpTransport,
    config: &Config,
    code: &str,
) -> Result<Session, AuthError> {
    let res = transport
        .post_form(
            config.token_url.as_str(),
            &[
                ("code", code),
                ("grant_type", "authorization_code"),
                ("redirect_uri", config.redirect_uri.as_str()),
                ("client_id", config.client_id.as_str()),
                ("client_secret", config.client_secret.as_str()),
            ],
        )
        .await?;

    if !res.is_success() {
        warning!("Failed to get token: {}", res.body);
        return Err(AuthError::Rejected {
            status: res.status,
            body: res.body,
        });
    }

    let token: TokenResponse = serde_json::from_str(&res.body)
        .map_err(|e| AuthError::MalformedResponse(e.to_string()))?;
    let refresh_token = token
        .refresh_token
        .ok_or_else(|| AuthError::MalformedResponse("missing field `refresh_token`".into()))?;

    let expires_in = token.expires_in;
    Session::issued(
        token.access_token,
        Some(refresh_token),
        expires_in,
        token.scope,
        Utc::now(),
    )
    .ok_or_else(|| {
        AuthError::MalformedResponse(format!("expires_in out of range: {expires_in}"))
    })
}

/// Interprets the query parameters of the redirect back from the
/// authorization server.
///
/// # Arguments
///
/// * `transport` - HTTP collaborator, only used when a code is present
/// * `config` - Client configuration passed on to [`exchange_code`]
/// * `params` - Decoded query parameters of the callback request
///
/// # Callback Handling
///
/// 1. **Denied**: an `error` parameter (e.g. `access_denied`) wins over a
///    `code` and is reported as [`AuthError::Denied`] without touching the
///    network
/// 2. **Code**: a `code` parameter is exchanged via [`exchange_code`]
/// 3. **Neither**: the callback is [`AuthError::MalformedCallback`]
pub async fn handle_callback(
    transport: &dyn HttpTransport,
    config: &Config,
    params: &HashMap<String, String>,
) -> Result<Session, AuthError> {
    if let Some(error) = params.get("error") {
        warning!("Callback error: {}", error);
        return Err(AuthError::Denied(error.clone()));
    }

    match params.get("code") {
        Some(code) => exchange_code(transport, config, code).await,
        None => Err(AuthError::MalformedCallback),
    }
}

/// Requests a new access token with a refresh token.
///
/// Exactly one request, no retry. The token response is returned as is; the
/// caller applies it to its session, so a failure here never touches any
/// stored state.
///
/// # Arguments
///
/// * `transport` - HTTP collaborator used for the token request
/// * `config` - Client credentials and token endpoint
/// * `refresh_token` - Long-lived credential of the session
///
/// # Errors
///
/// Every failure is an [`AuthRequired`], the user has to authorize again:
///
/// - [`AuthRequired::RefreshRejected`] for a non-success status, typically
///   `invalid_grant` after the user revoked access
/// - [`AuthRequired::RefreshFailed`] when the request could not be sent or
///   the body is not a token response
pub async fn refresh_token(
    transport: &dyn HttpTransport,
    config: &Config,
    refresh_token: &str,
) -> Result<TokenResponse, AuthRequired> {
    let res = transport
        .post_form(
            config.token_url.as_str(),
            &[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
                ("client_id", config.client_id.as_str()),
                ("client_secret", config.client_secret.as_str()),
            ],
        )
        .await
        .map_err(|e| AuthRequired::RefreshFailed(e.to_string()))?;

    if !res.is_success() {
        warning!("Failed to refresh token: {}", res.body);
        return Err(AuthRequired::RefreshRejected {
            status: res.status,
            body: res.body,
        });
    }

    serde_json::from_str(&res.body).map_err(|e| AuthRequired::RefreshFailed(e.to_string()))
}
