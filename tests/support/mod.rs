#![allow(dead_code)]

use std::{
    collections::{HashMap, VecDeque},
    path::Path,
    sync::Mutex,
};

use async_trait::async_trait;
use serde_json::{Value, json};
use spotex::{
    config::Config,
    error::TransportError,
    transport::{HttpResponse, HttpTransport},
};

pub const TOKEN_URL: &str = "https://accounts.test/api/token";
pub const AUTH_URL: &str = "https://accounts.test/authorize";
pub const API_URL: &str = "https://api.test/v1";

pub fn config(export_dir: &Path) -> Config {
    let export_dir = export_dir.display().to_string();
    Config::from_lookup(|key| {
        let value = match key {
            "SPOTIFY_API_AUTH_CLIENT_ID" => "client-id",
            "SPOTIFY_API_AUTH_CLIENT_SECRET" => "client-secret",
            "SPOTIFY_API_REDIRECT_URI" => "http://localhost:5000/callback",
            "SPOTIFY_API_AUTH_URL" => AUTH_URL,
            "SPOTIFY_API_TOKEN_URL" => TOKEN_URL,
            "SPOTIFY_API_URL" => API_URL,
            "SPOTEX_EXPORT_DIR" => export_dir.as_str(),
            _ => return None,
        };
        Some(value.to_string())
    })
    .expect("test configuration is valid")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub method: &'static str,
    pub url: String,
    pub form: Vec<(String, String)>,
    pub bearer: Option<String>,
}

impl Call {
    pub fn form_value(&self, key: &str) -> Option<&str> {
        self.form
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

type Scripted = Result<HttpResponse, String>;

/// Scripted transport: answers by method and URL and records every call.
///
/// When several responses are queued for one route they are served in
/// order; the last one keeps being served.
#[derive(Default)]
pub struct FakeTransport {
    routes: Mutex<HashMap<(&'static str, String), VecDeque<Scripted>>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn script(&self, method: &'static str, url: &str, response: Scripted) {
        self.routes
            .lock()
            .unwrap()
            .entry((method, url.to_string()))
            .or_default()
            .push_back(response);
    }

    pub fn on_post(&self, url: &str, status: u16, body: impl Into<String>) {
        self.script("POST", url, Ok(HttpResponse::new(status, body)));
    }

    pub fn on_post_error(&self, url: &str, message: &str) {
        self.script("POST", url, Err(message.to_string()));
    }

    pub fn on_get(&self, url: &str, status: u16, body: impl Into<String>) {
        self.script("GET", url, Ok(HttpResponse::new(status, body)));
    }

    pub fn on_get_json(&self, url: &str, body: &Value) {
        self.on_get(url, 200, body.to_string());
    }

    pub fn on_get_error(&self, url: &str, message: &str) {
        self.script("GET", url, Err(message.to_string()));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn urls(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.url).collect()
    }

    fn answer(&self, call: Call) -> Result<HttpResponse, TransportError> {
        let key = (call.method, call.url.clone());
        self.calls.lock().unwrap().push(call);

        let mut routes = self.routes.lock().unwrap();
        let scripted = match routes.get_mut(&key) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };

        match scripted {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(TransportError::Other(message)),
            None => Ok(HttpResponse::new(404, format!("no route for {} {}", key.0, key.1))),
        }
    }
}

#[async_trait]
impl HttpTransport for FakeTransport {
    async fn post_form(
        &self,
        url: &str,
        form: &[(&str, &str)],
    ) -> Result<HttpResponse, TransportError> {
        self.answer(Call {
            method: "POST",
            url: url.to_string(),
            form: form
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            bearer: None,
        })
    }

    async fn get_with_bearer(
        &self,
        url: &str,
        token: &str,
    ) -> Result<HttpResponse, TransportError> {
        self.answer(Call {
            method: "GET",
            url: url.to_string(),
            form: Vec::new(),
            bearer: Some(token.to_string()),
        })
    }
}

pub fn token_body(access_token: &str, refresh_token: Option<&str>, expires_in: i64) -> String {
    let mut body = json!({
        "access_token": access_token,
        "token_type": "Bearer",
        "expires_in": expires_in,
        "scope": "user-read-private user-read-email playlist-read-private",
    });
    if let Some(refresh_token) = refresh_token {
        body["refresh_token"] = json!(refresh_token);
    }
    body.to_string()
}

pub fn track(id: &str, name: &str, artists: &[&str], album: &str, release_date: &str) -> Value {
    json!({
        "track": {
            "id": id,
            "name": name,
            "artists": artists.iter().map(|a| json!({ "name": a })).collect::<Vec<_>>(),
            "album": { "name": album, "release_date": release_date },
            "duration_ms": 200_000,
            "popularity": 50
        },
        "added_at": "2024-01-01T00:00:00Z"
    })
}

pub fn tracks_page(items: Vec<Value>) -> Value {
    let total = items.len();
    json!({ "items": items, "next": null, "total": total })
}

/// Scripts the details and tracks endpoints of one playlist.
pub fn script_playlist(transport: &FakeTransport, id: &str, name: &str, items: Vec<Value>) {
    transport.on_get_json(
        &format!("{API_URL}/playlists/{id}"),
        &json!({ "id": id, "name": name }),
    );
    transport.on_get_json(
        &format!("{API_URL}/playlists/{id}/tracks"),
        &tracks_page(items),
    );
}

pub fn script_playlists(transport: &FakeTransport, ids: &[&str]) {
    let items: Vec<Value> = ids
        .iter()
        .map(|id| json!({ "id": id, "name": format!("Playlist {id}") }))
        .collect();
    transport.on_get_json(
        &format!("{API_URL}/me/playlists"),
        &json!({ "items": items, "next": null, "total": ids.len() }),
    );
}
