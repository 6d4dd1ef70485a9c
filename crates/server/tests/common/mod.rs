//! # Common Test Utilities
//!
//! This module centralizes the test harness and helper functions used across
//! the `pantrypal-server` integration tests:
//!
//! - `TestApp`: spawns a real server on a random port, backed by a temporary
//!   SQLite database and an `httpmock` server standing in for the remote
//!   recipe source.
//! - JWT helpers for minting session tokens accepted by the harness config.
//! - Builders for the recipe source's wire payloads.

// Allow unused code because this is a test utility module, and not all
// helpers are used by every test file that includes it.
#![allow(unused)]

use anyhow::Result;
use httpmock::MockServer;
use jsonwebtoken::{encode, EncodingKey, Header};
use pantrypal_server::{
    auth::middleware::Claims,
    config,
    router::create_router,
    state::{build_app_state, AppState},
};
use reqwest::Client;
use serde_json::{json, Value};
use std::{
    fs::File,
    io::Write,
    net::SocketAddr,
    time::{SystemTime, UNIX_EPOCH},
};
use tempfile::{tempdir, NamedTempFile, TempDir};
use tokio::{net::TcpListener, task::JoinHandle};

/// The token secret written into every harness config.
pub const JWT_SECRET: &str = "test-secret";

/// A harness for end-to-end testing of the Axum server.
///
/// Spawns the server on a random available port with a temporary SQLite
/// database, pointing the recipe client at an `httpmock::MockServer`.
pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub mock_server: MockServer,
    pub app_state: AppState,
    _db_file: NamedTempFile,
    _config_dir: TempDir,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestApp {
    /// Spawns the application with the production default fallback ("empty").
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with_fallback("empty").await
    }

    /// Spawns the application with the given fallback policy.
    pub async fn spawn_with_fallback(fallback: &str) -> Result<Self> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .try_init();

        let mock_server = MockServer::start();
        let db_file = NamedTempFile::new()?;

        let config_dir = tempdir()?;
        let config_path = config_dir.path().join("config.yml");
        let config_content = format!(
            r#"
port: 0
db_url: "{}"
recipe_api_url: "{}"
recipe_api_key: "test-key"
fallback: "{fallback}"
jwt_secret: "{JWT_SECRET}"
"#,
            db_file.path().display(),
            mock_server.base_url(),
        );
        let mut file = File::create(&config_path)?;
        file.write_all(config_content.as_bytes())?;

        let config = config::get_config(config_path.to_str())?;
        let app_state = build_app_state(config).await?;

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;
        let address = format!("http://{addr}");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let state_for_server = app_state.clone();
        let server_handle = tokio::spawn(async move {
            let app = create_router(state_for_server);
            let server = axum::serve(listener, app).with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            });
            if let Err(e) = server.await {
                eprintln!("[TestApp] Server error: {e}");
            }
        });

        // Give the server a moment to start accepting connections.
        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

        Ok(Self {
            address,
            client: Client::new(),
            mock_server,
            app_state,
            _db_file: db_file,
            _config_dir: config_dir,
            _server_handle: server_handle,
            shutdown_tx: Some(shutdown_tx),
        })
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Generates a valid session token for a given user identifier (subject).
pub fn generate_jwt(sub: &str) -> Result<String> {
    generate_jwt_with_expiry(sub, 3600)
}

/// Generates a session token for a given subject with a custom expiration.
pub fn generate_jwt_with_expiry(sub: &str, expires_in_secs: u64) -> Result<String> {
    let expiration = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() + expires_in_secs;
    let claims = Claims {
        sub: sub.to_string(),
        exp: expiration as usize,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_ref()),
    )?;
    Ok(token)
}

// --- Recipe source payload builders ---

/// A full detail payload as the recipe source returns it, with known
/// normalizable quirks: an HTML summary, a single cuisine, one instruction
/// group, and two dietary flags set.
pub fn detail_body(id: u64, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "summary": "<p>A <b>great</b> dish</p>",
        "image": format!("https://img.example.com/{id}.jpg"),
        "readyInMinutes": 25,
        "servings": 2,
        "cuisines": ["Italian"],
        "extendedIngredients": [
            { "original": "200g spaghetti" },
            { "original": "2 cloves garlic" },
            { "original": "3 tbsp olive oil" },
        ],
        "analyzedInstructions": [
            { "steps": [ { "step": "Boil the pasta." }, { "step": "Toss with garlic oil." } ] }
        ],
        "vegetarian": true,
        "vegan": false,
        "glutenFree": false,
        "dairyFree": true,
        "veryHealthy": false,
        "lowFodmap": false,
    })
}

/// A coverage payload for one candidate: 3 of 5 selection ingredients used.
pub fn coverage_body(id: u64) -> Value {
    json!([{
        "id": id,
        "usedIngredientCount": 3,
        "missedIngredientCount": 2,
        "usedIngredients": [
            { "name": "spaghetti" }, { "name": "garlic" }, { "name": "olive oil" }
        ],
        "missedIngredients": [
            { "name": "parsley" }, { "name": "parmesan" }
        ],
    }])
}
