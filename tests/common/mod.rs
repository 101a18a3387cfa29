use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use reqwest::StatusCode;

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    #[allow(dead_code)]
    child: Child,
}

impl TestServer {
    fn spawn(database_url: &str) -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Spawn the already-built binary to keep start fast during tests
        let mut cmd = Command::new("target/debug/bizcard-api");
        cmd.env("PORT", port.to_string())
            .env("DATABASE_URL", database_url)
            .env("JWT_SECRET", "e2e-test-jwt-secret")
            .env("COOKIE_SECRET", "e2e-test-cookie-secret")
            .env("APP_ENV", "development")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!(
            "server did not become ready on {} within {:?}",
            self.base_url,
            timeout
        )
    }
}

/// Spawn (once) and return the shared test server. Returns None when
/// BIZCARD_TEST_DATABASE_URL is not set, so the suite passes without a
/// database available.
pub async fn server() -> Result<Option<&'static TestServer>> {
    let Ok(database_url) = std::env::var("BIZCARD_TEST_DATABASE_URL") else {
        eprintln!("skipping end-to-end test: BIZCARD_TEST_DATABASE_URL not set");
        return Ok(None);
    };

    let server = SERVER
        .get_or_init(|| TestServer::spawn(&database_url).expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(Some(server))
}

/// Client with a cookie store, so the session cookie from login is
/// replayed on subsequent requests
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .expect("failed to build client")
}

/// Security config matching the spawned server, for decoding its tokens
pub fn security() -> bizcard_api::config::SecurityConfig {
    bizcard_api::config::SecurityConfig {
        jwt_secret: "e2e-test-jwt-secret".to_string(),
        cookie_secret: "e2e-test-cookie-secret".to_string(),
        token_expiry_hours: 24,
        cors_origin: "http://localhost:3000".to_string(),
        secure_cookies: false,
    }
}

pub fn unique_email(tag: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos();
    format!("{}-{}@example.com", tag, nanos)
}

pub fn user_payload(email: &str) -> serde_json::Value {
    serde_json::json!({
        "name": { "first": "Test", "last": "User" },
        "email": email,
        "password": "a-strong-password",
        "phone": "050-123456789",
        "address": {
            "country": "IL",
            "city": "Tel Aviv",
            "street": "Herzl",
            "houseNumber": "10"
        }
    })
}

pub fn card_payload(title: &str) -> serde_json::Value {
    serde_json::json!({
        "title": title,
        "subtitle": "Fresh bread daily",
        "description": "Sourdough, rye and pastries baked every morning.",
        "phone": "03-1234567",
        "email": "hello@bakery.example",
        "web": "https://bakery.example",
        "image": { "url": "https://bakery.example/front.jpg", "alt": "storefront" },
        "address": {
            "country": "IL",
            "city": "Tel Aviv",
            "street": "Herzl",
            "houseNumber": 12,
            "zip": 61000
        }
    })
}

/// Register a fresh user and log in, returning (client, email, token)
pub async fn register_and_login(
    base_url: &str,
    tag: &str,
) -> Result<(reqwest::Client, String, String)> {
    let client = client();
    let email = unique_email(tag);

    let res = client
        .post(format!("{}/users", base_url))
        .json(&user_payload(&email))
        .send()
        .await?;
    anyhow::ensure!(
        res.status() == StatusCode::CREATED,
        "registration failed: {}",
        res.status()
    );

    let res = client
        .post(format!("{}/users/login", base_url))
        .json(&serde_json::json!({ "email": email, "password": "a-strong-password" }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::OK, "login failed: {}", res.status());

    let body: serde_json::Value = res.json().await?;
    let token = body["token"]
        .as_str()
        .context("login response missing token")?
        .to_string();

    Ok((client, email, token))
}
