use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "integration-password";

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // In-memory store keeps the suite independent of a running database
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_person-api-rust"));
        cmd.env("APP_ENV", "development")
            .env("PORT", port.to_string())
            .env("PERSON_STORE", "memory")
            .env("JWT_SECRET", "integration-secret")
            .env("ADMIN_EMAIL", ADMIN_EMAIL)
            .env("ADMIN_PASSWORD", ADMIN_PASSWORD)
            .env("SECURITY_REQUIRE_AUTH", "false")
            .env("RUST_LOG", "warn")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
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
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Start a dedicated server for one test; it is killed when dropped
pub async fn spawn_server() -> Result<TestServer> {
    let server = TestServer::spawn()?;
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Create a person and return the generated id
#[allow(dead_code)]
pub async fn create_person(server: &TestServer, name: &str, age: i32, hobbies: &[&str]) -> Result<String> {
    let res = reqwest::Client::new()
        .post(server.url("/api/v1/person/create"))
        .json(&json!({ "name": name, "age": age, "hobbies": hobbies }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::OK, "create failed with {}", res.status());

    let body = res.json::<Value>().await?;
    body["data"]["id"]
        .as_str()
        .map(str::to_string)
        .context("create response missing data.id")
}
