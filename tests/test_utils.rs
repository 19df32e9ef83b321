#![allow(dead_code)]

use std::{net::TcpListener, time::Duration};

use actix_web::{middleware::NormalizePath, web, App, HttpServer};
use reqwest::Client;
use serde_json::{json, Value};
use skillmatch_backend::{
    entities::token::AuthResponse,
    routes::configure_routes,
    settings::{AppConfig, AppEnvironment, LogFormat, StorageBackend},
    shared_repos::SharedRepositories,
    AppState,
};

pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub config: AppConfig,
}

impl TestApp {
    /// Starts the full HTTP stack on an ephemeral port with a fresh in-memory store.
    pub async fn spawn() -> Self {
        let config = test_config();
        let state = web::Data::new(AppState::new(&config, SharedRepositories::in_memory()));

        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind test listener");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let server = HttpServer::new(move || {
            App::new()
                .app_data(state.clone())
                .wrap(NormalizePath::trim())
                .configure(configure_routes)
        })
        .listen(listener)
        .expect("Failed to bind server")
        .workers(config.worker_count)
        .disable_signals()
        .run();

        actix_rt::spawn(server);

        let client = Client::new();
        while client.get(format!("{}/api/health", address)).send().await.is_err() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        TestApp { address, client, config }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request")
    }

    pub async fn put_json(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send PUT request")
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request")
    }

    pub async fn delete(&self, path: &str) -> reqwest::Response {
        self.client
            .delete(self.url(path))
            .send()
            .await
            .expect("Failed to send DELETE request")
    }

    pub async fn register(&self, email: &str, password: &str, name: &str, role: &str) -> reqwest::Response {
        self.post_json(
            "/api/auth/register",
            &json!({ "email": email, "password": password, "name": name, "role": role }),
        )
        .await
    }

    /// Registers an employer and returns its account id.
    pub async fn create_employer(&self, email: &str) -> i64 {
        let response = self.register(email, "pw1", "Employer", "EMPLOYER").await;
        assert!(response.status().is_success(), "employer registration failed");
        let auth: AuthResponse = response.json().await.expect("Failed to parse auth response");

        let me: Value = self.client
            .get(self.url("/api/auth/me"))
            .bearer_auth(&auth.token)
            .send()
            .await
            .expect("Failed to fetch account")
            .json()
            .await
            .expect("Failed to parse account");
        me["id"].as_i64().expect("account id missing")
    }

    pub async fn create_skill(&self, name: &str) -> i64 {
        let skill: Value = self
            .post_json("/api/skills", &json!({ "name": name }))
            .await
            .json()
            .await
            .expect("Failed to parse skill");
        skill["id"].as_i64().expect("skill id missing")
    }

    pub async fn create_job(&self, employer_id: i64, required: &[i64]) -> Value {
        let response = self.post_json("/api/jobs", &job_body(employer_id, required)).await;
        assert_eq!(response.status(), reqwest::StatusCode::OK, "job creation failed");
        response.json().await.expect("Failed to parse job")
    }
}

pub fn job_body(employer_id: i64, required: &[i64]) -> Value {
    let skills: Vec<Value> = required.iter().map(|id| json!({ "id": id })).collect();
    json!({
        "title": "Backend engineer",
        "description": "Build matching services",
        "location": "Lagos",
        "employerId": employer_id,
        "requiredSkills": skills,
        "preferredSkills": [],
        "employmentType": "FULL_TIME"
    })
}

fn test_config() -> AppConfig {
    AppConfig {
        env: AppEnvironment::Testing,
        name: "SkillMatch Test".to_string(),
        port: 0,
        host: "127.0.0.1".to_string(),
        worker_count: 1,
        storage_backend: StorageBackend::Memory,
        database_url: String::new(),
        database_max_connections: 1,
        cors_allowed_origins: vec!["*".to_string()],
        jwt_secret: "test_jwt_secret_that_is_long_enough_for_hs512_1234567890".into(),
        jwt_expiration_minutes: 5,
        log_format: LogFormat::Pretty,
    }
}
