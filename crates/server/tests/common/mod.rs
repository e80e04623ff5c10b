#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use clap::Parser;
use rusqlite::Connection;
use serde_json::Value;
use server::{cli::Cli, db, routes, AppState};
use shared::{
    api::USER_ID_HEADER,
    model::{NewUser, User},
    types::Uuid,
};
use tempfile::TempDir;
use tower::ServiceExt;

/// Fresh in-memory database with the full schema
pub fn memory_connection() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::configure_new_connection(&mut conn).unwrap();
    db::migrate(&mut conn).unwrap();
    conn
}

pub fn create_user(conn: &mut Connection, username: &str) -> User {
    User::create(conn, NewUser::new(username)).unwrap()
}

/// Moves a row's timestamp column into the past
pub fn backdate(conn: &Connection, table: &str, column: &str, id: &Uuid, days: i64) {
    let when = chrono::Utc::now() - chrono::TimeDelta::try_days(days).unwrap();
    let sql = format!("UPDATE {table} SET {column} = ?1 WHERE id = ?2");
    conn.execute(&sql, (when, id)).unwrap();
}

/// The app on a throwaway database file
pub struct TestApp {
    router: Router,
    _dir: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.sqlite");
        let connection_string = path.to_str().unwrap().to_string();

        db::run_migrations(&connection_string).unwrap();
        let pool = db::create_pool(&connection_string).unwrap();
        let args = Cli::parse_from(["server", "--sqlite-connection-string", &connection_string]);

        Self {
            router: routes::router(AppState::new(pool, args)),
            _dir: dir,
        }
    }

    pub async fn send(&self, request: TestRequest) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(request.method).uri(request.uri);
        if let Some(user_id) = request.user_id {
            builder = builder.header(USER_ID_HEADER, user_id.to_string());
        }
        let body = match request.body {
            Some(body) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(body)
            },
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    /// Registers a user and returns its id
    pub async fn user(&self, username: &str) -> Uuid {
        let (status, body) = self
            .send(TestRequest::post("/api/user").json(&serde_json::json!({ "username": username })))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        serde_json::from_value(body["id"].clone()).unwrap()
    }
}

pub struct TestRequest {
    method: Method,
    uri: String,
    user_id: Option<Uuid>,
    body: Option<String>,
}

impl TestRequest {
    fn new(method: Method, uri: &str) -> Self {
        Self {
            method,
            uri: uri.to_owned(),
            user_id: None,
            body: None,
        }
    }

    pub fn get(uri: &str) -> Self {
        Self::new(Method::GET, uri)
    }

    pub fn post(uri: &str) -> Self {
        Self::new(Method::POST, uri)
    }

    pub fn put(uri: &str) -> Self {
        Self::new(Method::PUT, uri)
    }

    pub fn patch(uri: &str) -> Self {
        Self::new(Method::PATCH, uri)
    }

    pub fn user(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn json(mut self, body: &Value) -> Self {
        self.body = Some(body.to_string());
        self
    }

    pub fn raw(mut self, body: &str) -> Self {
        self.body = Some(body.to_owned());
        self
    }
}
