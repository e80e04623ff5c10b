mod common;

use axum::http::StatusCode;
use chrono::Utc;
use common::{TestApp, TestRequest};
use serde_json::{json, Value};
use shared::types::Uuid;

#[tokio::test]
async fn ping() {
    let app = TestApp::new();
    let (status, _) = app.send(TestRequest::get("/api/ping")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn requests_need_a_known_user() {
    let app = TestApp::new();

    let (status, _) = app.send(TestRequest::get("/api/profile")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.send(TestRequest::get("/api/profile").user(Uuid::new_v4())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let alice = app.user("alice").await;
    let (status, body) = app.send(TestRequest::get("/api/user").user(alice)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");
}

#[tokio::test]
async fn user_registration_validation() {
    let app = TestApp::new();
    app.user("alice").await;

    let (status, body) = app
        .send(TestRequest::post("/api/user").json(&json!({ "username": "alice" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "UsernameUnavailable");

    let (status, body) = app
        .send(TestRequest::post("/api/user").json(&json!({ "username": "a b" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["validation"]["field_errors"]["username"].is_array());
}

#[tokio::test]
async fn profile_versions() {
    let app = TestApp::new();
    let alice = app.user("alice").await;

    let (status, _) = app.send(TestRequest::get("/api/profile").user(alice)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .send(TestRequest::put("/api/profile").user(alice).json(&json!({ "weight": 70 })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, created) = app
        .send(
            TestRequest::post("/api/profile")
                .user(alice)
                .json(&json!({ "height": 175, "weight": 70, "location": "Oslo" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["bmi"], 22.9);
    assert_eq!(created["is_current"], true);

    let (status, patched) = app
        .send(TestRequest::patch("/api/profile").user(alice).json(&json!({ "weight": 72 })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["height"], 175);
    assert_eq!(patched["weight"], 72);
    assert_ne!(patched["id"], created["id"]);

    let (status, current) = app.send(TestRequest::get("/api/profile").user(alice)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(current["id"], patched["id"]);

    let (_, history) = app.send(TestRequest::get("/api/profile/history").user(alice)).await;
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["id"], patched["id"]);
    assert_eq!(history[1]["id"], created["id"]);
    assert_eq!(history[1]["is_current"], false);
    assert_eq!(history[1]["weight"], 70);
}

#[tokio::test]
async fn malformed_profile_payloads() {
    let app = TestApp::new();
    let alice = app.user("alice").await;

    let (status, _) = app
        .send(TestRequest::post("/api/profile").user(alice).raw("{not json"))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send(TestRequest::post("/api/profile").user(alice).json(&json!({ "height": "tall" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .send(
            TestRequest::post("/api/profile")
                .user(alice)
                .json(&json!({ "location": "x".repeat(31) })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["validation"]["field_errors"]["location"].is_array());
}

#[tokio::test]
async fn weight_and_bmi_reports() {
    let app = TestApp::new();
    let alice = app.user("alice").await;

    let (status, body) = app.send(TestRequest::get("/api/analytics/weight").user(alice)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No profile data available");

    for profile in [
        json!({ "height": 175, "weight": 70 }),
        json!({ "weight": 74 }),
        json!({ "height": 175, "weight": 72 }),
    ] {
        let (status, _) = app
            .send(TestRequest::post("/api/profile").user(alice).json(&profile))
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, weight) = app
        .send(TestRequest::get("/api/analytics/weight?days=7").user(alice))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(weight["time_period"], "Last 7 days");
    assert_eq!(weight["current"], 72);
    assert_eq!(weight["stats"]["avg"], 72.0);
    assert_eq!(weight["stats"]["max"], 74);
    assert_eq!(weight["stats"]["min"], 70);
    assert_eq!(weight["history"].as_array().unwrap().len(), 3);

    let (status, bmi) = app.send(TestRequest::get("/api/analytics/bmi").user(alice)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bmi["current"], 23.5);
    let values: Vec<_> = bmi["history"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["value"].clone())
        .collect();
    assert_eq!(values, [json!(22.9), json!(23.5)]);
}

#[tokio::test]
async fn bad_days_are_rejected() {
    let app = TestApp::new();
    let alice = app.user("alice").await;

    for days in ["abc", "0", "-5", "1.5"] {
        let uri = format!("/api/analytics/weight?days={days}");
        let (status, _) = app.send(TestRequest::get(&uri).user(alice)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "days={days}");
    }
}

async fn post(app: &TestApp, user: Uuid, uri: &str, body: Value) -> Value {
    let (status, body) = app.send(TestRequest::post(uri).user(user).json(&body)).await;
    assert_eq!(status, StatusCode::CREATED, "{uri}: {body}");
    body
}

#[tokio::test]
async fn exercise_report() {
    let app = TestApp::new();
    let alice = app.user("alice").await;
    let bob = app.user("bobby").await;
    let today = Utc::now().date_naive().to_string();

    let squat = post(&app, alice, "/api/exercises", json!({ "name": "Squat", "category": "strength" })).await;
    let squat_uri = format!("/api/analytics/exercise/{}?days=14", squat["id"].as_str().unwrap());

    let (status, body) = app.send(TestRequest::get(&squat_uri).user(alice)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NoWorkoutData");

    let first = post(&app, alice, "/api/workouts/sessions", json!({ "date": today, "duration": 60 })).await;
    let second = post(&app, alice, "/api/workouts/sessions", json!({ "date": today, "duration": 45 })).await;
    for (session, sets, reps, weight) in [(&first, 3, 10, 50.0), (&second, 4, 8, 60.0)] {
        post(
            &app,
            alice,
            "/api/workouts/logs",
            json!({
                "session_id": session["id"],
                "exercise_id": squat["id"],
                "sets": sets,
                "reps": reps,
                "weight": weight,
            }),
        )
        .await;
    }

    let (status, report) = app.send(TestRequest::get(&squat_uri).user(alice)).await;
    assert_eq!(status, StatusCode::OK, "{report}");
    assert_eq!(report["exercise"], "Squat");
    assert_eq!(report["time_period"], "Last 14 days");
    assert_eq!(report["volume"]["total_volume"], 62);
    assert_eq!(report["volume"]["sessions_per_week"], 1.0);
    assert_eq!(report["frequency"]["total_sessions"], 2);
    let progression: Vec<_> = report["progression"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["volume"].clone())
        .collect();
    assert_eq!(progression, [json!(1500.0), json!(1920.0)]);
    assert_eq!(report["last_improvement"]["percentage"], 28.0);
    assert_eq!(report["last_improvement"]["time_span"], 0);

    let (status, _) = app.send(TestRequest::get(&squat_uri).user(bob)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let missing = format!("/api/analytics/exercise/{}", Uuid::new_v4());
    let (status, body) = app.send(TestRequest::get(&missing).user(alice)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "ExerciseNotFound");
}

#[tokio::test]
async fn workout_log_permissions() {
    let app = TestApp::new();
    let alice = app.user("alice").await;
    let bob = app.user("bobby").await;
    let today = Utc::now().date_naive().to_string();

    let alice_session = post(&app, alice, "/api/workouts/sessions", json!({ "date": today, "duration": 30 })).await;
    let alice_row = post(&app, alice, "/api/exercises", json!({ "name": "Row", "category": "pull" })).await;
    let bob_row = post(&app, bob, "/api/exercises", json!({ "name": "Row", "category": "pull" })).await;

    let (status, body) = app
        .send(TestRequest::post("/api/workouts/logs").user(bob).json(&json!({
            "session_id": alice_session["id"],
            "exercise_id": bob_row["id"],
            "sets": 3,
            "reps": 10,
        })))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "NotSessionOwner");

    let (status, body) = app
        .send(TestRequest::post("/api/workouts/logs").user(alice).json(&json!({
            "session_id": alice_session["id"],
            "exercise_id": bob_row["id"],
            "sets": 3,
            "reps": 10,
        })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "You can only log exercises for your own sessions");

    post(
        &app,
        alice,
        "/api/workouts/logs",
        json!({ "session_id": alice_session["id"], "exercise_id": alice_row["id"], "sets": 3, "reps": 10 }),
    )
    .await;

    let uri = format!("/api/workouts/logs?exercise_id={}", alice_row["id"].as_str().unwrap());
    let (status, logs) = app.send(TestRequest::get(&uri).user(alice)).await;
    assert_eq!(status, StatusCode::OK);
    let logs = logs.as_array().unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0]["exercise_name"], "Row");
    assert_eq!(logs[0]["volume"], 0.0);

    let (_, logs) = app.send(TestRequest::get("/api/workouts/logs").user(bob)).await;
    assert!(logs.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn programs() {
    let app = TestApp::new();
    let alice = app.user("alice").await;
    let bob = app.user("bobby").await;

    let program = post(&app, alice, "/api/programs", json!({ "name": "Legs" })).await;
    let squat = post(&app, alice, "/api/exercises", json!({ "name": "Squat", "category": "strength" })).await;
    let uri = format!("/api/programs/{}/exercises", program["id"].as_str().unwrap());

    let entry = post(&app, alice, &uri, json!({ "exercise_id": squat["id"], "order": 1 })).await;
    assert_eq!(entry["default_sets"], 3);
    assert_eq!(entry["order"], 1);

    let (status, _) = app
        .send(TestRequest::post(&uri).user(alice).json(&json!({ "exercise_id": squat["id"] })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send(TestRequest::post(&uri).user(bob).json(&json!({ "exercise_id": squat["id"] })))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, entries) = app.send(TestRequest::get(&uri).user(alice)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(entries[0]["exercise_name"], "Squat");

    let (status, _) = app
        .send(TestRequest::post("/api/workouts/sessions").user(bob).json(&json!({
            "program_id": program["id"],
            "date": "2024-03-01",
            "duration": 30,
        })))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let session = post(
        &app,
        alice,
        "/api/workouts/sessions",
        json!({ "program_id": program["id"], "date": "2024-03-01", "duration": 30 }),
    )
    .await;
    let uri = format!("/api/workouts/sessions?program_id={}", program["id"].as_str().unwrap());
    let (_, sessions) = app.send(TestRequest::get(&uri).user(alice)).await;
    assert_eq!(sessions[0]["id"], session["id"]);
}

#[tokio::test]
async fn malformed_ids_are_not_found() {
    let app = TestApp::new();
    let alice = app.user("alice").await;

    let (status, body) = app
        .send(TestRequest::get("/api/analytics/exercise/42").user(alice))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "ExerciseNotFound");
    assert_eq!(body["message"], "Exercise not found");

    let (status, body) = app
        .send(TestRequest::get("/api/programs/not-a-uuid/exercises").user(alice))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "ProgramNotFound");

    let (status, body) = app
        .send(
            TestRequest::post("/api/programs/42/exercises")
                .user(alice)
                .json(&json!({ "exercise_id": Uuid::new_v4() })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "ProgramNotFound");

    let (status, _) = app.send(TestRequest::get("/api/analytics/exercise/42")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
