use chrono::{Duration, SecondsFormat, Utc};
use ironlog::{config::AppConfig, db::Database, http, AppState};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::oneshot};

struct TestApp {
    base: String,
    client: Client,
    _shutdown: oneshot::Sender<()>,
}

impl TestApp {
    async fn spawn() -> Self {
        let db = Database::in_memory().expect("in-memory database");
        let state = AppState::new(db, AppConfig::default());

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let address = listener.local_addr().expect("local address");
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        tokio::spawn(http::serve(listener, state, async move {
            let _ = shutdown_rx.await;
        }));

        Self {
            base: format!("http://{address}"),
            client: Client::new(),
            _shutdown: shutdown_tx,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    fn get(&self, owner: &str, path: &str) -> RequestBuilder {
        self.client.get(self.url(path)).header(http::OWNER_HEADER, owner)
    }

    async fn create(&self, owner: &str, body: Value) -> Value {
        let response = self
            .client
            .post(self.url("/api/workouts"))
            .header(http::OWNER_HEADER, owner)
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        response.json().await.unwrap()
    }

    async fn get_json(&self, owner: &str, path: &str) -> (StatusCode, Value) {
        let response = self.get(owner, path).send().await.unwrap();
        let status = response.status();
        (status, response.json().await.unwrap())
    }
}

fn bench(date: &str, sets: &[(f64, u32)]) -> Value {
    json!({
        "date": date,
        "workoutType": "Push",
        "exercises": [{
            "name": "Bench Press",
            "unit": "kg",
            "sets": sets
                .iter()
                .map(|(weight, reps)| json!({ "weight": weight, "reps": reps }))
                .collect::<Vec<_>>(),
        }],
    })
}

#[tokio::test]
async fn requests_without_owner_are_rejected() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(app.url("/api/workouts"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let health = app.client.get(app.url("/health")).send().await.unwrap();
    assert_eq!(health.status(), StatusCode::OK);
}

#[tokio::test]
async fn workout_lifecycle() {
    let app = TestApp::spawn().await;

    let created = app
        .create("u1", bench("2024-01-01T18:00:00Z", &[(60.0, 8), (60.0, 8), (65.0, 6)]))
        .await;
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["ownerId"], "u1");
    assert_eq!(created["exercises"][0]["sets"].as_array().unwrap().len(), 3);

    let (status, listed) = app.get_json("u1", "/api/workouts").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let updated: Value = app
        .client
        .put(app.url(&format!("/api/workouts/{id}")))
        .header(http::OWNER_HEADER, "u1")
        .json(&json!({ "notes": "deload next week", "date": "" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(updated["notes"], "deload next week");
    assert_eq!(updated["workoutType"], "Push");
    assert_eq!(updated["date"], created["date"]);

    let (status, _) = app.get_json("u2", &format!("/api/workouts/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let deleted: Value = app
        .client
        .delete(app.url(&format!("/api/workouts/{id}")))
        .header(http::OWNER_HEADER, "u1")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(deleted["message"], "Workout deleted");

    let (status, body) = app.get_json("u1", &format!("/api/workouts/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Workout not found");
}

#[tokio::test]
async fn invalid_workouts_name_the_field() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(app.url("/api/workouts"))
        .header(http::OWNER_HEADER, "u1")
        .json(&json!({
            "exercises": [{ "name": "Squat", "sets": [{ "reps": 5 }] }],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("exercises[0].sets[0].weight"));

    let (status, listed) = app.get_json("u1", "/api/workouts").await;
    assert_eq!(status, StatusCode::OK);
    assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn range_returns_only_dates_inside_bounds() {
    let app = TestApp::spawn().await;
    app.create("u1", bench("2024-01-01T18:00:00Z", &[(60.0, 8)])).await;
    let inside = app.create("u1", bench("2024-01-08T18:00:00Z", &[(70.0, 6)])).await;
    app.create("u2", bench("2024-01-05T18:00:00Z", &[(40.0, 10)])).await;

    let (status, found) = app
        .get_json(
            "u1",
            "/api/workouts/range?startDate=2024-01-03T00:00:00Z&endDate=2024-01-10T00:00:00Z",
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let found = found.as_array().unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["id"], inside["id"]);

    let (status, body) = app
        .get_json("u1", "/api/workouts/range?startDate=yesterday&endDate=2024-01-10")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().starts_with("startDate"));
}

#[tokio::test]
async fn stats_merge_case_variants_in_date_order() {
    let app = TestApp::spawn().await;
    let now = Utc::now();
    let stamp = |days_ago: i64| (now - Duration::days(days_ago)).to_rfc3339_opts(SecondsFormat::Secs, true);

    let later = app.create("u1", bench(&stamp(3), &[(70.0, 6), (70.0, 5)])).await;
    let mut lower = bench(&stamp(10), &[(60.0, 8), (60.0, 8), (65.0, 6)]);
    lower["exercises"][0]["name"] = json!("bench press");
    let earlier = app.create("u1", lower).await;
    app.create("u1", bench(&stamp(90), &[(50.0, 10)])).await;

    let (status, stats) = app.get_json("u1", "/api/workouts/stats?days=30").await;
    assert_eq!(status, StatusCode::OK);

    let buckets = stats.as_object().unwrap();
    assert_eq!(buckets.len(), 1);
    let points = buckets["bench press"].as_array().unwrap();
    assert_eq!(points.len(), 2);
    assert_eq!(points[0]["workoutId"], earlier["id"]);
    assert_eq!(points[0]["sets"].as_array().unwrap().len(), 3);
    assert_eq!(points[1]["workoutId"], later["id"]);
    assert_eq!(points[1]["sets"].as_array().unwrap().len(), 2);

    let (_, filtered) = app
        .get_json("u1", "/api/workouts/stats?exerciseName=squat")
        .await;
    assert!(filtered.as_object().unwrap().is_empty());

    let (status, _) = app.get_json("u1", "/api/workouts/stats?days=-1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn week_view_places_workout_on_its_day() {
    let app = TestApp::spawn().await;
    let monday = app.create("u1", bench("2024-01-08T18:00:00Z", &[(70.0, 6)])).await;

    let (status, view) = app
        .get_json("u1", "/api/workouts/week?anchor=2024-01-10")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["weekStart"], "2024-01-08");
    assert_eq!(view["weekEnd"], "2024-01-14");

    let days = view["days"].as_array().unwrap();
    assert_eq!(days.len(), 7);
    assert_eq!(days[0]["dayName"], "Monday");
    assert_eq!(days[0]["workout"]["id"], monday["id"]);
    assert!(days[1..].iter().all(|day| day["workout"].is_null()));
}
