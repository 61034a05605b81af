//! End-to-end HTTP tests for the concrete scenarios below:
//! a real `TcpListener`, a real `axum::serve` task, and a real
//! `reqwest::Client` driving requests at it. Ports are OS-assigned to
//! keep the suite parallel-safe; only the redirect test's upstream host
//! is wired dynamically for the same reason.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use mockloom_core::{Action, Document, ResultSpec, Route, Scenario, ScenarioName, Service, ServiceName};
use mockloom_server::service_runtime::build_router;

async fn spawn(doc: Document) -> (String, tokio::task::JoinHandle<()>) {
    let resolved = Arc::new(mockloom_engine::resolve(&doc).unwrap());
    let service_name = resolved.services.keys().next().unwrap().clone();
    let service = &resolved.services[&service_name];

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = build_router(resolved.clone(), service, reqwest::Client::new());

    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (format!("http://{addr}"), handle)
}

fn static_action(status: u16, body: serde_json::Value) -> Action {
    Action {
        direct: None,
        status,
        result: ResultSpec::Static(body),
    }
}

fn scenario(name: &str, accept: Action, ignore: Action, rate: u64, limit: u64) -> Scenario {
    Scenario {
        name: name.into(),
        duration: None,
        latency: None,
        status: 0,
        rate,
        limit,
        start: None,
        end: None,
        accept,
        ignore,
    }
}

fn single_route_document(scenario_name: &str, scenario_def: Scenario, method: &str, path: &str) -> Document {
    let mut doc = Document::default();
    doc.scenario.insert(ScenarioName::from(scenario_name), scenario_def);
    doc.service.insert(
        ServiceName::from("svc"),
        Service {
            port: 0,
            path: HashMap::from([(
                path.to_string(),
                Route {
                    method: method.to_string(),
                    scenario: ScenarioName::from(scenario_name),
                },
            )]),
        },
    );
    doc
}

#[tokio::test]
async fn e1_static_500() {
    let doc = single_route_document(
        "err",
        scenario(
            "err",
            static_action(500, serde_json::json!({"msg": "boom"})),
            Action::default(),
            0,
            0,
        ),
        "GET",
        "/items",
    );
    let (base, _handle) = spawn(doc).await;

    let response = reqwest::get(format!("{base}/items")).await.unwrap();
    assert_eq!(response.status(), 500);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/json"
    );
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, serde_json::json!({"msg": "boom"}));
}

#[tokio::test]
async fn e2_limit_exhaustion() {
    let doc = single_route_document(
        "cap",
        scenario(
            "cap",
            static_action(200, serde_json::json!({"ok": true})),
            static_action(429, serde_json::json!({"ok": false})),
            0,
            3,
        ),
        "GET",
        "/items",
    );
    let (base, _handle) = spawn(doc).await;
    let client = reqwest::Client::new();

    let mut statuses = Vec::new();
    for _ in 0..5 {
        let response = client.get(format!("{base}/items")).send().await.unwrap();
        statuses.push(response.status().as_u16());
    }
    assert_eq!(statuses, vec![200, 200, 200, 429, 429]);
}

#[tokio::test]
async fn e3_rate_saw_tooth() {
    let doc = single_route_document(
        "rt",
        scenario(
            "rt",
            static_action(200, serde_json::json!({"ok": true})),
            static_action(503, serde_json::json!({"ok": false})),
            2,
            0,
        ),
        "GET",
        "/items",
    );
    let (base, _handle) = spawn(doc).await;
    let client = reqwest::Client::new();

    let mut statuses = Vec::new();
    for _ in 0..6 {
        let response = client.get(format!("{base}/items")).send().await.unwrap();
        statuses.push(response.status().as_u16());
    }
    assert_eq!(statuses, vec![200, 200, 503, 200, 200, 503]);
}

#[tokio::test]
async fn e4_latency_floor() {
    let mut scenario_def = scenario(
        "slow",
        static_action(200, serde_json::json!({"ok": true})),
        Action::default(),
        0,
        0,
    );
    scenario_def.latency = Some("250ms".to_string());
    let doc = single_route_document("slow", scenario_def, "GET", "/items");
    let (base, _handle) = spawn(doc).await;

    let started = std::time::Instant::now();
    let response = reqwest::get(format!("{base}/items")).await.unwrap();
    assert_eq!(response.status(), 200);
    assert!(started.elapsed() >= Duration::from_millis(250));
}

#[tokio::test]
async fn e5_time_window_not_yet_open() {
    let mut scenario_def = scenario(
        "night",
        static_action(200, serde_json::json!({"ok": true})),
        static_action(404, serde_json::json!({"ok": false})),
        0,
        0,
    );
    scenario_def.start = Some((chrono::Utc::now() + chrono::Duration::hours(1)).to_rfc3339());
    let doc = single_route_document("night", scenario_def, "GET", "/items");
    let (base, _handle) = spawn(doc).await;

    let response = reqwest::get(format!("{base}/items")).await.unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn e6_redirect_action() {
    // Upstream: a bare axum router returning 201 "hi" for GET /x.
    let upstream_listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let upstream_addr = upstream_listener.local_addr().unwrap();
    let upstream_router = axum::Router::new().route(
        "/x",
        axum::routing::get(|| async { (axum::http::StatusCode::CREATED, "hi") }),
    );
    let upstream_handle = tokio::spawn(async move {
        axum::serve(upstream_listener, upstream_router).await.unwrap();
    });

    let doc = single_route_document(
        "fwd",
        scenario(
            "fwd",
            Action {
                direct: None,
                status: 200,
                result: ResultSpec::Redirect(mockloom_core::RedirectResult {
                    host: format!("http://{upstream_addr}"),
                }),
            },
            Action::default(),
            0,
            0,
        ),
        "GET",
        "/x",
    );
    let (base, _handle) = spawn(doc).await;

    let response = reqwest::get(format!("{base}/x")).await.unwrap();
    assert_eq!(response.status(), 201);
    assert_eq!(response.text().await.unwrap(), "hi");

    upstream_handle.abort();
}
