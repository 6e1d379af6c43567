//! The HTTP client, against an `axum` server that replies with canned responses

use std::cell::RefCell;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{header, Method, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::Router;
use chrono::{TimeZone, Utc};
use tokio::net::TcpListener;

use taskboard::{ApiClient, DateCursor, SyncCoordinator, TaskId, TaskStatus};
use taskboard::coordinator::STATUS_FAILURE_NOTICE;
use taskboard::task::{Frequency, TaskDraft, TaskFilter, TaskUpdate};
use taskboard::traits::{TaskStore, UserPrompt};
use taskboard::zone::DisplayZone;

const LAUNDRY: &str = r#"{
    "id": "abc", "name": "Laundry", "description": null,
    "status": "InProgress", "frequency": "Weekly",
    "due_date": "2024-03-02T10:00:00Z", "recurrence_date": null,
    "created_at": "2024-03-01T08:00:00Z", "updated_at": "2024-03-01T08:00:00Z"
}"#;

const DENTIST: &str = r#"{
    "id": "def", "name": "Dentist", "description": "Bring the X-rays",
    "status": "Pending", "frequency": "None",
    "due_date": null, "recurrence_date": null
}"#;


/// A request, as received by the stub server
#[derive(Clone, Debug)]
struct Received {
    method: String,
    target: String,
    body: String,
}

impl Received {
    fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

/// Canned `(status code, body)` replies, served in order, and the requests they answered
#[derive(Clone, Default)]
struct Stub {
    replies: Arc<Mutex<VecDeque<(u16, String)>>>,
    received: Arc<Mutex<Vec<Received>>>,
}

impl Stub {
    fn received(&self) -> Vec<Received> {
        self.received.lock().unwrap().clone()
    }
}

async fn reply(State(stub): State<Stub>, method: Method, uri: Uri, body: String) -> impl IntoResponse {
    let target = uri.path_and_query().map(|pq| pq.to_string()).unwrap_or_default();
    stub.received.lock().unwrap().push(Received { method: method.to_string(), target, body });

    // Requests past the script are answered with an error
    let (code, body) = stub.replies.lock().unwrap()
        .pop_front()
        .unwrap_or_else(|| (500, r#"{"error":"unexpected request"}"#.to_string()));
    (StatusCode::from_u16(code).unwrap(), [(header::CONTENT_TYPE, "application/json")], body)
}

/// Start a server that answers every route with the next reply of `replies`.
/// Returns the base URL of the API
async fn serve(replies: Vec<(u16, String)>) -> (String, Stub) {
    let _ = env_logger::builder().is_test(true).try_init();
    // The stub must be reached directly
    for var in &["HTTP_PROXY", "http_proxy", "HTTPS_PROXY", "https_proxy", "ALL_PROXY", "all_proxy"] {
        std::env::remove_var(var);
    }

    let stub = Stub {
        replies: Arc::new(Mutex::new(replies.into_iter().collect())),
        ..Stub::default()
    };
    let app = Router::new()
        .fallback(reply)
        .with_state(stub.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}/api", listener.local_addr().unwrap());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (base_url, stub)
}


#[tokio::test]
async fn test_list_tasks() {
    let (url, server) = serve(vec![(200, format!("[{}, {}]", LAUNDRY, DENTIST))]).await;
    let client = ApiClient::new(&url).unwrap();

    let tasks = client.list_tasks(&TaskFilter::default()).await.unwrap();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].name(), "Laundry");
    assert_eq!(tasks[0].status(), TaskStatus::InProgress);
    assert_eq!(tasks[0].frequency(), &Frequency::Weekly);
    assert!(tasks[0].created_at().is_some());
    assert_eq!(tasks[1].description(), Some("Bring the X-rays"));
    assert!(tasks[1].created_at().is_none());

    let received = server.received();
    assert_eq!(received[0].method, "GET");
    assert_eq!(received[0].target, "/api/tasks");
}

#[tokio::test]
async fn test_filters_are_sent_as_query_parameters() {
    let (url, server) = serve(vec![(200, "[]".to_string())]).await;
    let client = ApiClient::new(&url).unwrap();

    let filter = TaskFilter {
        status: Some(TaskStatus::Completed),
        frequency: Some(Frequency::Daily),
        updated_start_date: Some(Utc.ymd(2024, 3, 1).and_hms(0, 0, 0)),
        ..TaskFilter::default()
    };
    assert!(client.list_tasks(&filter).await.unwrap().is_empty());

    let received = server.received();
    let target = &received[0].target;
    assert!(target.starts_with("/api/tasks?"));
    assert!(target.contains("status=Completed"));
    assert!(target.contains("frequency=Daily"));
    assert!(target.contains("updated_start_date=2024-03-01T00%3A00%3A00Z"));
    assert!(target.contains("name") == false);
}

#[tokio::test]
async fn test_server_errors_are_reported() {
    let (url, server) = serve(vec![(500, r#"{"error":"boom"}"#.to_string())]).await;
    let client = ApiClient::new(&url).unwrap();

    assert!(client.list_tasks(&TaskFilter::default()).await.is_err());
    assert_eq!(server.received().len(), 1);
}

#[tokio::test]
async fn test_unknown_tasks() {
    let (url, server) = serve(vec![
        (404, r#"{"error":"Task not found"}"#.to_string()),
        (200, LAUNDRY.to_string()),
    ]).await;
    let client = ApiClient::new(&url).unwrap();

    assert!(client.get_task(&TaskId::from("nope")).await.unwrap().is_none());
    let laundry = client.get_task(&TaskId::from("abc")).await.unwrap().unwrap();
    assert_eq!(laundry.id(), &TaskId::from("abc"));

    let received = server.received();
    assert_eq!(received[0].target, "/api/tasks/nope");
    assert_eq!(received[1].target, "/api/tasks/abc");
}

#[tokio::test]
async fn test_create_task() {
    let (url, server) = serve(vec![(201, DENTIST.to_string())]).await;
    let client = ApiClient::new(&url).unwrap();

    let draft = TaskDraft {
        name: "Dentist".to_string(),
        frequency: Frequency::Daily,
        ..TaskDraft::default()
    };
    let created = client.create_task(&draft).await.unwrap();
    assert_eq!(created.status(), TaskStatus::Pending);

    let received = server.received();
    assert_eq!(received[0].method, "POST");
    assert_eq!(received[0].target, "/api/tasks");
    assert_eq!(received[0].json(), serde_json::json!({
        "name": "Dentist",
        "description": null,
        "frequency": "Daily",
    }));
}

#[tokio::test]
async fn test_status_updates_only_send_the_status() {
    let (url, server) = serve(vec![(200, LAUNDRY.to_string())]).await;
    let client = ApiClient::new(&url).unwrap();

    client.update_task(&TaskId::from("abc"), &TaskUpdate::status(TaskStatus::InProgress)).await.unwrap();

    let received = server.received();
    assert_eq!(received[0].method, "PUT");
    assert_eq!(received[0].target, "/api/tasks/abc");
    assert_eq!(received[0].json(), serde_json::json!({ "status": "InProgress" }));
}

#[tokio::test]
async fn test_delete_task() {
    let (url, server) = serve(vec![(204, String::new()), (404, String::new())]).await;
    let client = ApiClient::new(&url).unwrap();

    client.delete_task(&TaskId::from("abc")).await.unwrap();
    assert!(client.delete_task(&TaskId::from("abc")).await.is_err());

    let received = server.received();
    assert_eq!(received[0].method, "DELETE");
    assert_eq!(received[0].target, "/api/tasks/abc");
}

#[tokio::test]
async fn test_get_calendar() {
    let calendar = format!(r#"{{
        "year": 2024, "month": 3,
        "weeks": [ {{ "days": [
            {{ "date": "2024-02-25", "tasks": [], "is_today": false, "is_current_month": false, "is_current_week": false }},
            {{ "date": "2024-02-26", "tasks": [{}], "is_today": false, "is_current_month": false, "is_current_week": false }}
        ] }} ]
    }}"#, LAUNDRY);
    let (url, server) = serve(vec![(200, calendar)]).await;
    let client = ApiClient::new(&url).unwrap();

    let month = client.get_calendar(2024, 3).await.unwrap();
    assert_eq!(month.weeks().len(), 1);
    let days: Vec<_> = month.days().collect();
    assert_eq!(days[1].tasks()[0].name(), "Laundry");

    let received = server.received();
    assert_eq!(received[0].target, "/api/calendar/2024/3");
}


#[derive(Default)]
struct RecordedAlerts {
    alerts: RefCell<Vec<String>>,
}

impl UserPrompt for RecordedAlerts {
    fn confirm(&self, _question: &str) -> bool {
        true
    }
    fn alert(&self, message: &str) {
        self.alerts.borrow_mut().push(message.to_string());
    }
}

#[tokio::test]
async fn test_coordinator_over_http() {
    // A failed status change is not followed by any reload
    let (url, server) = serve(vec![(500, String::new())]).await;
    let client = ApiClient::new(&url).unwrap();
    let coordinator = SyncCoordinator::new_with_parameters(
        client, RecordedAlerts::default(),
        DateCursor::new(2024, 3).unwrap(), DisplayZone::Fixed(chrono::FixedOffset::east_opt(0).unwrap()),
    );

    assert!(coordinator.set_status(&TaskId::from("abc"), TaskStatus::Completed).await == false);
    assert_eq!(*coordinator.prompt().alerts.borrow(), vec![STATUS_FAILURE_NOTICE.to_string()]);

    let received = server.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].json(), serde_json::json!({ "status": "Completed" }));
}
