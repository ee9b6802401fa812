//! In-process stand-in for the nutrition database search endpoint.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use parking_lot::Mutex;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

#[derive(Default)]
struct FakeState {
    scripted: VecDeque<(u16, String)>,
    fallback: Option<(u16, String)>,
    queries: Vec<HashMap<String, String>>,
}

#[derive(Clone, Default)]
pub struct FakeNutritionDb {
    state: Arc<Mutex<FakeState>>,
}

pub struct RunningFakeDb {
    pub base_url: String,
    handle: JoinHandle<()>,
}

impl Drop for RunningFakeDb {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

impl FakeNutritionDb {
    /// Answers every request with `status` and `body` once the script runs out.
    pub fn always(status: u16, body: impl Into<String>) -> Self {
        let db = Self::default();
        db.state.lock().fallback = Some((status, body.into()));
        db
    }

    /// Queues one response ahead of the fallback.
    pub fn respond_next(self, status: u16, body: impl Into<String>) -> Self {
        self.state.lock().scripted.push_back((status, body.into()));
        self
    }

    pub fn queries(&self) -> Vec<HashMap<String, String>> {
        self.state.lock().queries.clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.lock().queries.len()
    }

    pub async fn spawn(&self) -> RunningFakeDb {
        let app = Router::new()
            .route("/cgi/search.pl", get(search))
            .with_state(self.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake db");
        let addr = listener.local_addr().expect("fake db addr");
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        RunningFakeDb {
            base_url: format!("http://{addr}"),
            handle,
        }
    }
}

async fn search(
    State(db): State<FakeNutritionDb>,
    Query(query): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let (status, body) = {
        let mut state = db.state.lock();
        state.queries.push(query);
        state
            .scripted
            .pop_front()
            .or_else(|| state.fallback.clone())
            .unwrap_or((404, String::new()))
    };

    (
        StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
}
