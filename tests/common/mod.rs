//! In-process authentication server used by the integration tests
#![allow(dead_code)]

use actix_web::http::StatusCode;
use actix_web::{web, App, HttpResponse, HttpServer};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Canned answer for one endpoint
#[derive(Clone)]
pub struct CannedResponse {
    pub path: &'static str,
    pub status: u16,
    pub body: String,
    pub delay: Duration,
}

impl CannedResponse {
    pub fn json(path: &'static str, status: u16, body: &Value) -> Self {
        Self {
            path,
            status,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn raw(path: &'static str, status: u16, body: &str) -> Self {
        Self {
            path,
            status,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Running mock server plus the JSON bodies it received
pub struct MockAuthServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<(String, Value)>>>,
}

impl MockAuthServer {
    /// Bind to an ephemeral port and serve the canned responses
    pub fn start(responses: Vec<CannedResponse>) -> Self {
        let requests: Arc<Mutex<Vec<(String, Value)>>> = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);

        let server = HttpServer::new(move || {
            let mut app = App::new();
            for canned in responses.clone() {
                let recorded = Arc::clone(&recorded);
                app = app.route(
                    canned.path,
                    web::post().to(move |payload: web::Json<Value>| {
                        let canned = canned.clone();
                        let recorded = Arc::clone(&recorded);
                        async move {
                            recorded
                                .lock()
                                .unwrap()
                                .push((canned.path.to_string(), payload.into_inner()));
                            if !canned.delay.is_zero() {
                                actix_web::rt::time::sleep(canned.delay).await;
                            }
                            HttpResponse::build(StatusCode::from_u16(canned.status).unwrap())
                                .content_type("application/json")
                                .body(canned.body)
                        }
                    }),
                );
            }
            app
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .expect("bind mock auth server");

        let addr = server.addrs()[0];
        actix_web::rt::spawn(server.run());

        Self {
            base_url: format!("http://{addr}"),
            requests,
        }
    }

    /// Bodies received so far, with the path they were sent to
    pub fn requests(&self) -> Vec<(String, Value)> {
        self.requests.lock().unwrap().clone()
    }
}
