//! Scripted fetch capability shared by the behaviour tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use serde_json::{json, Value};
use tnb_core::{ClientError, HttpRequest, JsonClient, JsonFuture};

/// Answers requests from per-URL queues and records every URL it was asked for.
#[derive(Default)]
pub struct ScriptedJsonClient {
    routes: Mutex<HashMap<String, VecDeque<Result<Value, ClientError>>>>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedJsonClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `body` for `url` (query string included).
    pub fn respond(self, url: &str, body: Value) -> Self {
        self.push(url, Ok(body));
        self
    }

    pub fn fail(self, url: &str, error: ClientError) -> Self {
        self.push(url, Err(error));
        self
    }

    pub fn push(&self, url: &str, outcome: Result<Value, ClientError>) {
        self.routes
            .lock()
            .expect("routes poisoned")
            .entry(url.to_owned())
            .or_default()
            .push_back(outcome);
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("requests poisoned").clone()
    }
}

impl JsonClient for ScriptedJsonClient {
    fn fetch_json<'a>(&'a self, url: &'a str, query: &'a [(String, String)]) -> JsonFuture<'a> {
        let full_url = HttpRequest::get(url).with_query(query.iter().cloned()).full_url();
        self.requests
            .lock()
            .expect("requests poisoned")
            .push(full_url.clone());

        let outcome = self
            .routes
            .lock()
            .expect("routes poisoned")
            .get_mut(&full_url)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| {
                Err(ClientError::from_status(
                    404,
                    format!("no scripted response for {full_url}"),
                ))
            });

        Box::pin(async move { outcome })
    }
}

/// Page envelope around `results`.
pub fn page(results: Vec<Value>, next: Option<&str>, previous: Option<&str>, count: u64) -> Value {
    json!({
        "count": count,
        "next": next,
        "previous": previous,
        "results": results,
    })
}

/// `{"id": "<prefix><n>"}` items numbered from `start`.
pub fn ids(prefix: &str, start: usize, len: usize) -> Vec<Value> {
    (start..start + len)
        .map(|n| json!({ "id": format!("{prefix}{n}") }))
        .collect()
}
