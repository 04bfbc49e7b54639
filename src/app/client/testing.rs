//! Scripted in-memory transport, a recording observer and upstream JSON
//! builders, shared by unit and integration tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde_json::{json, Value};

use super::{FetchEvent, FetchObserver, Query, Transport};
use crate::errors::{TransportError, TransportResult};

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Scripted reply for one request
#[derive(Debug, Clone)]
pub enum Reply {
    Json(Value),
    Status(u16),
    Slow(Duration, Value),
}

/// Transport answering from a table keyed by `path?query`
///
/// Unscripted requests answer with HTTP 404. Every request is recorded.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    replies: Mutex<HashMap<String, Reply>>,
    requests: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, request: &str, reply: Reply) -> Self {
        locked(&self.replies).insert(request.to_string(), reply);
        self
    }

    pub fn json(self, request: &str, value: Value) -> Self {
        self.reply(request, Reply::Json(value))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<String> {
        locked(&self.requests).clone()
    }

    pub fn count(&self, request: &str) -> usize {
        locked(&self.requests)
            .iter()
            .filter(|r| r.as_str() == request)
            .count()
    }

    fn request_key(path: &str, query: &Query) -> String {
        if query.is_empty() {
            return path.to_string();
        }
        let params: Vec<String> = query
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect();
        format!("{}?{}", path, params.join("&"))
    }
}

impl Transport for ScriptedTransport {
    async fn get_json(&self, path: &str, query: &Query) -> TransportResult<Value> {
        let key = Self::request_key(path, query);
        self.calls.fetch_add(1, Ordering::SeqCst);
        locked(&self.requests).push(key.clone());

        let reply = locked(&self.replies).get(&key).cloned();
        match reply {
            Some(Reply::Json(value)) => Ok(value),
            Some(Reply::Slow(delay, value)) => {
                tokio::time::sleep(delay).await;
                Ok(value)
            }
            Some(Reply::Status(status)) => Err(TransportError::Status {
                status,
                message: "scripted failure".to_string(),
            }),
            None => Err(TransportError::Status {
                status: 404,
                message: format!("unscripted request {}", key),
            }),
        }
    }
}

/// Keeps every event for later inspection
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<FetchEvent>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<FetchEvent> {
        locked(&self.events).clone()
    }
}

impl FetchObserver for RecordingObserver {
    fn on_event(&self, event: &FetchEvent) {
        locked(&self.events).push(event.clone());
    }
}

/// JSON for one photo as the upstream API returns it
pub fn photo_json(id: u64, sol: u32, earth_date: &str, camera: &str, rover: &str) -> Value {
    let rover_id = match rover {
        "Spirit" => 7,
        "Opportunity" => 6,
        _ => 5,
    };
    json!({
        "id": id,
        "sol": sol,
        "camera": {"id": 20, "name": camera, "rover_id": rover_id, "full_name": format!("{} Camera", camera)},
        "img_src": format!("https://mars.nasa.gov/raw/{}.jpg", id),
        "earth_date": earth_date,
        "rover": {"id": rover_id, "name": rover, "landing_date": "2012-08-06", "launch_date": "2011-11-26", "status": "active"}
    })
}

/// `{ "photos": [...] }` with `count` photos numbered from `first_id`
pub fn photos_json(first_id: u64, count: u64, rover: &str) -> Value {
    let photos: Vec<Value> = (first_id..first_id + count)
        .map(|id| photo_json(id, 1000, "2015-05-30", "FHAZ", rover))
        .collect();
    json!({ "photos": photos })
}

/// `{ "latest_photos": [...] }` with `count` photos numbered from `first_id`
pub fn latest_json(first_id: u64, count: u64, rover: &str) -> Value {
    let photos: Vec<Value> = (first_id..first_id + count)
        .map(|id| photo_json(id, 4100, "2024-02-19", "NAVCAM", rover))
        .collect();
    json!({ "latest_photos": photos })
}

/// `{ "rover": {...} }` with the given `max_sol`
pub fn rover_json(name: &str, max_sol: u32) -> Value {
    json!({
        "rover": {
            "id": 5,
            "name": name,
            "landing_date": "2012-08-06",
            "launch_date": "2011-11-26",
            "status": "active",
            "max_sol": max_sol,
            "max_date": "2024-02-19",
            "total_photos": 695000,
            "cameras": [{"name": "FHAZ", "full_name": "Front Hazard Avoidance Camera"}]
        }
    })
}
