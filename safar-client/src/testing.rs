//! In-memory backend double for service tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use safar_core::{ApiError, ApiResult, Endpoint, RestBackend};
use safar_store::ListCache;

use crate::context::AppState;

pub type Write = (&'static str, Option<i64>, Value);

#[derive(Default)]
pub struct FakeBackend {
    rows: Mutex<HashMap<Endpoint, Vec<Value>>>,
    writes: Mutex<Vec<Write>>,
    write_error: Mutex<Option<ApiError>>,
    calls: AtomicUsize,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn seed(&self, endpoint: Endpoint, rows: Vec<Value>) {
        self.rows.lock().unwrap().insert(endpoint, rows);
    }

    pub fn fail_writes(&self, err: ApiError) {
        *self.write_error.lock().unwrap() = Some(err);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> Vec<Write> {
        self.writes.lock().unwrap().clone()
    }

    fn record(&self, method: &'static str, id: Option<i64>, body: &Value) -> ApiResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.write_error.lock().unwrap().clone() {
            return Err(err);
        }
        self.writes.lock().unwrap().push((method, id, body.clone()));
        Ok(())
    }

    fn find(&self, endpoint: Endpoint, id: i64) -> ApiResult<Value> {
        self.rows
            .lock()
            .unwrap()
            .get(&endpoint)
            .and_then(|rows| rows.iter().find(|row| row["id"] == id).cloned())
            .ok_or_else(|| ApiError::NotFound(endpoint.item_path(id)))
    }
}

#[async_trait]
impl RestBackend for FakeBackend {
    async fn list(&self, endpoint: Endpoint, _query: &[(&str, String)]) -> ApiResult<Vec<Value>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.rows.lock().unwrap().get(&endpoint).cloned().unwrap_or_default())
    }

    async fn fetch(&self, endpoint: Endpoint, id: i64) -> ApiResult<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.find(endpoint, id)
    }

    async fn create(&self, _endpoint: Endpoint, body: &Value) -> ApiResult<Value> {
        self.record("POST", None, body)?;
        let mut saved = body.clone();
        saved["id"] = Value::from(100);
        Ok(saved)
    }

    async fn update(&self, _endpoint: Endpoint, id: i64, body: &Value) -> ApiResult<Value> {
        self.record("PUT", Some(id), body)?;
        let mut saved = body.clone();
        saved["id"] = Value::from(id);
        Ok(saved)
    }

    async fn patch(&self, endpoint: Endpoint, id: i64, body: &Value) -> ApiResult<Value> {
        self.record("PATCH", Some(id), body)?;
        let mut row = self.find(endpoint, id)?;
        if let (Value::Object(target), Value::Object(changes)) = (&mut row, body) {
            for (key, value) in changes {
                target.insert(key.clone(), value.clone());
            }
        }
        Ok(row)
    }

    async fn delete(&self, _endpoint: Endpoint, id: i64) -> ApiResult<()> {
        self.record("DELETE", Some(id), &Value::Null)
    }
}

pub fn state_with(backend: Arc<FakeBackend>) -> AppState {
    AppState::new(backend, ListCache::in_memory(), 1)
}
