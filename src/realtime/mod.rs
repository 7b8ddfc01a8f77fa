//! Firebase Realtime Database module.
//!
//! Key-value item CRUD through the bridge backend, addressed under the database URL carried in
//! the [`Configuration`].

use crate::config::Configuration;
use crate::core::{Dispatcher, Method};
use serde_json::{json, Value};


/// Client for the bridge backend's Realtime Database endpoints.
#[derive(Clone)]
pub struct FirebaseRealtime {
    config: Configuration,
    dispatcher: Dispatcher,
}

impl FirebaseRealtime {
    /// Creates a new `FirebaseRealtime` instance.
    ///
    /// This is typically called via `DataBridge::realtime()`.
    pub fn new(config: &Configuration) -> Self {
        Self {
            config: config.clone(),
            dispatcher: Dispatcher::new(config),
        }
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        self.dispatcher.base_url()
    }

    pub async fn create_item(&self, data: Value) -> Value {
        self.dispatcher
            .send(Method::Post, "create", Some(json!({ "data": data })), None, None)
            .await
    }

    /// Reads items; the fields of `req` become query parameters.
    pub async fn read_items(&self, req: Value) -> Value {
        self.dispatcher
            .send(Method::Get, "read", None, Some(req), None)
            .await
    }

    pub async fn update_item(&self, id: &str, new_data: Value) -> Value {
        let body = json!({ "id": id, "newData": new_data });
        self.dispatcher
            .send(Method::Put, "update", Some(body), None, None)
            .await
    }

    pub async fn delete_item(&self, id: &str) -> Value {
        self.dispatcher
            .send(Method::Delete, "delete", Some(json!({ "id": id })), None, None)
            .await
    }
}
