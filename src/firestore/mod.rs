//! Cloud Firestore module.
//!
//! Document CRUD through the bridge backend. Read and delete calls take the request as a JSON
//! object whose fields are passed through verbatim as query parameters, e.g.
//! `{"collection": "users", "document": "alice"}`.
//!
//! # Examples
//!
//! ```rust,no_run
//! # use databridge::DataBridge;
//! # use serde_json::json;
//! # async fn run(app: DataBridge) {
//! let firestore = app.firestore();
//!
//! let _ = firestore
//!     .create_document(json!({ "collection": "users", "document": "alice", "data": { "age": 30 } }))
//!     .await;
//! let doc = firestore
//!     .read_document(json!({ "collection": "users", "document": "alice" }))
//!     .await;
//! # }
//! ```

use crate::config::Configuration;
use crate::core::{Dispatcher, Method};
use serde_json::{json, Value};


/// Client for the bridge backend's Firestore endpoints.
#[derive(Clone)]
pub struct FirebaseFirestore {
    config: Configuration,
    dispatcher: Dispatcher,
}

impl FirebaseFirestore {
    /// Creates a new `FirebaseFirestore` instance.
    ///
    /// This is typically called via `DataBridge::firestore()`.
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

    /// Creates a document.
    pub async fn create_document(&self, data: Value) -> Value {
        self.dispatcher
            .send(Method::Post, "", Some(json!({ "data": data })), None, None)
            .await
    }

    /// Reads a document.
    pub async fn read_document(&self, req: Value) -> Value {
        self.dispatcher
            .send(Method::Get, "", None, Some(req), None)
            .await
    }

    /// Updates a document.
    pub async fn update_document(&self, data: Value) -> Value {
        self.dispatcher
            .send(Method::Put, "", Some(json!({ "data": data })), None, None)
            .await
    }

    /// Deletes a document.
    ///
    /// `req` is handed to the dispatcher as query parameters, which DELETE does not transmit,
    /// so the request reaches the backend without them.
    pub async fn delete_document(&self, req: Value) -> Value {
        self.dispatcher
            .send(Method::Delete, "", None, Some(req), None)
            .await
    }

    /// Lists document paths.
    pub async fn read_paths(&self, req: Value) -> Value {
        self.dispatcher
            .send(Method::Get, "paths", None, Some(req), None)
            .await
    }

    /// Reads every document matching `req`.
    pub async fn read_all_documents(&self, req: Value) -> Value {
        self.dispatcher
            .send(Method::Get, "all", None, Some(req), None)
            .await
    }
}
