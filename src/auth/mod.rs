//! Firebase Authentication module.
//!
//! User management through the bridge backend: creating, reading, updating and deleting users,
//! email/password login, verification emails, phone verification and password resets.
//!
//! Every method returns the backend's JSON response, or `{"error": "..."}` if the call failed.
//!
//! # Examples
//!
//! ```rust,no_run
//! # use databridge::DataBridge;
//! # use serde_json::json;
//! # async fn run(app: DataBridge) {
//! let auth = app.auth();
//!
//! let created = auth
//!     .create_user(json!({ "email": "user@example.com", "password": "hunter22" }))
//!     .await;
//! if databridge::core::is_error(&created) {
//!     eprintln!("create failed: {}", created["error"]);
//! }
//! # }
//! ```

use crate::config::Configuration;
use crate::core::{Dispatcher, Method};
use serde_json::{json, Value};


/// Client for the bridge backend's authentication endpoints.
#[derive(Clone)]
pub struct FirebaseAuth {
    config: Configuration,
    dispatcher: Dispatcher,
}

impl FirebaseAuth {
    /// Creates a new `FirebaseAuth` instance.
    ///
    /// This is typically called via `DataBridge::auth()`.
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

    /// Creates a new user from `user_data` (email, password, display name, ...).
    pub async fn create_user(&self, user_data: Value) -> Value {
        let body = json!({ "userData": user_data });
        self.dispatcher
            .send(Method::Post, "", Some(body), None, None)
            .await
    }

    /// Sends a verification email to `email`.
    pub async fn send_verification_email(&self, email: &str) -> Value {
        let query = json!({ "email": email });
        self.dispatcher
            .send(Method::Get, "verification/email", None, Some(query), None)
            .await
    }

    /// Signs a user in with email and password.
    pub async fn login_user(&self, email: &str, password: &str) -> Value {
        let query = json!({ "email": email, "password": password });
        self.dispatcher
            .send(Method::Get, "login", None, Some(query), None)
            .await
    }

    /// Updates the user identified by `uid` with `user_data`.
    pub async fn update_user(&self, uid: &str, user_data: Value) -> Value {
        let body = json!({ "uid": uid, "userData": user_data });
        self.dispatcher
            .send(Method::Put, "", Some(body), None, None)
            .await
    }

    /// Retrieves the user identified by `uid`.
    pub async fn get_user(&self, uid: &str) -> Value {
        let query = json!({ "uid": uid });
        self.dispatcher
            .send(Method::Get, "", None, Some(query), None)
            .await
    }

    /// Deletes the user identified by `uid`.
    ///
    /// The uid travels in the JSON body of the DELETE request, not in the query string.
    pub async fn delete_user(&self, uid: &str) -> Value {
        let body = json!({ "uid": uid });
        self.dispatcher
            .send(Method::Delete, "", Some(body), None, None)
            .await
    }

    /// Starts phone number verification; the response carries the verification id.
    pub async fn create_phone_verification(&self, phone_number: &str) -> Value {
        let body = json!({ "phoneNumber": phone_number });
        self.dispatcher
            .send(Method::Post, "phone", Some(body), None, None)
            .await
    }

    /// Completes phone number verification with the one-time password the user received.
    pub async fn verify_phone_verification(&self, verification_id: &str, otp: &str) -> Value {
        let query = json!({ "verificationId": verification_id, "otp": otp });
        self.dispatcher
            .send(Method::Get, "phone", None, Some(query), None)
            .await
    }

    /// Sends a password reset email to `email`.
    pub async fn reset_password(&self, email: &str) -> Value {
        let query = json!({ "email": email });
        self.dispatcher
            .send(Method::Get, "reset/password", None, Some(query), None)
            .await
    }
}
