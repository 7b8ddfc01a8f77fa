//! Request dispatch shared by every capability client.
//!
//! Each client owns a [`Dispatcher`] and funnels all of its calls through [`Dispatcher::send`].
//! `send` never fails: transport errors, non-success statuses and undecodable bodies are all
//! folded into a JSON object of the form `{"error": "<description>"}`. Use [`is_error`] to tell
//! the two shapes apart.

pub mod middleware;


use crate::config::Configuration;
use middleware::HeaderMiddleware;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware, RequestBuilder};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// Errors caused by misuse of the dispatcher. Remote failures never surface here.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Unsupported method: {0}")]
    UnsupportedMethod(String),
}

/// The HTTP verbs the bridge backend understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl FromStr for Method {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            other => Err(DispatchError::UnsupportedMethod(other.to_string())),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file attached to a multipart POST.
#[derive(Debug, Clone)]
pub struct FilePart {
    /// Form field name, e.g. `"file"`.
    pub field: String,
    pub file_name: String,
    pub content: Vec<u8>,
}

impl FilePart {
    pub fn new(field: impl Into<String>, file_name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            field: field.into(),
            file_name: file_name.into(),
            content,
        }
    }
}

/// Builds the uniform failure value `{"error": message}`.
pub fn error_result(message: impl fmt::Display) -> Value {
    json!({ "error": message.to_string() })
}

/// Returns `true` if `result` is a failure produced by [`Dispatcher::send`].
pub fn is_error(result: &Value) -> bool {
    result.get("error").is_some()
}

/// HTTP client bound to one base URL and one header snapshot.
#[derive(Clone)]
pub struct Dispatcher {
    client: ClientWithMiddleware,
    base_url: String,
}

impl Dispatcher {
    /// Creates a dispatcher for `config`.
    ///
    /// The headers and the base URL are captured now; later edits to `config` are not seen.
    pub fn new(config: &Configuration) -> Self {
        let middleware = HeaderMiddleware::new(config.produce_headers());

        let client = ClientBuilder::new(Client::new()).with(middleware).build();

        Self::new_with_client(client, config.base_url().to_string())
    }

    /// Creates a dispatcher around an existing client. The client is expected to already carry
    /// whatever middleware should apply to requests.
    pub fn new_with_client(client: ClientWithMiddleware, base_url: String) -> Self {
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends one request to `{base_url}/{endpoint}` and returns the decoded JSON response.
    ///
    /// * `GET` sends `query` as URL parameters and no body.
    /// * `POST` sends `body` as JSON, or as a multipart form when `files` is given.
    /// * `PUT` and `DELETE` send `body` as JSON; `query` and `files` are ignored.
    ///
    /// Any failure is returned as `{"error": "..."}` instead of being raised.
    pub async fn send(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Value>,
        query: Option<Value>,
        files: Option<Vec<FilePart>>,
    ) -> Value {
        let url = format!("{}/{}", self.base_url, endpoint);

        let request = match method {
            Method::Get => {
                let req = self.client.get(&url);
                match &query {
                    Some(query) => req.query(query),
                    None => req,
                }
            }
            Method::Post => {
                let req = self.client.post(&url);
                match files {
                    Some(files) => req.multipart(multipart_form(body, files)),
                    None => with_json(req, body),
                }
            }
            Method::Put => with_json(self.client.put(&url), body),
            Method::Delete => with_json(self.client.delete(&url), body),
        };

        match execute(request).await {
            Ok(value) => value,
            Err(e) => {
                debug!(method = %method, url = %url, error = %e, "request failed");
                error_result(e)
            }
        }
    }
}

async fn execute(request: RequestBuilder) -> reqwest_middleware::Result<Value> {
    let response = request.send().await?.error_for_status()?;
    Ok(response.json::<Value>().await?)
}

fn with_json(req: RequestBuilder, body: Option<Value>) -> RequestBuilder {
    match body {
        Some(body) => req.json(&body),
        None => req,
    }
}

// Top-level body fields become text parts; strings are sent raw, anything else as JSON.
fn multipart_form(body: Option<Value>, files: Vec<FilePart>) -> Form {
    let mut form = Form::new();

    if let Some(Value::Object(fields)) = body {
        for (name, value) in fields {
            let text = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
            form = form.text(name, text);
        }
    }

    for file in files {
        form = form.part(file.field, Part::bytes(file.content).file_name(file.file_name));
    }

    form
}
