use crate::config::Headers;
use http::Extensions;
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::{Request, Response};
use reqwest_middleware::{Middleware, Next};

/// Stamps a fixed set of headers onto every outgoing request.
///
/// The headers are captured once, when the middleware is created, and never recomputed.
#[derive(Clone, Debug)]
pub struct HeaderMiddleware {
    headers: Headers,
}

impl HeaderMiddleware {
    pub fn new(headers: Headers) -> Self {
        Self { headers }
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }
}

#[async_trait::async_trait]
impl Middleware for HeaderMiddleware {
    async fn handle(
        &self,
        mut req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> reqwest_middleware::Result<Response> {
        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                reqwest_middleware::Error::Middleware(anyhow::anyhow!(
                    "Invalid header name {}: {}",
                    name,
                    e
                ))
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| {
                reqwest_middleware::Error::Middleware(anyhow::anyhow!(
                    "Invalid value for header {}: {}",
                    name,
                    e
                ))
            })?;
            req.headers_mut().insert(name, value);
        }

        next.run(req, extensions).await
    }
}
