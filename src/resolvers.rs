use crate::body::Body;
use crate::context::LogContext;
use crate::record::Fields;
use bytes::Bytes;
use http::{HeaderMap, Request, Response};
use serde_json::{json, Map, Value};
use std::sync::Arc;

/// Error type returned by field resolvers.
#[derive(thiserror::Error, Debug)]
pub enum ResolveError {
    #[error("failed to buffer body: {0}")]
    Io(#[from] std::io::Error),

    #[error("context resolver failed: {0}")]
    Context(String),
}

/// Callback invoked when a [`LogContext`] is logged.
///
/// Useful for pulling values such as a request id out of the context.
pub type ContextResolver = Arc<dyn Fn(&LogContext) -> Result<Fields, ResolveError> + Send + Sync>;

/// Callback invoked when an HTTP request is logged.
///
/// Swap in a custom one when requests carry data (PII, secrets) that must
/// not reach the logs. Implementations must leave the body readable.
pub type RequestResolver =
    Arc<dyn Fn(&mut Request<Body>) -> Result<Fields, ResolveError> + Send + Sync>;

/// Callback invoked when an HTTP response is logged.
pub type ResponseResolver =
    Arc<dyn Fn(&mut Response<Body>) -> Result<Fields, ResolveError> + Send + Sync>;

/// Log the request under `request` with the body as raw text.
pub fn resolve_request(req: &mut Request<Body>) -> Result<Fields, ResolveError> {
    let body = req.body_mut().rehydrate()?;
    Ok(request_fields(req, raw_body(&body)))
}

/// Log the request under `request`, decoding the body as a JSON object.
///
/// A JSON object body ends up as a nested object, which keeps it queryable
/// downstream. Only the leading value is decoded; trailing data is ignored.
/// Anything else (malformed JSON, arrays, scalars, empty) falls back to
/// [`resolve_request`] output.
pub fn resolve_json_request(req: &mut Request<Body>) -> Result<Fields, ResolveError> {
    let body = req.body_mut().rehydrate()?;
    let rendered = json_object_body(&body).unwrap_or_else(|| raw_body(&body));
    Ok(request_fields(req, rendered))
}

/// Log the response under `response` with the body as raw text.
pub fn resolve_response(resp: &mut Response<Body>) -> Result<Fields, ResolveError> {
    let body = resp.body_mut().rehydrate()?;
    Ok(response_fields(resp, raw_body(&body)))
}

/// JSON-aware counterpart of [`resolve_response`].
pub fn resolve_json_response(resp: &mut Response<Body>) -> Result<Fields, ResolveError> {
    let body = resp.body_mut().rehydrate()?;
    let rendered = json_object_body(&body).unwrap_or_else(|| raw_body(&body));
    Ok(response_fields(resp, rendered))
}

/// Build a context resolver that copies context keys into renamed fields.
///
/// Each pair is `(context key, field name)`. Keys missing from the context
/// are skipped.
///
/// ```
/// use common_logger::{resolvers::context_fields, LogContext};
///
/// let resolve = context_fields([("x-request-id", "x_response_id")]);
/// let ctx = LogContext::new().with_value("x-request-id", "abc");
/// let fields = resolve(&ctx).unwrap();
/// assert_eq!(fields["x_response_id"], "abc");
/// ```
pub fn context_fields<I, K, F>(
    mapping: I,
) -> impl Fn(&LogContext) -> Result<Fields, ResolveError> + Send + Sync + 'static
where
    I: IntoIterator<Item = (K, F)>,
    K: Into<String>,
    F: Into<String>,
{
    let mapping: Vec<(String, String)> = mapping
        .into_iter()
        .map(|(k, f)| (k.into(), f.into()))
        .collect();

    move |ctx: &LogContext| -> Result<Fields, ResolveError> {
        Ok(mapping
            .iter()
            .filter_map(|(key, field)| ctx.value(key).map(|v| (field.clone(), v.clone())))
            .collect())
    }
}

fn request_fields(req: &Request<Body>, body: Value) -> Fields {
    let mut fields = Fields::new();
    fields.insert(
        "request".to_string(),
        json!({
            "method": req.method().as_str(),
            "url": req.uri().to_string(),
            "headers": headers_value(req.headers()),
            "body": body,
        }),
    );
    fields
}

fn response_fields(resp: &Response<Body>, body: Value) -> Fields {
    let mut fields = Fields::new();
    fields.insert(
        "response".to_string(),
        json!({
            "statusCode": resp.status().as_u16(),
            "headers": headers_value(resp.headers()),
            "body": body,
        }),
    );
    fields
}

/// Headers as `{name: [values...]}`; repeated headers keep every value.
fn headers_value(headers: &HeaderMap) -> Value {
    let mut out = Map::new();
    for name in headers.keys() {
        let values = headers
            .get_all(name)
            .iter()
            .map(|v| Value::String(String::from_utf8_lossy(v.as_bytes()).into_owned()))
            .collect();
        out.insert(name.as_str().to_string(), Value::Array(values));
    }
    Value::Object(out)
}

fn raw_body(body: &Bytes) -> Value {
    Value::String(String::from_utf8_lossy(body).into_owned())
}

/// Decode the first JSON value of the body as an object.
///
/// Data after that first value is ignored, so an NDJSON body logs its
/// first object. A literal `null` logs as `null`.
fn json_object_body(body: &Bytes) -> Option<Value> {
    let mut values = serde_json::Deserializer::from_slice(body)
        .into_iter::<Option<Map<String, Value>>>();
    match values.next()? {
        Ok(Some(obj)) => Some(Value::Object(obj)),
        Ok(None) => Some(Value::Null),
        Err(_) => None,
    }
}
