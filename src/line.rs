use crate::clock::Clock;
use crate::config::Resolvers;
use crate::option::LogOption;
use crate::record::{Fields, LogLine};
use crate::resolvers::ResolveError;
use serde_json::Value;

/// Turns an ordered list of [`LogOption`]s into a [`LogLine`].
///
/// Options are applied front to back. When two options produce the same
/// field key, the one applied later wins. Resolver failures never abort the
/// build: the failing option contributes nothing, the error is kept on
/// [`LogLine::resolve_errors`] and reported as a `tracing` warning.
pub struct LineBuilder<'r> {
    resolvers: &'r Resolvers,
    clock: &'r dyn Clock,
}

impl<'r> LineBuilder<'r> {
    pub fn new(resolvers: &'r Resolvers, clock: &'r dyn Clock) -> Self {
        Self { resolvers, clock }
    }

    pub fn build<'a, I>(&self, opts: I) -> LogLine
    where
        I: IntoIterator<Item = LogOption<'a>>,
    {
        let mut message = String::new();
        let mut timestamp = None;
        let mut context = None;
        let mut fields = Fields::new();
        let mut resolve_errors = Vec::new();

        for opt in opts {
            match opt {
                LogOption::Message(m) => message = m.into_owned(),
                LogOption::Context(ctx) => {
                    if let Some(resolve) = &self.resolvers.context {
                        absorb(&mut fields, &mut resolve_errors, "context", resolve(&ctx));
                    }
                    context = Some(ctx);
                }
                LogOption::Request(req) => {
                    if let Some(resolve) = &self.resolvers.request {
                        absorb(&mut fields, &mut resolve_errors, "request", resolve(req));
                    }
                }
                LogOption::Response(resp) => {
                    if let Some(resolve) = &self.resolvers.response {
                        absorb(&mut fields, &mut resolve_errors, "response", resolve(resp));
                    }
                }
                LogOption::Url(url) => {
                    fields.insert("url".to_string(), Value::String(url.into()));
                }
                LogOption::Error(err) => {
                    fields.insert("error".to_string(), Value::String(err.to_string()));
                }
                LogOption::Fields(extra) => fields.extend(extra),
                LogOption::Time(t) => timestamp = Some(t),
            }
        }

        LogLine {
            message,
            timestamp: timestamp.unwrap_or_else(|| self.clock.now()),
            fields,
            context,
            resolve_errors,
        }
    }
}

fn absorb(
    fields: &mut Fields,
    errors: &mut Vec<ResolveError>,
    source: &'static str,
    resolved: Result<Fields, ResolveError>,
) {
    match resolved {
        Ok(extra) => fields.extend(extra),
        Err(e) => {
            tracing::warn!(target: "common_logger", source, error = %e, "field resolver failed, fields omitted");
            errors.push(e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::Body;
    use crate::clock::FixedClock;
    use crate::context::LogContext;
    use crate::resolvers::{context_fields, resolve_json_request};
    use chrono::{DateTime, TimeZone, Utc};
    use http::{Request, Response};
    use serde_json::json;
    use std::io::{self, Read};
    use std::sync::Arc;
    use url::Url;

    fn t(secs: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2006, 1, 2, 4, 5, secs).unwrap()
    }

    fn fields(pairs: &[(&str, Value)]) -> Fields {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn last_message_wins_and_clock_fills_missing_time() {
        let resolvers = Resolvers::default();
        let clock = FixedClock(t(0));
        let line = LineBuilder::new(&resolvers, &clock).build(crate::opts!["first", "second"]);

        assert_eq!(line.message, "second");
        assert_eq!(line.timestamp, t(0));
        assert!(line.fields.is_empty());
        assert!(line.context.is_none());
    }

    #[test]
    fn explicit_time_beats_clock() {
        let resolvers = Resolvers::default();
        let clock = FixedClock(t(0));
        let line = LineBuilder::new(&resolvers, &clock).build(crate::opts![t(9)]);
        assert_eq!(line.timestamp, t(9));
    }

    #[test]
    fn context_is_kept_even_without_resolver() {
        let resolvers = Resolvers::default();
        let clock = FixedClock(t(0));
        let ctx = LogContext::new().with_value("x-request-id", "abc");

        let line = LineBuilder::new(&resolvers, &clock).build(crate::opts![&ctx]);

        assert_eq!(line.context, Some(ctx));
        assert!(line.fields.is_empty());
    }

    #[test]
    fn request_without_resolver_is_left_alone() {
        let resolvers = Resolvers::default();
        let clock = FixedClock(t(0));
        let mut req = Request::post("http://example.com/")
            .body(Body::from("untouched"))
            .unwrap();

        let line = LineBuilder::new(&resolvers, &clock).build(crate::opts![&mut req]);

        assert!(line.fields.is_empty());
        let mut s = String::new();
        req.body_mut().read_to_string(&mut s).unwrap();
        assert_eq!(s, "untouched");
    }

    #[test]
    fn response_without_resolver_is_left_alone() {
        let resolvers = Resolvers {
            request: Some(Arc::new(resolve_json_request)),
            ..Resolvers::default()
        };
        let clock = FixedClock(t(0));
        let mut resp = Response::builder()
            .status(502)
            .body(Body::from_reader(io::Cursor::new(b"bad gateway".to_vec())))
            .unwrap();

        let line = LineBuilder::new(&resolvers, &clock).build(crate::opts![&mut resp]);

        assert!(line.fields.is_empty());
        assert!(line.resolve_errors.is_empty());
        assert_eq!(format!("{:?}", resp.body()), "Body::Stream(..)");
        let mut s = String::new();
        resp.body_mut().read_to_string(&mut s).unwrap();
        assert_eq!(s, "bad gateway");
    }

    #[test]
    fn url_and_error_set_their_fields() {
        let resolvers = Resolvers::default();
        let clock = FixedClock(t(0));
        let url = Url::parse("https://example.com/search?q=rust").unwrap();
        let err = io::Error::new(io::ErrorKind::Other, "some error");

        let line = LineBuilder::new(&resolvers, &clock)
            .build(crate::opts![url, LogOption::error(&err)]);

        assert_eq!(line.fields["url"], json!("https://example.com/search?q=rust"));
        assert_eq!(line.fields["error"], json!("some error"));
    }

    #[test]
    fn later_sources_overwrite_earlier_ones() {
        let resolvers = Resolvers {
            context: Some(Arc::new(context_fields([("user", "user")]))),
            ..Resolvers::default()
        };
        let clock = FixedClock(t(0));
        let ctx = LogContext::new().with_value("user", "from-context");

        let line = LineBuilder::new(&resolvers, &clock).build(crate::opts![
            fields(&[("user", json!("from-fields")), ("stage", json!(1))]),
            &ctx,
            fields(&[("stage", json!(2))]),
        ]);

        assert_eq!(line.fields["user"], json!("from-context"));
        assert_eq!(line.fields["stage"], json!(2));
    }

    #[test]
    fn failing_resolver_is_swallowed_and_recorded() {
        let resolvers = Resolvers {
            context: Some(Arc::new(|_: &LogContext| -> Result<Fields, ResolveError> {
                Err(ResolveError::Context("store unavailable".to_string()))
            })),
            ..Resolvers::default()
        };
        let clock = FixedClock(t(0));

        let line = LineBuilder::new(&resolvers, &clock).build(crate::opts![
            fields(&[("kept", json!(true))]),
            LogContext::new(),
            "still logged",
        ]);

        assert_eq!(line.message, "still logged");
        assert_eq!(line.fields, fields(&[("kept", json!(true))]));
        assert_eq!(line.resolve_errors.len(), 1);
        assert!(line.context.is_some());
    }

    #[test]
    fn json_request_end_to_end() {
        let resolvers = Resolvers {
            context: Some(Arc::new(context_fields([("x-request-id", "x_response_id")]))),
            request: Some(Arc::new(resolve_json_request)),
            response: None,
        };
        let clock = FixedClock(t(0));
        let ctx = LogContext::new().with_value("x-request-id", "abc");
        let mut req = Request::post("http://example.com/items")
            .body(Body::from("{\"k\":\"v\"}"))
            .unwrap();

        let line = LineBuilder::new(&resolvers, &clock)
            .build(crate::opts![&ctx, "hello", &mut req, t(6)]);

        assert_eq!(line.message, "hello");
        assert_eq!(line.timestamp, t(6));
        assert_eq!(line.fields["x_response_id"], json!("abc"));
        assert_eq!(
            line.fields["request"],
            json!({
                "method": "POST",
                "url": "http://example.com/items",
                "headers": {},
                "body": {"k": "v"},
            })
        );
    }
}
