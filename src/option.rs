use crate::body::Body;
use crate::context::LogContext;
use crate::record::Fields;
use chrono::{DateTime, Utc};
use http::{Request, Response};
use std::borrow::Cow;
use std::error::Error;
use std::fmt;
use std::time::SystemTime;
use url::Url;

/// One input to a logging call.
///
/// Every logging call takes an ordered list of options; the builder walks
/// them front to back. Use [`opts!`](crate::opts) to build the list from
/// plain values.
pub enum LogOption<'a> {
    /// Log message. The last one wins.
    Message(Cow<'a, str>),
    /// Context for the line, fed to the context resolver.
    Context(LogContext),
    /// Request fed to the request resolver. Its body is restored afterwards.
    Request(&'a mut Request<Body>),
    /// Response fed to the response resolver. Its body is restored afterwards.
    Response(&'a mut Response<Body>),
    /// Sets the `url` field.
    Url(Url),
    /// Sets the `error` field to the error's display text.
    Error(&'a (dyn Error + 'a)),
    /// Merged into the line's fields as-is.
    Fields(Fields),
    /// Overrides the line timestamp.
    Time(DateTime<Utc>),
}

impl<'a> LogOption<'a> {
    pub fn error(err: &'a (dyn Error + 'a)) -> Self {
        LogOption::Error(err)
    }

    /// Short name of the option kind, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            LogOption::Message(_) => "message",
            LogOption::Context(_) => "context",
            LogOption::Request(_) => "request",
            LogOption::Response(_) => "response",
            LogOption::Url(_) => "url",
            LogOption::Error(_) => "error",
            LogOption::Fields(_) => "fields",
            LogOption::Time(_) => "time",
        }
    }
}

impl fmt::Debug for LogOption<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogOption::Message(m) => f.debug_tuple("Message").field(m).finish(),
            LogOption::Context(c) => f.debug_tuple("Context").field(c).finish(),
            LogOption::Request(r) => f
                .debug_tuple("Request")
                .field(&format_args!("{} {}", r.method(), r.uri()))
                .finish(),
            LogOption::Response(r) => f.debug_tuple("Response").field(&r.status()).finish(),
            LogOption::Url(u) => f.debug_tuple("Url").field(&u.as_str()).finish(),
            LogOption::Error(e) => f.debug_tuple("Error").field(&e.to_string()).finish(),
            LogOption::Fields(fields) => f.debug_tuple("Fields").field(fields).finish(),
            LogOption::Time(t) => f.debug_tuple("Time").field(t).finish(),
        }
    }
}

impl<'a> From<&'a str> for LogOption<'a> {
    fn from(msg: &'a str) -> Self {
        LogOption::Message(Cow::Borrowed(msg))
    }
}

impl From<String> for LogOption<'_> {
    fn from(msg: String) -> Self {
        LogOption::Message(Cow::Owned(msg))
    }
}

impl From<LogContext> for LogOption<'_> {
    fn from(ctx: LogContext) -> Self {
        LogOption::Context(ctx)
    }
}

impl From<&LogContext> for LogOption<'_> {
    fn from(ctx: &LogContext) -> Self {
        LogOption::Context(ctx.clone())
    }
}

impl<'a> From<&'a mut Request<Body>> for LogOption<'a> {
    fn from(req: &'a mut Request<Body>) -> Self {
        LogOption::Request(req)
    }
}

impl<'a> From<&'a mut Response<Body>> for LogOption<'a> {
    fn from(resp: &'a mut Response<Body>) -> Self {
        LogOption::Response(resp)
    }
}

impl From<Url> for LogOption<'_> {
    fn from(url: Url) -> Self {
        LogOption::Url(url)
    }
}

impl From<&Url> for LogOption<'_> {
    fn from(url: &Url) -> Self {
        LogOption::Url(url.clone())
    }
}

impl From<Fields> for LogOption<'_> {
    fn from(fields: Fields) -> Self {
        LogOption::Fields(fields)
    }
}

impl From<DateTime<Utc>> for LogOption<'_> {
    fn from(time: DateTime<Utc>) -> Self {
        LogOption::Time(time)
    }
}

impl From<SystemTime> for LogOption<'_> {
    fn from(time: SystemTime) -> Self {
        LogOption::Time(time.into())
    }
}

/// Build a `Vec<LogOption>` from heterogeneous values.
///
/// ```
/// use common_logger::{opts, LogContext, LogOption};
///
/// let ctx = LogContext::new().with_value("x-request-id", "abc");
/// let err = std::io::Error::new(std::io::ErrorKind::Other, "boom");
/// let list = opts![&ctx, "request failed", LogOption::error(&err)];
/// assert_eq!(list.len(), 3);
/// ```
#[macro_export]
macro_rules! opts {
    () => {
        ::std::vec::Vec::<$crate::LogOption>::new()
    };
    ($($opt:expr),+ $(,)?) => {
        ::std::vec![$($crate::LogOption::from($opt)),+]
    };
}
