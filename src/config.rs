use crate::body::Body;
use crate::clock::Clock;
use crate::context::LogContext;
use crate::record::Fields;
use crate::resolvers::{ContextResolver, RequestResolver, ResolveError, ResponseResolver};
use http::{Request, Response};
use std::fmt;
use std::sync::Arc;

/// Optional field resolvers, one per input kind. A missing resolver means
/// that input contributes no fields.
#[derive(Clone, Default)]
pub struct Resolvers {
    pub context: Option<ContextResolver>,
    pub request: Option<RequestResolver>,
    pub response: Option<ResponseResolver>,
}

impl fmt::Debug for Resolvers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolvers")
            .field("context", &self.context.is_some())
            .field("request", &self.request.is_some())
            .field("response", &self.response.is_some())
            .finish()
    }
}

/// Configuration for a [`Logger`](crate::logger::Logger).
///
/// Everything is optional. Build it with struct syntax or chain the
/// `with_*` setters:
///
/// ```
/// use common_logger::{resolvers, LoggerConfig};
///
/// let config = LoggerConfig::default()
///     .with_context_resolver(resolvers::context_fields([("x-request-id", "request_id")]))
///     .with_request_resolver(resolvers::resolve_json_request);
/// assert!(config.resolvers.request.is_some());
/// assert!(config.resolvers.response.is_none());
/// ```
#[derive(Clone, Default)]
pub struct LoggerConfig {
    pub resolvers: Resolvers,
    /// Used when a line carries no explicit timestamp. Defaults to the
    /// system clock.
    pub clock: Option<Arc<dyn Clock>>,
}

impl LoggerConfig {
    pub fn with_context_resolver<F>(mut self, f: F) -> Self
    where
        F: Fn(&LogContext) -> Result<Fields, ResolveError> + Send + Sync + 'static,
    {
        self.resolvers.context = Some(Arc::new(f));
        self
    }

    pub fn with_request_resolver<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Request<Body>) -> Result<Fields, ResolveError> + Send + Sync + 'static,
    {
        self.resolvers.request = Some(Arc::new(f));
        self
    }

    pub fn with_response_resolver<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Response<Body>) -> Result<Fields, ResolveError> + Send + Sync + 'static,
    {
        self.resolvers.response = Some(Arc::new(f));
        self
    }

    pub fn with_clock<C>(mut self, clock: C) -> Self
    where
        C: Clock + 'static,
    {
        self.clock = Some(Arc::new(clock));
        self
    }
}

impl fmt::Debug for LoggerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerConfig")
            .field("resolvers", &self.resolvers)
            .field("clock", &self.clock.is_some())
            .finish()
    }
}
