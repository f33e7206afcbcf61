//! Ordered middleware pipeline.
//!
//! [`AuthPipeline`] holds middleware stages in declaration order and drives
//! a request through them to a terminal handler. The chain is assembled
//! back to front so that the first declared stage runs first.
//!
//! Hosts own the [`AuthContext`](crate::context::AuthContext) and pass it by
//! mutable reference, so the resolved identity is still inspectable after
//! the response is produced. That matters for WebSocket handshakes, where
//! the identity decided here outlives the HTTP exchange.

use crate::context::AuthContext;
use crate::middleware::{BoxFuture, Middleware, Next};
use crate::types::{Request, Response};
use std::sync::Arc;

/// A type-erased middleware that can be stored in a pipeline.
pub type BoxedMiddleware = Arc<dyn Middleware>;

/// An ordered middleware pipeline with a terminal handler slot.
///
/// # Example
///
/// ```ignore
/// use warden_middleware::AuthPipeline;
///
/// let pipeline = AuthPipeline::builder()
///     .layer(AuthTokenMiddleware::api_token(resolver))
///     .build();
///
/// let mut ctx = AuthContext::new();
/// let response = pipeline.process(&mut ctx, request, handler).await;
/// assert!(ctx.identity_slot().is_resolved());
/// ```
pub struct AuthPipeline {
    stages: Vec<BoxedMiddleware>,
}

impl AuthPipeline {
    /// Starts a builder for assembling a pipeline.
    #[must_use]
    pub fn builder() -> AuthPipelineBuilder {
        AuthPipelineBuilder::new()
    }

    /// Processes a request through every stage, then the handler.
    ///
    /// The handler closure receives the context synchronously and returns
    /// an owned future, so anything it needs from the context after the
    /// `await` must be cloned out first.
    pub async fn process<H>(&self, ctx: &mut AuthContext, request: Request, handler: H) -> Response
    where
        H: FnOnce(&mut AuthContext, Request) -> BoxFuture<'static, Response> + Send,
    {
        let next = self.build_chain(handler);
        next.run(ctx, request).await
    }

    /// Builds the middleware chain for a request, back to front.
    fn build_chain<'a, H>(&'a self, handler: H) -> Next<'a>
    where
        H: FnOnce(&mut AuthContext, Request) -> BoxFuture<'static, Response> + Send + 'a,
    {
        let mut next = Next::handler(handler);
        for middleware in self.stages.iter().rev() {
            next = Next::new(middleware.as_ref(), next);
        }
        next
    }

    /// Returns the names of all stages in execution order.
    #[must_use]
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|mw| mw.name()).collect()
    }

    /// Returns the number of stages.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }
}

/// Builder for [`AuthPipeline`].
pub struct AuthPipelineBuilder {
    stages: Vec<BoxedMiddleware>,
}

impl AuthPipelineBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Appends a middleware stage. Stages run in the order they are added.
    #[must_use]
    pub fn layer<M: Middleware>(mut self, middleware: M) -> Self {
        self.stages.push(Arc::new(middleware));
        self
    }

    /// Appends an already type-erased middleware stage.
    #[must_use]
    pub fn layer_arc(mut self, middleware: BoxedMiddleware) -> Self {
        self.stages.push(middleware);
        self
    }

    /// Finalizes the stage list into a pipeline.
    #[must_use]
    pub fn build(self) -> AuthPipeline {
        AuthPipeline {
            stages: self.stages,
        }
    }
}

impl Default for AuthPipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
