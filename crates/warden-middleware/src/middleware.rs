//! Core middleware trait and chain types.
//!
//! This module defines the [`Middleware`] trait that all stages implement
//! and the [`Next`] continuation that links stages to the inner handler.
//!
//! # Design
//!
//! Authentication middleware decorates the request context; it never rejects
//! a request or writes a response of its own. A stage that finds no usable
//! credential resolves the identity slot to Anonymous and passes the request
//! on, so the handler decides what anonymous callers may do.
//!
//! # Example
//!
//! ```ignore
//! use warden_middleware::{BoxFuture, Middleware, Next, Request, Response};
//! use warden_middleware::context::AuthContext;
//!
//! struct TimingMiddleware;
//!
//! impl Middleware for TimingMiddleware {
//!     fn name(&self) -> &'static str {
//!         "timing"
//!     }
//!
//!     fn process<'a>(
//!         &'a self,
//!         ctx: &'a mut AuthContext,
//!         request: Request,
//!         next: Next<'a>,
//!     ) -> BoxFuture<'a, Response> {
//!         Box::pin(async move {
//!             let response = next.run(ctx, request).await;
//!             println!("request {} took {:?}", ctx.request_id(), ctx.elapsed());
//!             response
//!         })
//!     }
//! }
//! ```

use crate::context::AuthContext;
use crate::types::{Request, Response};

pub use warden_core::BoxFuture;

/// Trait implemented by every pipeline stage.
///
/// Stages receive a mutable context, the incoming request, and a [`Next`]
/// continuation for the rest of the chain.
///
/// # Invariants
///
/// - Authentication stages call `next.run()` exactly once; they decorate the
///   context, they do not short-circuit the response path
/// - Per-request failures stay inside the stage; nothing observable crosses
///   this boundary except the resolved identity
pub trait Middleware: Send + Sync + 'static {
    /// Returns the name of this middleware stage.
    ///
    /// The name is used for logging and debugging.
    fn name(&self) -> &'static str;

    /// Processes the request through this middleware.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The mutable per-request context
    /// * `request` - The request flowing through the chain
    /// * `next` - Continuation for the remaining chain
    fn process<'a>(
        &'a self,
        ctx: &'a mut AuthContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response>;
}

/// Continuation that invokes the rest of the chain.
///
/// Passed to each middleware stage; calling [`Next::run`] hands the request
/// to the next stage or, at the end of the chain, to the handler. Consuming
/// `self` makes a double invocation impossible.
pub struct Next<'a> {
    /// Remaining stages and the final handler
    inner: NextInner<'a>,
}

/// Internal representation of the remaining chain.
enum NextInner<'a> {
    /// Another stage sits before the handler
    Chain {
        middleware: &'a dyn Middleware,
        next: Box<Next<'a>>,
    },
    /// Nothing left but the handler
    Handler(Box<dyn FnOnce(&mut AuthContext, Request) -> BoxFuture<'static, Response> + Send + 'a>),
}

impl<'a> Next<'a> {
    /// Creates a `Next` that will invoke the given middleware.
    pub(crate) fn new(middleware: &'a dyn Middleware, next: Next<'a>) -> Self {
        Self {
            inner: NextInner::Chain {
                middleware,
                next: Box::new(next),
            },
        }
    }

    /// Wraps the final handler as the tail of a chain.
    pub(crate) fn handler<F>(f: F) -> Self
    where
        F: FnOnce(&mut AuthContext, Request) -> BoxFuture<'static, Response> + Send + 'a,
    {
        Self {
            inner: NextInner::Handler(Box::new(f)),
        }
    }

    /// Runs the rest of the chain to produce the response.
    ///
    /// Consumes `self` so it can only be called once.
    pub async fn run(self, ctx: &mut AuthContext, request: Request) -> Response {
        match self.inner {
            NextInner::Chain { middleware, next } => middleware.process(ctx, request, *next).await,
            NextInner::Handler(handler) => handler(ctx, request).await,
        }
    }
}

/// A middleware built from a function returning a boxed future.
///
/// Lets hosts and tests define one-off stages without a dedicated type.
/// Plain `fn` items satisfy the higher-ranked bound without annotation:
///
/// ```
/// use warden_middleware::context::AuthContext;
/// use warden_middleware::{BoxFuture, FnMiddleware, Next, Request, Response};
///
/// fn stage<'a>(
///     ctx: &'a mut AuthContext,
///     request: Request,
///     next: Next<'a>,
/// ) -> BoxFuture<'a, Response> {
///     Box::pin(async move { next.run(ctx, request).await })
/// }
///
/// let middleware = FnMiddleware::new("passthrough", stage);
/// ```
pub struct FnMiddleware<F> {
    name: &'static str,
    func: F,
}

impl<F> FnMiddleware<F> {
    /// Wraps a named function as a stage.
    pub const fn new(name: &'static str, func: F) -> Self {
        Self { name, func }
    }
}

impl<F> Middleware for FnMiddleware<F>
where
    F: for<'a> Fn(&'a mut AuthContext, Request, Next<'a>) -> BoxFuture<'a, Response>
        + Send
        + Sync
        + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut AuthContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response> {
        (self.func)(ctx, request, next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http::{Request as HttpRequest, Response as HttpResponse, StatusCode};
    use http_body_util::Full;
    use warden_core::Identity;

    struct TagMiddleware {
        name: &'static str,
    }

    impl Middleware for TagMiddleware {
        fn name(&self) -> &'static str {
            self.name
        }

        fn process<'a>(
            &'a self,
            ctx: &'a mut AuthContext,
            request: Request,
            next: Next<'a>,
        ) -> BoxFuture<'a, Response> {
            Box::pin(async move {
                ctx.set_extension(format!("tagged-by:{}", self.name));
                next.run(ctx, request).await
            })
        }
    }

    fn make_request() -> Request {
        HttpRequest::builder()
            .uri("/test")
            .body(Full::new(Bytes::new()))
            .unwrap()
    }

    fn ok_handler() -> Next<'static> {
        Next::handler(|_ctx, _req| {
            Box::pin(async {
                HttpResponse::builder()
                    .status(StatusCode::OK)
                    .body(Full::new(Bytes::from("OK")))
                    .unwrap()
            })
        })
    }

    #[tokio::test]
    async fn test_next_handler_runs() {
        let mut ctx = AuthContext::new();
        let response = ok_handler().run(&mut ctx, make_request()).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_middleware_chain_reaches_handler() {
        let mw1 = TagMiddleware { name: "first" };
        let mw2 = TagMiddleware { name: "second" };

        let mut ctx = AuthContext::new();
        let next = Next::new(&mw1, Next::new(&mw2, ok_handler()));

        let response = next.run(&mut ctx, make_request()).await;
        assert_eq!(response.status(), StatusCode::OK);
        // Last writer wins for a same-typed extension
        assert_eq!(
            ctx.get_extension::<String>().map(String::as_str),
            Some("tagged-by:second")
        );
    }

    fn seed_session<'a>(
        ctx: &'a mut AuthContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response> {
        Box::pin(async move {
            ctx.resolve_identity(Identity::user("session-user"));
            next.run(ctx, request).await
        })
    }

    #[tokio::test]
    async fn test_fn_middleware() {
        let middleware = FnMiddleware::new("seed", seed_session);
        assert_eq!(Middleware::name(&middleware), "seed");

        let mut ctx = AuthContext::new();
        let next = Next::new(&middleware, ok_handler());
        let _response = next.run(&mut ctx, make_request()).await;
        assert_eq!(ctx.identity().to_string(), "user:session-user");
    }
}
