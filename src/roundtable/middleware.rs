//! Composable interceptors around an agent's reply capability.
//!
//! A [`MiddlewareAgent`] wraps an inner [`Agent`] together with an ordered
//! list of [`Middleware`] links. The chain is folded at invocation time, not
//! at registration time: the innermost step calls the wrapped agent directly,
//! and each middleware registered afterwards wraps *outside* the previous
//! fold result. The composition is therefore LIFO: the last registered
//! middleware runs first and decides whether and how to call further in.
//!
//! A middleware may:
//!
//! - short-circuit by returning its own message without calling [`Next::run`]
//!   (e.g. a cached or default reply),
//! - delegate and return the inner result unchanged (logging, metrics),
//! - delegate and post-process the result (e.g. executing a tool call named
//!   in the reply, see [`FunctionCallMiddleware`]).
//!
//! Errors from any link or from the wrapped agent propagate unchanged; the
//! chain never catches or converts them.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::BoxFuture;
use log::info;

use crate::agent::{Agent, FunctionContract, GenerateOptions};
use crate::error::ChatError;
use crate::message::ChatMessage;

/// The inputs a middleware link receives: the history being replied to and
/// the generation options, both borrowed from the caller.
#[derive(Clone, Copy)]
pub struct MiddlewareContext<'a> {
    /// Ordered message history, oldest first.
    pub messages: &'a [ChatMessage],
    /// Generation options, if any were supplied.
    pub options: Option<&'a GenerateOptions>,
}

/// Handle to the next-inner step of a middleware chain.
///
/// Calling [`run`](Next::run) invokes the remaining links and ultimately the
/// wrapped agent. Not calling it short-circuits the chain.
pub struct Next<'a> {
    agent: &'a dyn Agent,
    chain: &'a [Arc<dyn Middleware>],
}

impl<'a> Next<'a> {
    /// Invoke the rest of the chain with the given inputs.
    ///
    /// The inputs need not be the ones this link received; a middleware may
    /// rewrite the history or options before delegating.
    pub async fn run(
        self,
        messages: &'a [ChatMessage],
        options: Option<&'a GenerateOptions>,
    ) -> Result<ChatMessage, ChatError> {
        match self.chain.split_last() {
            Some((link, rest)) => {
                let context = MiddlewareContext { messages, options };
                link.invoke(
                    context,
                    Next {
                        agent: self.agent,
                        chain: rest,
                    },
                )
                .await
            }
            None => self.agent.generate_reply(messages, options).await,
        }
    }
}

/// A single interceptor in a middleware chain.
#[async_trait]
pub trait Middleware: Send + Sync {
    /// Human-readable name for logging and diagnostics.
    fn name(&self) -> &str {
        "middleware"
    }

    /// Handle one reply generation. Call `next.run(..)` to delegate inward,
    /// or return a message directly to short-circuit.
    async fn invoke<'a>(
        &'a self,
        context: MiddlewareContext<'a>,
        next: Next<'a>,
    ) -> Result<ChatMessage, ChatError>;
}

/// Adapter turning a closure into a [`Middleware`].
pub struct FnMiddleware<F> {
    f: F,
}

impl<F> FnMiddleware<F>
where
    F: for<'a> Fn(
            MiddlewareContext<'a>,
            Next<'a>,
        ) -> BoxFuture<'a, Result<ChatMessage, ChatError>>
        + Send
        + Sync,
{
    /// Wrap the closure. The closure receives the context and the next-inner
    /// handle and returns a boxed future.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F> Middleware for FnMiddleware<F>
where
    F: for<'a> Fn(
            MiddlewareContext<'a>,
            Next<'a>,
        ) -> BoxFuture<'a, Result<ChatMessage, ChatError>>
        + Send
        + Sync,
{
    fn name(&self) -> &str {
        "fn_middleware"
    }

    async fn invoke<'a>(
        &'a self,
        context: MiddlewareContext<'a>,
        next: Next<'a>,
    ) -> Result<ChatMessage, ChatError> {
        (self.f)(context, next).await
    }
}

/// An agent wrapped in an ordered middleware chain.
///
/// The wrapper keeps the inner agent's name, so it can stand in for the
/// inner agent anywhere in a roster or transition graph.
pub struct MiddlewareAgent {
    name: String,
    inner: Arc<dyn Agent>,
    middlewares: Vec<Arc<dyn Middleware>>,
}

impl MiddlewareAgent {
    /// Wrap `inner` with an initially empty chain.
    pub fn new(inner: Arc<dyn Agent>) -> Self {
        let name = inner.name().to_string();
        Self {
            name,
            inner,
            middlewares: Vec::new(),
        }
    }

    /// Append a middleware. Later registrations wrap outside earlier ones
    /// and therefore execute first.
    pub fn use_middleware(&mut self, middleware: Arc<dyn Middleware>) {
        self.middlewares.push(middleware);
    }

    /// Builder-style variant of [`use_middleware`](Self::use_middleware).
    pub fn with_middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
        self.use_middleware(middleware);
        self
    }
}

#[async_trait]
impl Agent for MiddlewareAgent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate_reply(
        &self,
        messages: &[ChatMessage],
        options: Option<&GenerateOptions>,
    ) -> Result<ChatMessage, ChatError> {
        Next {
            agent: self.inner.as_ref(),
            chain: &self.middlewares,
        }
        .run(messages, options)
        .await
    }
}

/// Pass-through middleware that logs every reply before returning it.
pub struct PrintMessageMiddleware;

#[async_trait]
impl Middleware for PrintMessageMiddleware {
    fn name(&self) -> &str {
        "print_message"
    }

    async fn invoke<'a>(
        &'a self,
        context: MiddlewareContext<'a>,
        next: Next<'a>,
    ) -> Result<ChatMessage, ChatError> {
        let reply = next.run(context.messages, context.options).await?;
        info!(
            "{}: {}",
            reply.from().unwrap_or("<unknown>"),
            reply.content().unwrap_or("<non-text message>")
        );
        Ok(reply)
    }
}

/// Async function executed by [`FunctionCallMiddleware`]. Receives the
/// JSON-encoded argument string and returns the textual result.
pub type FunctionHandler =
    Arc<dyn for<'a> Fn(&'a str) -> BoxFuture<'a, Result<String, ChatError>> + Send + Sync>;

/// Middleware that advertises function contracts to the inner agent and
/// auto-executes any tool call the reply names.
///
/// On delegation it merges its contracts into the generation options so the
/// model knows what it may call. If the inner reply is a tool-call message
/// whose first call matches a registered handler, the handler runs and the
/// middleware returns an aggregate pairing the call with its result.
/// Replies that call nothing, or call an unregistered function, pass through
/// unchanged.
pub struct FunctionCallMiddleware {
    contracts: Vec<FunctionContract>,
    handlers: HashMap<String, FunctionHandler>,
}

impl FunctionCallMiddleware {
    /// Create an empty middleware; register functions with
    /// [`register`](Self::register).
    pub fn new() -> Self {
        Self {
            contracts: Vec::new(),
            handlers: HashMap::new(),
        }
    }

    /// Register a contract together with the handler that fulfils it.
    pub fn register(mut self, contract: FunctionContract, handler: FunctionHandler) -> Self {
        self.handlers.insert(contract.name.clone(), handler);
        self.contracts.push(contract);
        self
    }
}

impl Default for FunctionCallMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Middleware for FunctionCallMiddleware {
    fn name(&self) -> &str {
        "function_call"
    }

    async fn invoke<'a>(
        &'a self,
        context: MiddlewareContext<'a>,
        next: Next<'a>,
    ) -> Result<ChatMessage, ChatError> {
        let mut options = context.options.cloned().unwrap_or_default();
        options.functions.extend(self.contracts.iter().cloned());

        let reply = next.run(context.messages, Some(&options)).await?;

        let (from, call) = match &reply {
            ChatMessage::ToolCall { from, calls } => match calls.first() {
                Some(call) => (from.clone(), call.clone()),
                None => return Ok(reply),
            },
            _ => return Ok(reply),
        };

        let handler = match self.handlers.get(&call.name) {
            Some(handler) => handler,
            None => return Ok(reply),
        };

        let output = handler(&call.arguments).await?;
        let result = ChatMessage::ToolCallResult {
            from: from.clone(),
            results: vec![crate::message::ToolCallOutcome {
                name: call.name.clone(),
                content: output,
            }],
        };
        Ok(ChatMessage::Aggregate {
            from,
            call: Box::new(reply),
            result: Box::new(result),
        })
    }
}
