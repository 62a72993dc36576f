//! # Handler chain
//!
//! Runs a sequence of middleware (before/after) and handlers for each event. Middleware can stop
//! the chain; the first handler that returns Stop or Reply ends handler execution; after callbacks run in reverse order.

use panelbot_core::{Event, Handler, Middleware, Outcome, Result};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Chain of middleware and handlers: middleware run in order (before), then handlers; middleware after run in reverse order.
#[derive(Clone)]
pub struct HandlerChain {
    middleware: Vec<Arc<dyn Middleware>>,
    handlers: Vec<Arc<dyn Handler>>,
}

impl HandlerChain {
    /// Creates an empty chain (no middleware, no handlers).
    pub fn new() -> Self {
        Self {
            middleware: Vec::new(),
            handlers: Vec::new(),
        }
    }

    /// Appends a middleware (runs before handlers, after in reverse).
    pub fn add_middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
        self.middleware.push(middleware);
        self
    }

    /// Appends a handler (runs in order; first Stop/Reply ends handler phase).
    pub fn add_handler(mut self, handler: Arc<dyn Handler>) -> Self {
        self.handlers.push(handler);
        self
    }

    /// Runs middleware before, then handler before/handle pairs; then all after hooks in reverse. Returns first Stop or Reply, or Continue.
    #[instrument(skip(self, event))]
    pub async fn handle(&self, event: &Event) -> Result<Outcome> {
        let mut final_outcome = Outcome::Continue;

        info!(
            user_id = event.user.id,
            chat_id = event.chat.id,
            event_id = %event.id,
            "step: handler_chain started"
        );

        // Run all middleware before; if any returns false, stop and return Stop.
        for mw in &self.middleware {
            let mw_name = std::any::type_name_of_val(mw.as_ref());
            info!(
                user_id = event.user.id,
                middleware = %mw_name,
                "step: middleware before"
            );
            let should_continue = mw.before(event).await?;
            if !should_continue {
                info!(
                    user_id = event.user.id,
                    middleware = %mw_name,
                    "step: middleware before returned false, chain stopped"
                );
                for mw in self.middleware.iter().rev() {
                    mw.after(event, &Outcome::Stop).await?;
                }
                return Ok(Outcome::Stop);
            }
        }

        for handler in &self.handlers {
            let handler_name = std::any::type_name_of_val(handler.as_ref());
            if !handler.before(event).await? {
                info!(
                    user_id = event.user.id,
                    handler = %handler_name,
                    "step: handler before returned false, chain stopped"
                );
                final_outcome = Outcome::Stop;
                break;
            }
            let outcome = handler.handle(event).await?;
            debug!(
                handler = %handler_name,
                outcome = ?outcome,
                "Handler processed"
            );
            let (outcome_type, reply_len) = match &outcome {
                Outcome::Continue => ("Continue", None),
                Outcome::Stop => ("Stop", None),
                Outcome::Reply(s) => ("Reply", Some(s.len())),
            };
            info!(
                user_id = event.user.id,
                handler = %handler_name,
                outcome_type = %outcome_type,
                reply_len = ?reply_len,
                "step: handler done"
            );

            match outcome {
                Outcome::Stop | Outcome::Reply(_) => {
                    info!(
                        user_id = event.user.id,
                        "step: handler chain stopped by handler"
                    );
                    final_outcome = outcome;
                    break;
                }
                Outcome::Continue => {
                    continue;
                }
            }
        }

        // Run handler after hooks in reverse order, then middleware after in reverse.
        for handler in self.handlers.iter().rev() {
            handler.after(event, &final_outcome).await?;
        }
        for mw in self.middleware.iter().rev() {
            let mw_name = std::any::type_name_of_val(mw.as_ref());
            mw.after(event, &final_outcome).await?;
            debug!(
                user_id = event.user.id,
                middleware = %mw_name,
                "step: middleware after done"
            );
        }

        info!(
            user_id = event.user.id,
            chat_id = event.chat.id,
            event_id = %event.id,
            "step: handler_chain finished"
        );

        Ok(final_outcome)
    }
}

impl Default for HandlerChain {
    fn default() -> Self {
        Self::new()
    }
}

// Unit/integration tests live in tests/handler_chain_test.rs
