//! The capture, match, execute and respond loop

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;

use crate::actions::phrases::{self, APOLOGY, FAREWELL, GREETINGS, STARTUP, UNKNOWN};
use crate::actions::{self, ActionContext, ActionName};
use crate::intent::{Resolution, RuleTable, Utterance};
use crate::voice::{Capture, CaptureOutcome, OutputPipeline};

/// Where the session is in its loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Greeting,
    Listening,
    Dispatching,
    Terminated,
}

/// One interactive session
pub struct Session<C> {
    rules: RuleTable,
    ctx: ActionContext,
    pipeline: Arc<OutputPipeline>,
    capture: C,
    phase: Phase,
}

impl<C: Capture> Session<C> {
    #[must_use]
    pub const fn new(
        rules: RuleTable,
        ctx: ActionContext,
        pipeline: Arc<OutputPipeline>,
        capture: C,
    ) -> Self {
        Self {
            rules,
            ctx,
            pipeline,
            capture,
            phase: Phase::Greeting,
        }
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub const fn context(&self) -> &ActionContext {
        &self.ctx
    }

    /// Render the startup greeting and start listening
    pub async fn greet(&mut self) {
        self.pipeline.render(phrases::pick(STARTUP)).await;
        self.phase = Phase::Listening;
    }

    /// Run one listen cycle, returning the phase it ends in
    pub async fn step(&mut self) -> Phase {
        self.phase = Phase::Listening;

        match self.capture.capture().await {
            CaptureOutcome::Utterance(text) => {
                self.dispatch(&text).await;
            }
            CaptureOutcome::Timeout => tracing::trace!("listen timeout"),
            CaptureOutcome::Unintelligible => tracing::debug!("could not understand audio"),
            CaptureOutcome::Activated => {
                self.pipeline.render(phrases::pick(GREETINGS)).await;
            }
            CaptureOutcome::Closed => {
                tracing::info!("input closed");
                self.pipeline.render(FAREWELL).await;
                self.ctx.state.stop_listening();
            }
        }

        self.phase = if self.ctx.state.listening_enabled() {
            Phase::Listening
        } else {
            Phase::Terminated
        };
        self.phase
    }

    /// Resolve and execute one utterance, then render the reply
    ///
    /// Returns the action that ran, if any rule matched.
    pub async fn dispatch(&mut self, text: &str) -> Option<ActionName> {
        let utterance = Utterance::new(text);
        if utterance.is_empty() {
            return None;
        }

        self.phase = Phase::Dispatching;
        self.pipeline.screen().show(&format!("You said: {utterance}"));

        let resolved = std::panic::catch_unwind(AssertUnwindSafe(|| self.rules.resolve(&utterance)));
        let Ok(resolution) = resolved else {
            tracing::error!(utterance = %utterance, "rule binder panicked");
            self.pipeline.render(APOLOGY).await;
            return None;
        };

        let (action, reply) = match resolution {
            Resolution::Matched { rule, request } => {
                let action = request.action;
                tracing::info!(rule = rule.name, %action, "utterance matched");

                let executed = AssertUnwindSafe(actions::execute(request, &self.ctx))
                    .catch_unwind()
                    .await;
                if action.mutates_session() {
                    tracing::debug!(
                        %action,
                        privacy = self.ctx.state.privacy_mode(),
                        listening = self.ctx.state.listening_enabled(),
                        "session state updated"
                    );
                }
                let reply = match executed {
                    Ok(result) => result.into_phrase(),
                    Err(_) => {
                        tracing::error!(rule = rule.name, %action, "action panicked");
                        APOLOGY.to_string()
                    }
                };
                (Some(action), reply)
            }
            Resolution::NoMatch => {
                tracing::info!(utterance = %utterance, "no rule matched");
                (None, phrases::pick(UNKNOWN).to_string())
            }
        };

        self.pipeline.render(reply).await;
        action
    }

    /// Run until listening stops or `interrupt` completes
    pub async fn run<F>(&mut self, interrupt: F) -> Phase
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(interrupt);

        if self.phase == Phase::Greeting {
            self.greet().await;
        }

        while self.phase != Phase::Terminated {
            tokio::select! {
                biased;
                () = &mut interrupt => {
                    tracing::info!("shutdown requested");
                    self.ctx.state.stop_listening();
                    self.pipeline.render(FAREWELL).await;
                    self.phase = Phase::Terminated;
                }
                _ = self.step() => {}
            }
        }

        self.phase
    }
}
