//! Submission state machine driving one chart view.
//!
//! ```text
//! Idle ──begin──▶ Loading ──resolve(Ok)──▶ Success
//!                    │    ──resolve(Err)─▶ Failed
//!                    └────cancel────────▶ Idle
//! ```
//!
//! Every [`ChartController::begin`] hands out an [`Attempt`] ticket. Only the
//! ticket of the current attempt can resolve it; outcomes carried by older
//! tickets are dropped.

use tracing::{debug, info, warn};

use crate::chart::{ChartKind, GenerationResult, Topic};
use crate::generation::{ChartGenerator, GenerationError};

/// What the view shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ChartState {
    /// Nothing submitted yet, or the last attempt was cancelled.
    #[default]
    Idle,
    /// A generation is in flight.
    Loading {
        /// Id of the in-flight attempt.
        attempt: u64,
        /// Submitted topic.
        topic: Topic,
        /// Submitted chart kind.
        kind: ChartKind,
    },
    /// The last attempt produced data.
    Success {
        /// Kind the data was requested for.
        kind: ChartKind,
        /// Validated data.
        result: GenerationResult,
    },
    /// The last attempt failed; holds the user-facing message.
    Failed(String),
}

impl ChartState {
    /// Returns `true` while a generation is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    /// The current result, if any.
    #[must_use]
    pub const fn result(&self) -> Option<&GenerationResult> {
        match self {
            Self::Success { result, .. } => Some(result),
            _ => None,
        }
    }

    /// The current error message, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Ticket for one in-flight generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    id: u64,
    topic: Topic,
    kind: ChartKind,
}

impl Attempt {
    /// Monotonically increasing attempt id.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Submitted topic.
    #[must_use]
    pub const fn topic(&self) -> &Topic {
        &self.topic
    }

    /// Submitted chart kind.
    #[must_use]
    pub const fn kind(&self) -> ChartKind {
        self.kind
    }
}

/// Why a submission did not start a generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SubmitRejected {
    /// The topic was blank.
    #[error("missing topic")]
    MissingTopic,
    /// Another generation is still in flight.
    #[error("a chart is already being generated")]
    Busy,
}

/// Owns the view state and is its only writer.
#[derive(Debug)]
pub struct ChartController {
    generator: ChartGenerator,
    state: ChartState,
    last_attempt: u64,
}

impl ChartController {
    /// Create an idle controller.
    #[must_use]
    pub fn new(generator: ChartGenerator) -> Self {
        Self {
            generator,
            state: ChartState::Idle,
            last_attempt: 0,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &ChartState {
        &self.state
    }

    /// The generator used by [`ChartController::submit`].
    #[must_use]
    pub const fn generator(&self) -> &ChartGenerator {
        &self.generator
    }

    /// Start an attempt for `topic` rendered as `kind`.
    ///
    /// Clears any previous result or error.
    ///
    /// # Errors
    ///
    /// - [`SubmitRejected::Busy`] while another attempt is loading; the state
    ///   is left untouched.
    /// - [`SubmitRejected::MissingTopic`] for a blank topic; the state becomes
    ///   [`ChartState::Failed`].
    pub fn begin(&mut self, topic: &str, kind: ChartKind) -> Result<Attempt, SubmitRejected> {
        if self.state.is_loading() {
            debug!("Submission ignored while loading");
            return Err(SubmitRejected::Busy);
        }

        let topic = match Topic::new(topic) {
            Ok(topic) => topic,
            Err(err) => {
                info!("Submission rejected: missing topic");
                self.state = ChartState::Failed(err.to_string());
                return Err(SubmitRejected::MissingTopic);
            }
        };

        self.last_attempt += 1;
        let attempt = Attempt {
            id: self.last_attempt,
            topic: topic.clone(),
            kind,
        };
        info!(attempt = attempt.id, kind = %kind, topic = %topic, "Generation started");
        self.state = ChartState::Loading {
            attempt: attempt.id,
            topic,
            kind,
        };
        Ok(attempt)
    }

    /// Apply the outcome of `attempt`.
    ///
    /// Returns `false` and leaves the state untouched when `attempt` is not the
    /// one currently loading.
    pub fn resolve(
        &mut self,
        attempt: &Attempt,
        outcome: Result<GenerationResult, GenerationError>,
    ) -> bool {
        let current = matches!(
            self.state,
            ChartState::Loading { attempt: id, .. } if id == attempt.id
        );
        if !current {
            debug!(attempt = attempt.id, "Discarding stale generation outcome");
            return false;
        }

        self.state = match outcome {
            Ok(result) => {
                info!(attempt = attempt.id, rows = result.rows.len(), "Generation succeeded");
                ChartState::Success {
                    kind: attempt.kind,
                    result,
                }
            }
            Err(err) => {
                warn!(attempt = attempt.id, error = %err, "Generation failed");
                ChartState::Failed(err.user_message())
            }
        };
        true
    }

    /// Abandon the in-flight attempt, if any.
    pub fn cancel(&mut self) {
        if let ChartState::Loading { attempt, .. } = self.state {
            info!(attempt, "Generation cancelled");
            self.state = ChartState::Idle;
        }
    }

    /// Run a full attempt: [`begin`](Self::begin), generate, then
    /// [`resolve`](Self::resolve).
    pub async fn submit(&mut self, topic: &str, kind: ChartKind) -> &ChartState {
        if let Ok(attempt) = self.begin(topic, kind) {
            let outcome = self.generator.generate(attempt.topic(), attempt.kind()).await;
            self.resolve(&attempt, outcome);
        }
        &self.state
    }
}
