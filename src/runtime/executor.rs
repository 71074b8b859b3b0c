//! Conversation runtime executor

use super::{ConversationHandle, OverviewStats, SessionSnapshot};
use crate::activity::ActivityObserver;
use crate::agent::{AgentClient, AgentContext};
use crate::state_machine::{
    transition, CallOutcome, ConvContext, ConversationMessage, Effect, Event, Session,
    TransitionError,
};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Owns the session and executes the effects the state machine asks for
pub struct ConversationRuntime<A, O>
where
    A: AgentClient + 'static,
    O: ActivityObserver + 'static,
{
    context: ConvContext,
    session: Session,
    overview: OverviewStats,
    agent: Arc<A>,
    observer: Arc<O>,
    event_rx: mpsc::Receiver<Event>,
    event_tx: mpsc::Sender<Event>,
    snapshot_tx: watch::Sender<SessionSnapshot>,
}

impl<A, O> ConversationRuntime<A, O>
where
    A: AgentClient + 'static,
    O: ActivityObserver + 'static,
{
    pub fn new(context: ConvContext, agent: Arc<A>, observer: Arc<O>) -> (Self, ConversationHandle) {
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let session = Session::new();
        let overview = OverviewStats::default();
        let (snapshot_tx, snapshot_rx) = watch::channel(SessionSnapshot {
            session: session.clone(),
            overview: overview.clone(),
            agent_name: context.agent_name.clone(),
        });

        let handle = ConversationHandle::new(event_tx.clone(), snapshot_rx);
        let runtime = Self {
            context,
            session,
            overview,
            agent,
            observer,
            event_rx,
            event_tx,
            snapshot_tx,
        };
        (runtime, handle)
    }

    pub async fn run(mut self) {
        tracing::info!(
            session_id = %self.session.id(),
            agent = %self.context.agent_name,
            "Starting conversation runtime"
        );

        // Holds its own sender for agent completions, so this runs for the
        // life of the process.
        while self.step().await {}

        tracing::info!(session_id = %self.session.id(), "Conversation runtime stopped");
    }

    /// Wait for the next event and apply it. Returns false when the channel closes.
    pub(crate) async fn step(&mut self) -> bool {
        tokio::select! {
            Some(event) = self.event_rx.recv() => {
                self.process_event(event);
                true
            }
            else => false,
        }
    }

    fn process_event(&mut self, event: Event) {
        let result = match transition(&self.session, event) {
            Ok(r) => r,
            Err(e) => {
                match &e {
                    TransitionError::StaleSession { .. } => {
                        tracing::info!(error = %e, "Discarding stale agent response");
                    }
                    TransitionError::InvalidTransition(_) => {
                        tracing::warn!(session_id = %self.session.id(), error = %e, "Event rejected");
                    }
                    TransitionError::EmptyInput | TransitionError::AgentBusy => {
                        tracing::debug!(session_id = %self.session.id(), error = %e, "Event ignored");
                    }
                }
                return;
            }
        };

        for effect in result.effects {
            self.execute_effect(effect);
        }
        self.session.set_state(result.new_state);
        self.publish();
    }

    fn execute_effect(&mut self, effect: Effect) {
        match effect {
            Effect::AppendUserMessage { text } => {
                self.session.append(ConversationMessage::user(text));
            }

            Effect::AppendAgentMessage { payload } => {
                self.session.append(ConversationMessage::agent(payload));
            }

            Effect::SetLastError(error) => {
                self.session.set_last_error(error);
            }

            Effect::InvokeAgent { session_id, prompt } => {
                self.spawn_agent_call(session_id, prompt);
            }

            Effect::SetProcessing(processing) => {
                self.observer.on_processing_changed(processing);
            }

            Effect::UpdateQualification { percentage } => {
                tracing::debug!(%percentage, "Qualification headline updated");
                self.overview.qualification = percentage;
            }

            Effect::ReplaceSession => {
                let previous = std::mem::take(&mut self.session);
                self.overview = OverviewStats::default();
                tracing::info!(
                    previous = %previous.id(),
                    session_id = %self.session.id(),
                    discarded_messages = previous.messages().len(),
                    "Session reset"
                );
            }

            Effect::ResetActivity => {
                self.observer.on_reset();
            }
        }
    }

    /// Run the agent call in the background and feed its outcome back as an event
    fn spawn_agent_call(&self, session_id: String, prompt: String) {
        let agent = self.agent.clone();
        let event_tx = self.event_tx.clone();
        let agent_id = self.context.agent_id.clone();
        let context = AgentContext {
            user_id: self.context.user_id.clone(),
            session_id: session_id.clone(),
        };

        tokio::spawn(async move {
            tracing::info!(session_id = %context.session_id, "Invoking agent (background)");

            // Inner task so a panicking client still resolves the request
            let call = tokio::spawn(async move { agent.invoke(&prompt, &agent_id, &context).await });

            let outcome = match call.await {
                Ok(Ok(result)) => CallOutcome::Completed(result),
                Ok(Err(e)) => CallOutcome::Failed(e.message),
                Err(join_error) => {
                    tracing::error!(error = %join_error, "Agent call aborted");
                    CallOutcome::Failed(format!("Agent call aborted: {join_error}"))
                }
            };

            if event_tx
                .send(Event::AgentResolved {
                    session_id,
                    outcome,
                })
                .await
                .is_err()
            {
                tracing::debug!("Runtime stopped before agent call resolved");
            }
        });
    }

    fn publish(&self) {
        self.snapshot_tx.send_replace(SessionSnapshot {
            session: self.session.clone(),
            overview: self.overview.clone(),
            agent_name: self.context.agent_name.clone(),
        });
    }
}
