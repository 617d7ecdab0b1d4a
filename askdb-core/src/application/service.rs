use crate::application::agent::{Agent, AgentError, AgentOptions, AgentStep};
use crate::application::memory::ConversationStore;
use crate::application::policy::{MEMORY_CLEARED_ANSWER, is_memory_clear};
use crate::application::tooling::ToolRegistry;
use crate::config::AgentSettings;
use crate::domain::{AnswerStatus, Message};
use crate::infrastructure::model::ModelProvider;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{Instrument, error, info, info_span, warn};
use utoipa::ToSchema;
use uuid::Uuid;

pub const EMPTY_QUESTION_ANSWER: &str = "The question must not be empty.";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AskRequest {
    pub question: String,
    pub session_id: Option<String>,
}

impl AskRequest {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            session_id: None,
        }
    }

    pub fn in_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Answer {
    pub answer: String,
    pub status: AnswerStatus,
    pub session_id: String,
    pub steps: Vec<AgentStep>,
}

impl Answer {
    fn new(status: AnswerStatus, answer: impl Into<String>, session_id: String) -> Self {
        Self {
            answer: answer.into(),
            status,
            session_id,
            steps: Vec::new(),
        }
    }
}

/// Entry point for one question: session lookup, memory commands, the agent
/// pass under a deadline, and committing the turn to memory.
pub struct AskService<P: ModelProvider> {
    agent: Agent<P>,
    store: Arc<ConversationStore>,
    settings: AgentSettings,
    trace_project: Option<String>,
}

impl<P: ModelProvider> AskService<P> {
    pub fn new(agent: Agent<P>, store: Arc<ConversationStore>, settings: AgentSettings) -> Self {
        Self {
            agent,
            store,
            settings,
            trace_project: None,
        }
    }

    /// Project name recorded on every request span.
    pub fn with_trace_project(mut self, project: Option<String>) -> Self {
        self.trace_project = project;
        self
    }

    pub fn registry(&self) -> &ToolRegistry {
        self.agent.registry()
    }

    pub fn store(&self) -> &Arc<ConversationStore> {
        &self.store
    }

    pub async fn clear_session(&self, session_id: &str) -> bool {
        self.store.clear(session_id).await
    }

    pub async fn ask(&self, request: AskRequest) -> Answer {
        let session_id = request
            .session_id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let span = info_span!(
            "ask",
            session_id = %session_id,
            project = self.trace_project.as_deref()
        );
        self.answer(request.question, session_id)
            .instrument(span)
            .await
    }

    async fn answer(&self, question: String, session_id: String) -> Answer {
        let question = question.trim();
        if question.is_empty() {
            warn!("Rejecting empty question");
            return Answer::new(AnswerStatus::Clarification, EMPTY_QUESTION_ANSWER, session_id);
        }

        let conversation = self.store.session(&session_id).await;
        let mut conversation = conversation.lock().await;

        if is_memory_clear(question) {
            let forgotten = conversation.len();
            conversation.clear();
            info!(forgotten, "Conversation memory cleared");
            return Answer::new(AnswerStatus::MemoryCleared, MEMORY_CLEARED_ANSWER, session_id);
        }

        let history = conversation.snapshot();
        let options = AgentOptions {
            session_id: Some(session_id.clone()),
            max_steps: self.settings.max_steps,
            max_corrections: self.settings.max_corrections,
        };
        let deadline = self.settings.request_timeout;
        let run = tokio::time::timeout(deadline, self.agent.run(question, &history, options));

        let (status, error) = match run.await {
            Ok(Ok(outcome)) => {
                info!(
                    status = outcome.status.as_str(),
                    steps = outcome.steps.len(),
                    "Question answered"
                );
                conversation.extend(outcome.messages);
                return Answer {
                    answer: outcome.answer,
                    status: outcome.status,
                    session_id,
                    steps: outcome.steps,
                };
            }
            Ok(Err(error)) => {
                error!(%error, "Agent run failed");
                (AnswerStatus::Failed, error)
            }
            Err(_) => {
                let error = AgentError::Timeout {
                    seconds: deadline.as_secs(),
                };
                warn!(%error, "Agent run abandoned");
                (AnswerStatus::Timeout, error)
            }
        };

        let answer = error.user_message();
        conversation.append(Message::user(question));
        conversation.append(Message::assistant(answer.clone()));
        Answer::new(status, answer, session_id)
    }
}
