use super::directive::AgentDirective;
use super::errors::AgentError;
use super::models::{AgentOptions, AgentOutcome, AgentStep};
use super::runtime::{ToolExecution, ToolRuntime};
use crate::application::client::{ChatClient, summarise};
use crate::application::tooling::ToolRegistry;
use crate::config::PromptSettings;
use crate::domain::{AnswerStatus, ChatMessage, Message, ToolOutcome};
use crate::infrastructure::model::ModelProvider;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct Agent<P: ModelProvider> {
    client: Arc<ChatClient<P>>,
    runtime: ToolRuntime,
    system_prompt: String,
}

impl<P: ModelProvider> Agent<P> {
    pub fn new(
        client: Arc<ChatClient<P>>,
        registry: Arc<ToolRegistry>,
        prompt: &PromptSettings,
    ) -> Self {
        let runtime = ToolRuntime::new(registry);
        let system_prompt = runtime.compose_system_prompt(prompt);
        Self {
            client,
            runtime,
            system_prompt,
        }
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn registry(&self) -> &ToolRegistry {
        self.runtime.registry()
    }

    /// Answers one question on top of `history`.
    ///
    /// Nothing is written to memory here: the turn is returned in
    /// [`AgentOutcome::messages`] for the caller to commit.
    pub async fn run(
        &self,
        question: &str,
        history: &[Message],
        options: AgentOptions,
    ) -> Result<AgentOutcome, AgentError> {
        info!(
            session = options.session_id.as_deref(),
            history = history.len(),
            question = %summarise(question),
            "Agent run started"
        );
        let mut turn = vec![Message::user(question)];
        let mut steps: Vec<AgentStep> = Vec::new();
        let mut corrections: Vec<ChatMessage> = Vec::new();
        let mut corrections_used = 0usize;

        loop {
            let messages = self.prompt_messages(history, &turn, &corrections);
            debug!(
                messages = messages.len(),
                steps = steps.len(),
                "Submitting agent turn to model provider"
            );
            let reply = self
                .client
                .chat(messages, options.session_id.as_deref())
                .await?;

            let directive = match self.runtime.parse_agent_action(&reply) {
                Ok(directive) => directive,
                Err(error) => {
                    self.request_correction(
                        &mut corrections,
                        &mut corrections_used,
                        options.max_corrections,
                        &reply,
                        &error.to_string(),
                    )?;
                    continue;
                }
            };

            match directive {
                AgentDirective::Final { response } => {
                    info!(steps = steps.len(), "Agent returned final response");
                    return Ok(finish(AnswerStatus::Answered, response, steps, turn));
                }
                AgentDirective::Clarify { question } => {
                    info!(steps = steps.len(), "Agent asked for clarification");
                    return Ok(finish(AnswerStatus::Clarification, question, steps, turn));
                }
                AgentDirective::Refuse { response } => {
                    info!(steps = steps.len(), "Agent refused the request");
                    return Ok(finish(AnswerStatus::Refused, response, steps, turn));
                }
                AgentDirective::CallTool { tool, input } => {
                    if steps.len() >= options.max_steps {
                        warn!(max_steps = options.max_steps, "Agent exceeded max tool interactions");
                        let answer = format!(
                            "I could not complete this request within {} tool calls. Try asking a narrower question.",
                            options.max_steps
                        );
                        return Ok(finish(AnswerStatus::Incomplete, answer, steps, turn));
                    }

                    info!(tool = %tool, "Agent requested tool execution");
                    match self.runtime.execute(&tool, input).await {
                        ToolExecution::Completed {
                            invocation,
                            outcome,
                        } => {
                            steps.push(AgentStep::from_execution(&invocation, &outcome));
                            turn.push(Message::tool_call(invocation));
                            turn.push(Message::tool_result(outcome));
                            corrections.clear();
                        }
                        ToolExecution::Blocked { invocation, error } => {
                            let answer = error.user_message();
                            let blocked = ToolOutcome::failed(invocation.name(), error.to_string());
                            turn.push(Message::tool_call(invocation));
                            turn.push(Message::tool_result(blocked));
                            return Ok(finish(AnswerStatus::Clarification, answer, steps, turn));
                        }
                        ToolExecution::Rejected(error) => {
                            self.request_correction(
                                &mut corrections,
                                &mut corrections_used,
                                options.max_corrections,
                                &reply,
                                &error.user_message(),
                            )?;
                        }
                    }
                }
            }
        }
    }

    fn prompt_messages(
        &self,
        history: &[Message],
        turn: &[Message],
        corrections: &[ChatMessage],
    ) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(1 + history.len() + turn.len() + corrections.len());
        messages.push(ChatMessage::system(self.system_prompt.clone()));
        messages.extend(self.runtime.render_history(history));
        messages.extend(self.runtime.render_history(turn));
        messages.extend_from_slice(corrections);
        messages
    }

    /// Corrections live only for the current question and are never
    /// committed to memory.
    fn request_correction(
        &self,
        corrections: &mut Vec<ChatMessage>,
        used: &mut usize,
        max_corrections: usize,
        reply: &str,
        reason: &str,
    ) -> Result<(), AgentError> {
        if *used >= max_corrections {
            warn!(attempts = *used, reason, "Model response still unusable after corrections");
            return Err(AgentError::InvalidResponse(reason.to_string()));
        }
        *used += 1;
        warn!(
            attempt = *used,
            max_attempts = max_corrections,
            reason,
            "Unusable model response, requesting correction"
        );
        corrections.push(ChatMessage::assistant(reply));
        corrections.push(ChatMessage::user(self.runtime.correction_message(reason)));
        Ok(())
    }
}

fn finish(
    status: AnswerStatus,
    answer: String,
    steps: Vec<AgentStep>,
    mut turn: Vec<Message>,
) -> AgentOutcome {
    turn.push(Message::assistant(answer.clone()));
    AgentOutcome {
        status,
        answer,
        steps,
        messages: turn,
    }
}
