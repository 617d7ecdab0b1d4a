use crate::domain::{ConversationRole, Message};

/// Ordered, append-only history of one session.
///
/// When the history grows past `max_messages` the oldest turns are dropped
/// whole. A turn starts at a user message, so the retained history always
/// starts with one unless a single turn alone exceeds the bound.
#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<Message>,
    max_messages: usize,
}

impl Conversation {
    pub fn new(max_messages: usize) -> Self {
        Self {
            messages: Vec::new(),
            max_messages: max_messages.max(1),
        }
    }

    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
        self.enforce_bound();
    }

    /// Appends a whole turn at once.
    pub fn extend(&mut self, messages: impl IntoIterator<Item = Message>) {
        self.messages.extend(messages);
        self.enforce_bound();
    }

    pub fn snapshot(&self) -> Vec<Message> {
        self.messages.clone()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    fn enforce_bound(&mut self) {
        while self.messages.len() > self.max_messages {
            let next_turn = self
                .messages
                .iter()
                .skip(1)
                .position(|message| message.role == ConversationRole::User)
                .map(|offset| offset + 1);
            match next_turn {
                Some(index) => {
                    self.messages.drain(..index);
                }
                None => {
                    let excess = self.messages.len() - self.max_messages;
                    self.messages.drain(..excess);
                    let orphans = self
                        .messages
                        .iter()
                        .take_while(|message| message.role == ConversationRole::Tool)
                        .count();
                    self.messages.drain(..orphans);
                }
            }
        }
    }
}
