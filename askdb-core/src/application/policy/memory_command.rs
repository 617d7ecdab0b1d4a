const PHRASES: &[&str] = &[
    "clear memory",
    "clear the memory",
    "clear your memory",
    "clear history",
    "clear the history",
    "clear chat history",
    "clear conversation",
    "clear the conversation",
    "reset memory",
    "reset conversation",
    "reset the conversation",
    "reset chat",
    "start over",
    "new conversation",
    "forget everything",
    "forget our conversation",
];

const SLASH_COMMANDS: &[&str] = &["/clear", "/reset", "/forget"];

/// Whether the question is an explicit request to wipe the conversation.
///
/// Only whole-message commands count; "how do I clear memory in MySQL?" is a
/// question, not a command.
pub fn is_memory_clear(question: &str) -> bool {
    let trimmed = question.trim();
    if SLASH_COMMANDS
        .iter()
        .any(|command| trimmed.eq_ignore_ascii_case(command))
    {
        return true;
    }

    let lowered = trimmed.to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .filter(|word| !word.is_empty())
        .collect();
    let mut phrase = words.as_slice();
    if let [first, rest @ ..] = phrase {
        if *first == "please" {
            phrase = rest;
        }
    }
    if let [rest @ .., last] = phrase {
        if *last == "please" {
            phrase = rest;
        }
    }
    let phrase = phrase.join(" ");
    PHRASES.contains(&phrase.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_reset_commands() {
        assert!(is_memory_clear("clear memory"));
        assert!(is_memory_clear("  Clear Memory! "));
        assert!(is_memory_clear("Please reset the conversation."));
        assert!(is_memory_clear("forget everything, please"));
        assert!(is_memory_clear("/CLEAR"));
    }

    #[test]
    fn ordinary_questions_are_not_commands() {
        assert!(!is_memory_clear("How many customers are in the database?"));
        assert!(!is_memory_clear("how do I clear memory in MySQL?"));
        assert!(!is_memory_clear(""));
        assert!(!is_memory_clear("please"));
    }
}
