use crate::web::models::ChatMessage;

/// Trailing cue that asks the backend to continue as the assistant.
pub const ASSISTANT_CUE: &str = "Assistant: ";

/// Flattens a conversation into `User: ...` / `Assistant: ...` lines followed
/// by the assistant cue. Entries with an unrecognised role are skipped.
pub fn compose_prompt(history: &[ChatMessage]) -> String {
    let mut prompt = String::new();
    for message in history {
        let Some(speaker) = message.role.speaker_label() else {
            continue;
        };
        prompt.push_str(speaker);
        prompt.push_str(": ");
        prompt.push_str(&message.content);
        prompt.push('\n');
    }
    prompt.push_str(ASSISTANT_CUE);
    prompt
}
