//! Prompt construction for the chat and ask flows.
//!
//! The template wording is part of the product behaviour; existing
//! deployments compare answers across installations, so changes here are
//! user-visible.

use std::collections::HashMap;

use docq_core::traits::ScoredPassage;
use docq_entity::chat::ChatMessage;

/// Canned assistant answer used when the model or index call fails.
pub const QUERY_ERROR_MESSAGE: &str =
    "Sorry, I was unable to answer that. Please try again later.";

/// Renders history messages into `Human:`/`Assistant:` lines.
pub fn render_history(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .map(|m| format!("{}: {}", m.speaker_label(), m.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prompt for general chat without document retrieval.
pub fn chat_prompt(history: &str, input: &str) -> String {
    format!(
        r#"You are an AI assistant helping a human to find information.
Your conversation with the human is recorded in the chat history below.

History:
"{history}"

Now continue the conversation with the human.
Human: {input}
Assistant:"#
    )
}

/// Prompt for question answering over retrieved document passages.
pub fn question_prompt(history: &str, passages: &[ScoredPassage], input: &str) -> String {
    let context = passages
        .iter()
        .map(|p| format!("[{}]\n{}", p.document, p.passage))
        .collect::<Vec<_>>()
        .join("\n\n");
    format!(
        r#"You are an AI assistant helping a human to find information in a collection of documents.
You are given a question and a collection of documents.
You need to find the best answer to the question from the given collection of documents.
Your conversation with the human is recorded in the chat history below.

History:
"{history}"

Documents:
{context}

Now continue the conversation with the human. If you do not know the answer, say "I don't know".
Human: {input}
Assistant:"#
    )
}

/// Formats retrieved passages into the source attribution block appended
/// to ask answers. `None` when nothing was retrieved.
pub fn format_sources(passages: &[ScoredPassage]) -> Option<String> {
    if passages.is_empty() {
        return None;
    }

    // Group by document, keeping first-seen order.
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for passage in passages {
        let doc = passage.document.as_str();
        if !counts.contains_key(doc) {
            order.push(doc);
        }
        *counts.entry(doc).or_insert(0) += 1;
    }

    let lines: Vec<String> = order
        .iter()
        .map(|doc| format!("> *File:* {}<br> *Passages:* {}", doc, counts[doc]))
        .collect();
    Some(lines.join("\n\n"))
}

/// The assistant message as persisted: the answer, with the source block
/// appended when present.
pub fn compose_assistant_message(answer: &str, sources: Option<&str>) -> String {
    match sources {
        Some(sources) => format!("{answer}\n{sources}"),
        None => answer.to_string(),
    }
}
