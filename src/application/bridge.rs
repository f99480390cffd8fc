//! Conversion between the part-structured client messages and the flat
//! role/content wire format.
//!
//! Both directions are pure and order-preserving. Text and tool parts
//! round-trip exactly; file parts are always transmitted (redaction exists
//! only as a logging helper).

use crate::domain::types::{
    AssistantToolCall, ChatRole, ContentBlock, FileData, ImageUrl, MessageContent, MessageRole,
    ModelMessage, Part, UiMessage,
};
use serde_json::Value;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BridgeError {
    #[error("tool result '{tool_call_id}' does not follow a matching tool call")]
    OrphanToolResult { tool_call_id: String },
    #[error("{role} turn carries an unsupported {kind} part")]
    UnsupportedPart {
        role: &'static str,
        kind: &'static str,
    },
    #[error("tool call part has an empty tool name")]
    MissingToolName,
    #[error("tool call part has an empty call id")]
    MissingToolCallId,
    #[error("conversation turn has no parts")]
    EmptyTurn,
}

/// Maps a client conversation to the wire message list the model expects.
///
/// Assistant turns are segmented: every tool-result becomes a `tool` role
/// message placed right after the assistant message carrying its call, and
/// text produced after results opens a fresh assistant message. Results may
/// also settle calls left open by the directly preceding assistant turn.
pub fn to_model_messages(history: &[UiMessage]) -> Result<Vec<ModelMessage>, BridgeError> {
    let mut out = Vec::new();
    let mut open_calls: HashSet<String> = HashSet::new();

    for message in history {
        if message.parts.is_empty() {
            return Err(BridgeError::EmptyTurn);
        }
        match message.role {
            ChatRole::User => {
                open_calls.clear();
                out.push(convert_user_turn(message)?);
            }
            ChatRole::Assistant => {
                convert_assistant_turn(message, &mut out, &mut open_calls)?;
            }
        }
    }

    Ok(out)
}

fn convert_user_turn(message: &UiMessage) -> Result<ModelMessage, BridgeError> {
    let mut blocks = Vec::with_capacity(message.parts.len());
    for part in &message.parts {
        match part {
            Part::Text { text } => blocks.push(ContentBlock::Text { text: text.clone() }),
            Part::File {
                media_type,
                filename,
                url,
            } => {
                if media_type.starts_with("image/") {
                    blocks.push(ContentBlock::ImageUrl {
                        image_url: ImageUrl { url: url.clone() },
                    });
                } else {
                    blocks.push(ContentBlock::File {
                        file: FileData {
                            filename: filename.clone(),
                            file_data: url.clone(),
                        },
                    });
                }
            }
            Part::ToolCall { .. } => {
                return Err(BridgeError::UnsupportedPart {
                    role: "user",
                    kind: "tool-call",
                });
            }
            Part::ToolResult { .. } => {
                return Err(BridgeError::UnsupportedPart {
                    role: "user",
                    kind: "tool-result",
                });
            }
        }
    }

    // A lone text part collapses to the plain string form.
    if let [ContentBlock::Text { text }] = blocks.as_slice() {
        return Ok(ModelMessage::user_text(text.clone()));
    }
    Ok(ModelMessage::user_blocks(blocks))
}

fn convert_assistant_turn(
    message: &UiMessage,
    out: &mut Vec<ModelMessage>,
    open_calls: &mut HashSet<String>,
) -> Result<(), BridgeError> {
    let mut text = String::new();
    let mut calls: Vec<AssistantToolCall> = Vec::new();

    for part in &message.parts {
        match part {
            Part::Text { text: fragment } => text.push_str(fragment),
            Part::ToolCall {
                tool_name,
                tool_call_id,
                input,
            } => {
                if tool_name.is_empty() {
                    return Err(BridgeError::MissingToolName);
                }
                if tool_call_id.is_empty() {
                    return Err(BridgeError::MissingToolCallId);
                }
                calls.push(AssistantToolCall::function(
                    tool_call_id.clone(),
                    tool_name.clone(),
                    input.to_string(),
                ));
            }
            Part::ToolResult {
                tool_call_id,
                output,
            } => {
                let settles_current = calls.iter().any(|call| call.id == *tool_call_id);
                if settles_current {
                    flush_assistant_segment(out, &mut text, &mut calls, open_calls);
                } else if !open_calls.contains(tool_call_id) {
                    return Err(BridgeError::OrphanToolResult {
                        tool_call_id: tool_call_id.clone(),
                    });
                }
                open_calls.remove(tool_call_id);
                out.push(ModelMessage::tool(tool_call_id.clone(), output.to_string()));
            }
            Part::File { .. } => {
                return Err(BridgeError::UnsupportedPart {
                    role: "assistant",
                    kind: "file",
                });
            }
        }
    }

    flush_assistant_segment(out, &mut text, &mut calls, open_calls);
    Ok(())
}

fn flush_assistant_segment(
    out: &mut Vec<ModelMessage>,
    text: &mut String,
    calls: &mut Vec<AssistantToolCall>,
    open_calls: &mut HashSet<String>,
) {
    if text.is_empty() && calls.is_empty() {
        return;
    }
    for call in calls.iter() {
        open_calls.insert(call.id.clone());
    }
    out.push(ModelMessage::assistant_with_calls(
        std::mem::take(text),
        std::mem::take(calls),
    ));
}

/// Maps a wire message list back to client turns, merging an
/// assistant/tool/assistant run into one assistant turn. System messages
/// have no client representation and are skipped.
pub fn from_model_messages(messages: &[ModelMessage]) -> Result<Vec<UiMessage>, BridgeError> {
    let mut out: Vec<UiMessage> = Vec::new();
    let mut merging_assistant = false;

    for message in messages {
        match message.role {
            MessageRole::System => {}
            MessageRole::User => {
                merging_assistant = false;
                out.push(UiMessage::user(user_parts(message)));
            }
            MessageRole::Assistant => {
                let mut parts = Vec::new();
                if let Some(text) = message.text() {
                    if !text.is_empty() {
                        parts.push(Part::text(text));
                    }
                }
                for call in &message.tool_calls {
                    if call.function.name.is_empty() {
                        return Err(BridgeError::MissingToolName);
                    }
                    parts.push(Part::ToolCall {
                        tool_name: call.function.name.clone(),
                        tool_call_id: call.id.clone(),
                        input: parse_json_or_string(&call.function.arguments),
                    });
                }
                if merging_assistant {
                    if let Some(turn) = out.last_mut() {
                        turn.parts.append(&mut parts);
                    }
                } else {
                    out.push(UiMessage::assistant(parts));
                }
                // A later assistant message only merges back in when tool
                // results sit between the two.
                merging_assistant = false;
            }
            MessageRole::Tool => {
                let tool_call_id = message.tool_call_id.clone().unwrap_or_default();
                let matched = out
                    .last()
                    .map(|turn| {
                        turn.role == ChatRole::Assistant
                            && turn.parts.iter().any(|part| {
                                matches!(part, Part::ToolCall { tool_call_id: id, .. } if *id == tool_call_id)
                            })
                    })
                    .unwrap_or(false);
                if !matched {
                    return Err(BridgeError::OrphanToolResult { tool_call_id });
                }
                let output = message
                    .text()
                    .map(parse_json_or_string)
                    .unwrap_or(Value::Null);
                if let Some(turn) = out.last_mut() {
                    turn.parts.push(Part::ToolResult {
                        tool_call_id,
                        output,
                    });
                }
                merging_assistant = true;
            }
        }
    }

    Ok(out)
}

fn user_parts(message: &ModelMessage) -> Vec<Part> {
    match &message.content {
        MessageContent::Text(text) => vec![Part::text(text)],
        MessageContent::Blocks(blocks) => blocks
            .iter()
            .map(|block| match block {
                ContentBlock::Text { text } => Part::text(text),
                ContentBlock::ImageUrl { image_url } => Part::File {
                    media_type: media_type_of(&image_url.url, "image/*"),
                    filename: None,
                    url: image_url.url.clone(),
                },
                ContentBlock::File { file } => Part::File {
                    media_type: media_type_of(&file.file_data, "application/octet-stream"),
                    filename: file.filename.clone(),
                    url: file.file_data.clone(),
                },
            })
            .collect(),
    }
}

fn media_type_of(url: &str, fallback: &str) -> String {
    url.strip_prefix("data:")
        .and_then(|rest| rest.split(&[';', ','][..]).next())
        .filter(|media| !media.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| fallback.to_string())
}

fn parse_json_or_string(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Copy of a conversation with file payloads blanked, for log output only.
/// The transmit path never goes through here.
pub fn redact_for_logging(history: &[UiMessage]) -> Vec<UiMessage> {
    history
        .iter()
        .map(|message| UiMessage {
            role: message.role,
            parts: message
                .parts
                .iter()
                .map(|part| match part {
                    Part::File {
                        media_type,
                        filename,
                        ..
                    } => Part::File {
                        media_type: media_type.clone(),
                        filename: filename.clone(),
                        url: "[redacted]".to_string(),
                    },
                    other => other.clone(),
                })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn weather_turn() -> UiMessage {
        UiMessage::assistant(vec![
            Part::ToolCall {
                tool_name: "weather".into(),
                tool_call_id: "call_1".into(),
                input: json!({"location": "Austin"}),
            },
            Part::ToolResult {
                tool_call_id: "call_1".into(),
                output: json!({"location": "Austin", "temperature": 78}),
            },
            Part::text("It is 78°F in Austin."),
        ])
    }

    #[test]
    fn splits_assistant_turn_around_tool_results() {
        let history = vec![
            UiMessage::user(vec![Part::text("What's the weather in Austin?")]),
            weather_turn(),
        ];

        let wire = to_model_messages(&history).expect("conversion succeeds");
        assert_eq!(wire.len(), 4);
        assert_eq!(wire[0].role, MessageRole::User);
        assert_eq!(wire[1].role, MessageRole::Assistant);
        assert_eq!(wire[1].tool_calls.len(), 1);
        assert_eq!(wire[1].tool_calls[0].id, "call_1");
        assert_eq!(wire[2].role, MessageRole::Tool);
        assert_eq!(wire[2].tool_call_id.as_deref(), Some("call_1"));
        assert_eq!(wire[3].role, MessageRole::Assistant);
        assert_eq!(wire[3].text(), Some("It is 78°F in Austin."));
    }

    #[test]
    fn round_trips_text_and_tool_parts_exactly() {
        let history = vec![
            UiMessage::user(vec![Part::text("What's the weather in Austin?")]),
            weather_turn(),
            UiMessage::user(vec![Part::text("thanks")]),
            UiMessage::assistant(vec![Part::text("Anytime.")]),
        ];

        let wire = to_model_messages(&history).expect("forward conversion succeeds");
        let back = from_model_messages(&wire).expect("reverse conversion succeeds");
        assert_eq!(back, history);
    }

    #[test]
    fn result_may_settle_call_from_previous_assistant_turn() {
        let history = vec![
            UiMessage::user(vec![Part::text("convert 100 EUR to USD")]),
            UiMessage::assistant(vec![Part::ToolCall {
                tool_name: "convertCurrency".into(),
                tool_call_id: "call_9".into(),
                input: json!({"baseCurrency": "EUR", "targetCurrency": "USD", "amount": 100}),
            }]),
            UiMessage::assistant(vec![
                Part::ToolResult {
                    tool_call_id: "call_9".into(),
                    output: json!({"convertedAmount": 108.2}),
                },
                Part::text("That's about $108.20."),
            ]),
        ];

        let wire = to_model_messages(&history).expect("conversion succeeds");
        assert_eq!(wire[2].role, MessageRole::Tool);
        assert_eq!(wire[3].text(), Some("That's about $108.20."));
    }

    #[test]
    fn rejects_orphan_tool_result() {
        let history = vec![UiMessage::assistant(vec![Part::ToolResult {
            tool_call_id: "call_missing".into(),
            output: json!({}),
        }])];

        let err = to_model_messages(&history).expect_err("orphan result is rejected");
        assert_eq!(
            err,
            BridgeError::OrphanToolResult {
                tool_call_id: "call_missing".into()
            }
        );
    }

    #[test]
    fn rejects_tool_parts_in_user_turns() {
        let history = vec![UiMessage::user(vec![Part::ToolCall {
            tool_name: "weather".into(),
            tool_call_id: "call_1".into(),
            input: json!({}),
        }])];

        let err = to_model_messages(&history).expect_err("user tool part is rejected");
        assert_eq!(
            err,
            BridgeError::UnsupportedPart {
                role: "user",
                kind: "tool-call"
            }
        );
    }

    #[test]
    fn transmits_file_parts_and_redacts_only_for_logging() {
        let history = vec![UiMessage::user(vec![
            Part::text("here is my policy document"),
            Part::File {
                media_type: "application/pdf".into(),
                filename: Some("policy.pdf".into()),
                url: "data:application/pdf;base64,JVBERi0=".into(),
            },
        ])];

        let wire = to_model_messages(&history).expect("conversion succeeds");
        let MessageContent::Blocks(blocks) = &wire[0].content else {
            panic!("attachment turn keeps block content");
        };
        assert!(matches!(
            &blocks[1],
            ContentBlock::File { file } if file.file_data.contains("base64,JVBERi0=")
        ));

        let logged = redact_for_logging(&history);
        assert!(matches!(
            &logged[0].parts[1],
            Part::File { url, .. } if url == "[redacted]"
        ));
    }

    #[test]
    fn image_attachment_becomes_image_block() {
        let history = vec![UiMessage::user(vec![Part::File {
            media_type: "image/png".into(),
            filename: Some("receipt.png".into()),
            url: "data:image/png;base64,iVBORw0=".into(),
        }])];

        let wire = to_model_messages(&history).expect("conversion succeeds");
        let MessageContent::Blocks(blocks) = &wire[0].content else {
            panic!("attachment turn keeps block content");
        };
        assert!(matches!(&blocks[0], ContentBlock::ImageUrl { .. }));

        let back = from_model_messages(&wire).expect("reverse conversion succeeds");
        assert!(matches!(
            &back[0].parts[0],
            Part::File { media_type, .. } if media_type == "image/png"
        ));
    }
}
