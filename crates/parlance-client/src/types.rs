use serde::{Deserialize, Serialize};

/// Canonical widget greeting, prepended to derived display transcripts.
pub const GREETING: &str = "Hello! I am your Onboarding Companion";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    Assistant,
    User,
}

/// One role-tagged record in the conversation history.
///
/// The history is owned by the round-trip pipeline and replaced wholesale by
/// each dialogue response; it is never appended to locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub role: Role,
    pub content: String,
}

impl MessageRecord {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Renderable view of the history: a leading system record is stripped and
/// the canonical greeting is prepended.
pub fn display_messages(history: &[MessageRecord]) -> Vec<MessageRecord> {
    let stripped = match history.first() {
        Some(m) if m.role == Role::System => &history[1..],
        _ => history,
    };
    let mut display = Vec::with_capacity(stripped.len() + 1);
    display.push(MessageRecord::new(Role::Assistant, GREETING));
    display.extend_from_slice(stripped);
    display
}

pub fn last_assistant_message(history: &[MessageRecord]) -> Option<&MessageRecord> {
    history.iter().rev().find(|m| m.role == Role::Assistant)
}

/// Whether an assistant message is asking the visitor to pick a meeting
/// slot, so embedding UIs can swap the text input for a date picker.
pub fn expects_slot_selection(message: &str) -> bool {
    let lower = message.to_lowercase();
    let has_keyword = ["choose", "date", "slot"]
        .iter()
        .any(|word| lower.contains(word));
    has_keyword && !lower.contains("confirm")
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogueRequest {
    pub prompt: String,
    pub conversation_history: Vec<MessageRecord>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogueResponse {
    pub conversation_history: Vec<MessageRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptionResponse {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SynthesisRequest {
    pub text: String,
    pub voice: String,
}

/// Lead details posted once at interview completion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeadRequest {
    pub name: String,
    pub email: String,
    pub requirement: String,
    pub company: String,
    pub phone: String,
    pub meetingslot: String,
}

/// Scheduled-meeting payload for the meeting endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct MeetingRequest {
    pub start_time: String,
    pub timezone: String,
    pub topic: String,
    #[serde(rename = "type")]
    pub meeting_type: u8,
    pub agenda: String,
    pub duration: u32,
    pub settings: MeetingSettings,
}

#[derive(Debug, Clone, Serialize)]
pub struct MeetingSettings {
    pub meeting_invitees: Vec<MeetingInvitee>,
    pub email_notification: bool,
    pub contact_email: String,
    pub contact_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MeetingInvitee {
    pub email: String,
}
