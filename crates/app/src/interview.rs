use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use parlance_client::{
    ClientError, HttpApiClient, LeadRequest, MeetingInvitee, MeetingRequest, MeetingSettings,
    MessageRecord, Role,
};

/// Phrase in the closing assistant message that marks the interview done.
pub const COMPLETION_SENTINEL: &str = "Thank you for your time";

/// Length of the scheduled follow-up meeting, in minutes.
const MEETING_DURATION_MINUTES: u32 = 30;

/// Zoom API meeting type for a scheduled (non-instant) meeting.
const SCHEDULED_MEETING: u8 = 2;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewConfig {
    /// Timezone name stamped on the meeting payload.
    pub timezone: String,
    /// UTC offset of that timezone, used to normalize the meeting slot.
    pub utc_offset_minutes: i32,
}

impl Default for InterviewConfig {
    fn default() -> Self {
        Self {
            timezone: "Asia/Kolkata".into(),
            utc_offset_minutes: 330,
        }
    }
}

/// Delivery seam for the one-shot completion calls (leads + meeting).
#[async_trait]
pub trait CompletionSink: Send + Sync {
    async fn deliver(&self, lead: LeadRequest, meeting: MeetingRequest) -> Result<(), ClientError>;
}

#[async_trait]
impl CompletionSink for HttpApiClient {
    async fn deliver(&self, lead: LeadRequest, meeting: MeetingRequest) -> Result<(), ClientError> {
        self.submit_lead(&lead).await?;
        self.create_meeting(&meeting).await
    }
}

/// Watches the display transcript for interview completion and builds the
/// lead/meeting payloads from the confirmation block. Fires at most once per
/// session.
pub struct InterviewTracker {
    config: InterviewConfig,
    fired: AtomicBool,
}

impl InterviewTracker {
    pub fn new(config: InterviewConfig) -> Self {
        Self {
            config,
            fired: AtomicBool::new(false),
        }
    }

    /// Check the transcript after a dialogue exchange. Completion requires
    /// the sentinel phrase in the final assistant message and at least three
    /// messages, with the confirmation summary two messages earlier.
    pub fn check(&self, display: &[MessageRecord]) -> Option<(LeadRequest, MeetingRequest)> {
        if self.fired.load(Ordering::Relaxed) || display.len() < 3 {
            return None;
        }

        let last = display.last()?;
        if last.role != Role::Assistant || !last.content.contains(COMPLETION_SENTINEL) {
            return None;
        }

        let confirmation = display[display.len() - 3]
            .content
            .trim()
            .trim_matches('\'');
        let details = parse_confirmation(confirmation);

        let field = |key: &str| details.get(key).cloned().unwrap_or_default();
        if field("email").is_empty() {
            tracing::warn!("Interview confirmation has no email; submitting lead anyway");
        }

        let slot = normalize_slot(&field("meeting"), self.config.utc_offset_minutes);
        let requirement = field("requirement");

        let lead = LeadRequest {
            name: field("name"),
            email: field("email"),
            requirement: requirement.clone(),
            company: field("company"),
            phone: field("phone"),
            meetingslot: slot.clone(),
        };

        let meeting = MeetingRequest {
            start_time: slot,
            timezone: self.config.timezone.clone(),
            topic: requirement.clone(),
            meeting_type: SCHEDULED_MEETING,
            agenda: requirement,
            duration: MEETING_DURATION_MINUTES,
            settings: MeetingSettings {
                meeting_invitees: vec![MeetingInvitee {
                    email: lead.email.clone(),
                }],
                email_notification: true,
                contact_email: lead.email.clone(),
                contact_name: lead.name.clone(),
            },
        };

        self.fired.store(true, Ordering::Relaxed);
        Some((lead, meeting))
    }
}

/// Parse `key: value` lines from the confirmation block, skipping its
/// heading line. Keys are lowercased; values keep any embedded colons.
fn parse_confirmation(block: &str) -> HashMap<String, String> {
    let mut details = HashMap::new();
    for line in block.lines().skip(1) {
        if let Some((key, value)) = line.trim().split_once(':') {
            details.insert(key.trim().to_lowercase(), value.trim().to_string());
        }
    }
    details
}

/// Normalize a meeting slot to an ISO-8601 timestamp in the configured
/// offset. Accepts a full RFC 3339 timestamp, a naive datetime, or a bare
/// date (midnight assumed); anything else passes through untouched.
fn normalize_slot(raw: &str, offset_minutes: i32) -> String {
    let Some(offset) = FixedOffset::east_opt(offset_minutes * 60) else {
        return raw.to_string();
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.with_timezone(&offset).to_rfc3339();
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        if let chrono::LocalResult::Single(dt) = naive.and_local_timezone(offset) {
            return dt.to_rfc3339();
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            if let chrono::LocalResult::Single(dt) = naive.and_local_timezone(offset) {
                return dt.to_rfc3339();
            }
        }
    }

    tracing::debug!(slot = raw, "Meeting slot left unnormalized");
    raw.to_string()
}
