pub mod api;
pub mod error;
pub mod http;
pub mod types;

pub use api::{DialogueService, SynthesisService, TranscriptionService};
pub use error::ClientError;
pub use http::{ClientConfig, HttpApiClient};
pub use types::{
    display_messages, expects_slot_selection, last_assistant_message, DialogueRequest,
    DialogueResponse, LeadRequest, MeetingInvitee, MeetingRequest, MeetingSettings,
    MessageRecord, Role, SynthesisRequest, TranscriptionResponse, GREETING,
};
