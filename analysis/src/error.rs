#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ReconstructError {
    #[error("session {session_id} has no participant with any shot")]
    NoParticipants { session_id: String },
    #[error("session {session_id} has no shot with a contact or start timestamp")]
    MissingTimestamps { session_id: String },
}
