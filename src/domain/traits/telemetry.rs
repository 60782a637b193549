use std::collections::BTreeMap;

/// One unexpected failure, with the contextual tags of the message that caused it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    pub error: String,
    pub user_id: String,
    pub username: String,
    pub tags: BTreeMap<String, String>,
}

/// Operator-facing error sink. Fire-and-forget: reporting never fails the caller.
pub trait TelemetrySink: Send + Sync {
    fn capture(&self, report: ErrorReport);
}
