//! Error telemetry sink backed by `tracing`

use crate::domain::traits::{ErrorReport, TelemetrySink};

/// Emits every report as a structured error event, tags as a JSON object
#[derive(Debug, Clone, Default)]
pub struct TracingTelemetry;

impl TracingTelemetry {
    pub fn new() -> Self {
        Self
    }

    pub fn tags_json(report: &ErrorReport) -> String {
        serde_json::to_string(&report.tags).unwrap_or_else(|_| "{}".to_string())
    }
}

impl TelemetrySink for TracingTelemetry {
    fn capture(&self, report: ErrorReport) {
        tracing::error!(
            target: "telemetry",
            user_id = %report.user_id,
            username = %report.username,
            tags = %Self::tags_json(&report),
            "{}",
            report.error
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_tags_serialize_as_object() {
        let report = ErrorReport {
            error: "boom".to_string(),
            user_id: "u1".to_string(),
            username: "someone#0001".to_string(),
            tags: BTreeMap::from([
                ("ChannelID".to_string(), "c1".to_string()),
                ("IsBot".to_string(), "false".to_string()),
            ]),
        };

        let json: serde_json::Value = serde_json::from_str(&TracingTelemetry::tags_json(&report)).unwrap();
        assert_eq!(json["ChannelID"], "c1");
        assert_eq!(json["IsBot"], "false");

        TracingTelemetry::new().capture(report);
    }
}
