use std::sync::LazyLock;

use relevo_core::models::document::SbarSections;
use relevo_core::models::session::FieldView;
use relevo_scores::ScoreSet;

use crate::Protocol;
use crate::protocols::{critical, labeled, list_or_placeholder};
use crate::steps::{FieldDefinition, FieldType, StepDefinition};

/// Incident report, a legal document. Completion must be finalized with a
/// signature, after which the session and document are immutable.
pub struct IncidentReport;

impl Protocol for IncidentReport {
    fn id(&self) -> &str {
        "incident_report"
    }

    fn name(&self) -> &str {
        "Incident Report"
    }

    fn version(&self) -> u32 {
        1
    }

    fn requires_signature(&self) -> bool {
        true
    }

    fn steps(&self) -> &[StepDefinition] {
        static STEPS: LazyLock<Vec<StepDefinition>> = LazyLock::new(|| {
            vec![
                StepDefinition::new(
                    "event",
                    "Event details",
                    vec![
                        FieldDefinition::required("occurred_at", "Occurred at", FieldType::Timestamp),
                        FieldDefinition::required("location", "Location", FieldType::Text),
                        FieldDefinition::required(
                            "incident_type",
                            "Incident type",
                            FieldType::Choice {
                                options: vec![
                                    "fall".to_string(),
                                    "medication_error".to_string(),
                                    "equipment".to_string(),
                                    "behavioral".to_string(),
                                    "other".to_string(),
                                ],
                            },
                        ),
                        FieldDefinition::required("description", "Description", FieldType::Text),
                    ],
                ),
                StepDefinition::new(
                    "people",
                    "People involved",
                    vec![
                        FieldDefinition::required(
                            "patient_involved",
                            "Patient involved",
                            FieldType::Boolean,
                        ),
                        FieldDefinition::optional("patient_name", "Patient name", FieldType::Text),
                        FieldDefinition::optional("mrn", "Medical record number", FieldType::Text),
                        FieldDefinition::optional("witnesses", "Witnesses", FieldType::TextList),
                    ],
                ),
                StepDefinition::new(
                    "response",
                    "Immediate response",
                    vec![
                        FieldDefinition::required(
                            "immediate_actions",
                            "Immediate actions taken",
                            FieldType::Text,
                        ),
                        FieldDefinition::required(
                            "provider_notified",
                            "Provider notified",
                            FieldType::Boolean,
                        ),
                        FieldDefinition::optional(
                            "family_notified",
                            "Family notified",
                            FieldType::Boolean,
                        ),
                    ],
                ),
                StepDefinition::new(
                    "classification",
                    "Classification",
                    vec![
                        FieldDefinition::required(
                            "severity",
                            "Severity",
                            FieldType::Choice {
                                options: vec![
                                    "near_miss".to_string(),
                                    "no_harm".to_string(),
                                    "minor_harm".to_string(),
                                    "moderate_harm".to_string(),
                                    "severe_harm".to_string(),
                                    "death".to_string(),
                                ],
                            },
                        ),
                        FieldDefinition::optional(
                            "contributing_factors",
                            "Contributing factors",
                            FieldType::TextList,
                        ),
                    ],
                ),
            ]
        });
        &STEPS
    }

    fn sbar(&self, fields: &FieldView, _scores: &ScoreSet) -> SbarSections {
        let severity = fields.text("severity");

        let mut situation = String::new();
        situation.push_str(&format!(
            "{} incident at {}, {}.\n",
            fields.text_or_placeholder("incident_type"),
            fields.text_or_placeholder("location"),
            fields
                .timestamp("occurred_at")
                .map(|t| t.to_string())
                .unwrap_or_else(|| "time not documented".to_string()),
        ));
        if matches!(severity, Some("severe_harm") | Some("death")) {
            critical(
                &mut situation,
                &format!("REPORTABLE EVENT — {}", severity.unwrap_or_default()),
            );
        }

        let mut background = String::new();
        labeled(
            &mut background,
            "Patient involved",
            fields.yes_no("patient_involved"),
        );
        if fields.boolean("patient_involved") == Some(true) {
            labeled(&mut background, "Patient", fields.text_or_placeholder("patient_name"));
            labeled(&mut background, "MRN", fields.text_or_placeholder("mrn"));
        }
        labeled(
            &mut background,
            "Witnesses",
            &list_or_placeholder(fields, "witnesses"),
        );

        let mut assessment = String::new();
        labeled(
            &mut assessment,
            "Description",
            fields.text_or_placeholder("description"),
        );
        labeled(&mut assessment, "Severity", fields.text_or_placeholder("severity"));
        labeled(
            &mut assessment,
            "Contributing factors",
            &list_or_placeholder(fields, "contributing_factors"),
        );

        let mut recommendation = String::new();
        labeled(
            &mut recommendation,
            "Immediate actions",
            fields.text_or_placeholder("immediate_actions"),
        );
        labeled(
            &mut recommendation,
            "Provider notified",
            fields.yes_no("provider_notified"),
        );
        labeled(
            &mut recommendation,
            "Family notified",
            fields.yes_no("family_notified"),
        );

        SbarSections {
            situation,
            background,
            assessment,
            recommendation,
        }
    }
}
