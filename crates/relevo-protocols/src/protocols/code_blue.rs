use std::sync::LazyLock;

use relevo_core::models::document::SbarSections;
use relevo_core::models::session::FieldView;
use relevo_scores::ScoreSet;

use crate::Protocol;
use crate::protocols::{critical, labeled, list_or_placeholder};
use crate::steps::{FieldDefinition, FieldType, StepDefinition};

/// Code blue (in-hospital resuscitation) event record. No derived scores;
/// the document is a timeline-and-outcome handoff.
pub struct CodeBlue;

impl Protocol for CodeBlue {
    fn id(&self) -> &str {
        "code_blue"
    }

    fn name(&self) -> &str {
        "Code Blue Event Record"
    }

    fn version(&self) -> u32 {
        1
    }

    fn steps(&self) -> &[StepDefinition] {
        static STEPS: LazyLock<Vec<StepDefinition>> = LazyLock::new(|| {
            vec![
                StepDefinition::new(
                    "event",
                    "Event",
                    vec![
                        FieldDefinition::required("location", "Location", FieldType::Text),
                        FieldDefinition::required("witnessed", "Witnessed arrest", FieldType::Boolean),
                        FieldDefinition::required("event_start", "Event start", FieldType::Timestamp),
                        FieldDefinition::optional(
                            "downtime_minutes",
                            "Estimated downtime (min)",
                            FieldType::Number {
                                min: 0.0,
                                max: 240.0,
                            },
                        ),
                    ],
                ),
                StepDefinition::new(
                    "team",
                    "Team",
                    vec![FieldDefinition::required(
                        "team_roles",
                        "Team roles filled",
                        FieldType::TextList,
                    )],
                ),
                StepDefinition::new(
                    "interventions",
                    "Interventions",
                    vec![
                        FieldDefinition::required("cpr_started", "CPR started", FieldType::Boolean),
                        FieldDefinition::required(
                            "defibrillation_delivered",
                            "Defibrillation delivered",
                            FieldType::Boolean,
                        ),
                        FieldDefinition::optional(
                            "shocks_delivered",
                            "Shocks delivered",
                            FieldType::Number { min: 0.0, max: 50.0 },
                        ),
                        FieldDefinition::optional(
                            "airway_placed",
                            "Advanced airway placed",
                            FieldType::Boolean,
                        ),
                        FieldDefinition::optional(
                            "medications_given",
                            "Medications given",
                            FieldType::TextList,
                        ),
                    ],
                ),
                StepDefinition::new(
                    "outcome",
                    "Outcome",
                    vec![
                        FieldDefinition::required(
                            "outcome",
                            "Outcome",
                            FieldType::Choice {
                                options: vec![
                                    "rosc".to_string(),
                                    "transferred".to_string(),
                                    "deceased".to_string(),
                                ],
                            },
                        ),
                        FieldDefinition::optional("rosc_time", "ROSC time", FieldType::Timestamp),
                        FieldDefinition::optional("notes", "Notes", FieldType::Text),
                    ],
                ),
            ]
        });
        &STEPS
    }

    fn sbar(&self, fields: &FieldView, _scores: &ScoreSet) -> SbarSections {
        let mut situation = String::new();
        situation.push_str(&format!(
            "Code blue at {}, started {}.\n",
            fields.text_or_placeholder("location"),
            fields
                .timestamp("event_start")
                .map(|t| t.to_string())
                .unwrap_or_else(|| "Not documented".to_string()),
        ));
        labeled(&mut situation, "Witnessed", fields.yes_no("witnessed"));
        if fields.text("outcome") == Some("rosc") {
            critical(&mut situation, "ROSC ACHIEVED");
        }

        let mut background = String::new();
        labeled(
            &mut background,
            "Estimated downtime (min)",
            &fields.number_or_placeholder("downtime_minutes"),
        );
        labeled(
            &mut background,
            "Team roles filled",
            &list_or_placeholder(fields, "team_roles"),
        );

        let mut assessment = String::new();
        labeled(&mut assessment, "CPR started", fields.yes_no("cpr_started"));
        labeled(
            &mut assessment,
            "Defibrillation delivered",
            fields.yes_no("defibrillation_delivered"),
        );
        labeled(
            &mut assessment,
            "Shocks delivered",
            &fields.number_or_placeholder("shocks_delivered"),
        );
        labeled(&mut assessment, "Advanced airway", fields.yes_no("airway_placed"));
        labeled(
            &mut assessment,
            "Medications given",
            &list_or_placeholder(fields, "medications_given"),
        );

        let mut recommendation = String::new();
        labeled(&mut recommendation, "Outcome", fields.text_or_placeholder("outcome"));
        if let Some(rosc_time) = fields.timestamp("rosc_time") {
            labeled(&mut recommendation, "ROSC time", &rosc_time.to_string());
        }
        if let Some(notes) = fields.text("notes") {
            labeled(&mut recommendation, "Notes", notes);
        }

        SbarSections {
            situation,
            background,
            assessment,
            recommendation,
        }
    }
}
