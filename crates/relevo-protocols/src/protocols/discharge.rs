use std::sync::LazyLock;

use relevo_core::models::document::SbarSections;
use relevo_core::models::session::FieldView;
use relevo_scores::ScoreSet;

use crate::Protocol;
use crate::protocols::{critical, labeled, list_or_placeholder};
use crate::steps::{FieldDefinition, FieldType, StepDefinition};

/// Discharge handoff: destination, medication reconciliation, and teach-back
/// education.
pub struct Discharge;

impl Protocol for Discharge {
    fn id(&self) -> &str {
        "discharge"
    }

    fn name(&self) -> &str {
        "Discharge Summary"
    }

    fn version(&self) -> u32 {
        1
    }

    fn steps(&self) -> &[StepDefinition] {
        static STEPS: LazyLock<Vec<StepDefinition>> = LazyLock::new(|| {
            vec![
                StepDefinition::new(
                    "patient",
                    "Patient identification",
                    vec![
                        FieldDefinition::required("patient_name", "Patient name", FieldType::Text),
                        FieldDefinition::required("mrn", "Medical record number", FieldType::Text),
                        FieldDefinition::required(
                            "destination",
                            "Discharge destination",
                            FieldType::Choice {
                                options: vec![
                                    "home".to_string(),
                                    "home_with_services".to_string(),
                                    "snf".to_string(),
                                    "rehab".to_string(),
                                    "ama".to_string(),
                                ],
                            },
                        ),
                    ],
                ),
                StepDefinition::new(
                    "medications",
                    "Medications",
                    vec![
                        FieldDefinition::required(
                            "medications_reconciled",
                            "Medications reconciled",
                            FieldType::Boolean,
                        ),
                        FieldDefinition::optional(
                            "discharge_medications",
                            "Discharge medications",
                            FieldType::TextList,
                        ),
                        FieldDefinition::optional("allergies", "Allergies", FieldType::TextList),
                    ],
                ),
                StepDefinition::new(
                    "education",
                    "Education",
                    vec![
                        FieldDefinition::required(
                            "instructions_provided",
                            "Instructions provided",
                            FieldType::Text,
                        ),
                        FieldDefinition::required(
                            "teach_back_completed",
                            "Teach-back completed",
                            FieldType::Boolean,
                        ),
                        FieldDefinition::optional(
                            "follow_up_appointment",
                            "Follow-up appointment",
                            FieldType::Text,
                        ),
                    ],
                ),
                StepDefinition::new(
                    "logistics",
                    "Logistics",
                    vec![
                        FieldDefinition::optional(
                            "transport_arranged",
                            "Transport arranged",
                            FieldType::Boolean,
                        ),
                        FieldDefinition::optional(
                            "equipment_needed",
                            "Equipment needed",
                            FieldType::TextList,
                        ),
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
            "Discharge of {} (MRN {}) to {}.\n",
            fields.text_or_placeholder("patient_name"),
            fields.text_or_placeholder("mrn"),
            fields.text_or_placeholder("destination"),
        ));
        if fields.text("destination") == Some("ama") {
            critical(&mut situation, "DISCHARGE AGAINST MEDICAL ADVICE");
        }

        let mut background = String::new();
        labeled(
            &mut background,
            "Medications reconciled",
            fields.yes_no("medications_reconciled"),
        );
        labeled(
            &mut background,
            "Discharge medications",
            &list_or_placeholder(fields, "discharge_medications"),
        );
        labeled(
            &mut background,
            "Allergies",
            &fields.allergies("allergies").display_line(),
        );

        let mut assessment = String::new();
        labeled(
            &mut assessment,
            "Instructions provided",
            fields.text_or_placeholder("instructions_provided"),
        );
        labeled(
            &mut assessment,
            "Teach-back completed",
            fields.yes_no("teach_back_completed"),
        );

        let mut recommendation = String::new();
        labeled(
            &mut recommendation,
            "Follow-up",
            fields.text_or_placeholder("follow_up_appointment"),
        );
        labeled(
            &mut recommendation,
            "Transport arranged",
            fields.yes_no("transport_arranged"),
        );
        labeled(
            &mut recommendation,
            "Equipment needed",
            &list_or_placeholder(fields, "equipment_needed"),
        );
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
