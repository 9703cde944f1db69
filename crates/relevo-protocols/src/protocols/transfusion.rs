use std::sync::LazyLock;

use relevo_core::models::document::SbarSections;
use relevo_core::models::session::FieldView;
use relevo_scores::ScoreSet;

use crate::Protocol;
use crate::protocols::{critical, labeled};
use crate::steps::{FieldDefinition, FieldType, StepDefinition};

/// Blood product transfusion record: product verification, two-person
/// check, and reaction monitoring.
pub struct Transfusion;

impl Protocol for Transfusion {
    fn id(&self) -> &str {
        "transfusion"
    }

    fn name(&self) -> &str {
        "Transfusion Record"
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
                            "blood_type",
                            "Blood type",
                            FieldType::Choice {
                                options: [
                                    "a_pos", "a_neg", "b_pos", "b_neg", "ab_pos", "ab_neg",
                                    "o_pos", "o_neg",
                                ]
                                .iter()
                                .map(|s| s.to_string())
                                .collect(),
                            },
                        ),
                    ],
                ),
                StepDefinition::new(
                    "product",
                    "Blood product",
                    vec![
                        FieldDefinition::required(
                            "product_type",
                            "Product type",
                            FieldType::Choice {
                                options: vec![
                                    "prbc".to_string(),
                                    "ffp".to_string(),
                                    "platelets".to_string(),
                                    "cryoprecipitate".to_string(),
                                ],
                            },
                        ),
                        FieldDefinition::required("unit_number", "Unit number", FieldType::Text),
                        FieldDefinition::required(
                            "crossmatch_verified",
                            "Crossmatch verified",
                            FieldType::Boolean,
                        ),
                    ],
                ),
                StepDefinition::new(
                    "verification",
                    "Bedside verification",
                    vec![
                        FieldDefinition::required(
                            "consent_obtained",
                            "Consent obtained",
                            FieldType::Boolean,
                        ),
                        FieldDefinition::required(
                            "two_person_check",
                            "Two-person check completed",
                            FieldType::Boolean,
                        ),
                        FieldDefinition::required(
                            "baseline_vitals_recorded",
                            "Baseline vitals recorded",
                            FieldType::Boolean,
                        ),
                    ],
                ),
                StepDefinition::new(
                    "monitoring",
                    "Monitoring",
                    vec![
                        FieldDefinition::required(
                            "reaction_observed",
                            "Transfusion reaction observed",
                            FieldType::Boolean,
                        ),
                        FieldDefinition::optional(
                            "reaction_type",
                            "Reaction type",
                            FieldType::Choice {
                                options: vec![
                                    "febrile".to_string(),
                                    "allergic".to_string(),
                                    "hemolytic".to_string(),
                                    "taco".to_string(),
                                    "trali".to_string(),
                                ],
                            },
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
            "Transfusion of {} (unit {}) for {} (MRN {}).\n",
            fields.text_or_placeholder("product_type"),
            fields.text_or_placeholder("unit_number"),
            fields.text_or_placeholder("patient_name"),
            fields.text_or_placeholder("mrn"),
        ));
        if fields.boolean("reaction_observed") == Some(true) {
            critical(
                &mut situation,
                &format!(
                    "TRANSFUSION REACTION — {}",
                    fields.text_or_placeholder("reaction_type")
                ),
            );
        }

        let mut background = String::new();
        labeled(&mut background, "Blood type", fields.text_or_placeholder("blood_type"));
        labeled(
            &mut background,
            "Crossmatch verified",
            fields.yes_no("crossmatch_verified"),
        );

        let mut assessment = String::new();
        labeled(&mut assessment, "Consent obtained", fields.yes_no("consent_obtained"));
        labeled(
            &mut assessment,
            "Two-person check",
            fields.yes_no("two_person_check"),
        );
        labeled(
            &mut assessment,
            "Baseline vitals recorded",
            fields.yes_no("baseline_vitals_recorded"),
        );
        labeled(
            &mut assessment,
            "Reaction observed",
            fields.yes_no("reaction_observed"),
        );

        let mut recommendation = String::new();
        if fields.boolean("reaction_observed") == Some(true) {
            recommendation.push_str(
                "Stop transfusion, maintain IV access, notify provider and blood bank.\n",
            );
        } else {
            recommendation.push_str("Continue per protocol; monitor vitals per policy.\n");
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
