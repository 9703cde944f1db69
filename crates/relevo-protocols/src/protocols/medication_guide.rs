use std::sync::LazyLock;

use relevo_core::models::document::SbarSections;
use relevo_core::models::session::FieldView;
use relevo_scores::ScoreSet;

use crate::Protocol;
use crate::protocols::{critical, labeled, list_or_placeholder};
use crate::steps::{FieldDefinition, FieldType, StepDefinition};

/// Medication administration guide: drug, safety screening, and patient
/// counseling points.
pub struct MedicationGuide;

impl Protocol for MedicationGuide {
    fn id(&self) -> &str {
        "medication_guide"
    }

    fn name(&self) -> &str {
        "Medication Guide"
    }

    fn version(&self) -> u32 {
        1
    }

    fn steps(&self) -> &[StepDefinition] {
        static STEPS: LazyLock<Vec<StepDefinition>> = LazyLock::new(|| {
            vec![
                StepDefinition::new(
                    "medication",
                    "Medication",
                    vec![
                        FieldDefinition::required("medication_name", "Medication", FieldType::Text),
                        FieldDefinition::required("dose", "Dose", FieldType::Text),
                        FieldDefinition::required(
                            "route",
                            "Route",
                            FieldType::Choice {
                                options: vec![
                                    "po".to_string(),
                                    "iv".to_string(),
                                    "im".to_string(),
                                    "subq".to_string(),
                                    "topical".to_string(),
                                    "inhaled".to_string(),
                                ],
                            },
                        ),
                        FieldDefinition::required("frequency", "Frequency", FieldType::Text),
                    ],
                ),
                StepDefinition::new(
                    "safety",
                    "Safety screening",
                    vec![
                        FieldDefinition::required(
                            "high_alert",
                            "High-alert medication",
                            FieldType::Boolean,
                        ),
                        FieldDefinition::optional(
                            "interactions",
                            "Known interactions",
                            FieldType::TextList,
                        ),
                        FieldDefinition::optional(
                            "contraindications",
                            "Contraindications",
                            FieldType::TextList,
                        ),
                        FieldDefinition::optional("allergies", "Allergies", FieldType::TextList),
                    ],
                ),
                StepDefinition::new(
                    "counseling",
                    "Patient counseling",
                    vec![
                        FieldDefinition::required(
                            "key_points",
                            "Key counseling points",
                            FieldType::Text,
                        ),
                        FieldDefinition::required(
                            "patient_verbalized_understanding",
                            "Patient verbalized understanding",
                            FieldType::Boolean,
                        ),
                    ],
                ),
            ]
        });
        &STEPS
    }

    fn sbar(&self, fields: &FieldView, _scores: &ScoreSet) -> SbarSections {
        let mut situation = String::new();
        situation.push_str(&format!(
            "Medication guide: {} {} {} {}.\n",
            fields.text_or_placeholder("medication_name"),
            fields.text_or_placeholder("dose"),
            fields.text_or_placeholder("route"),
            fields.text_or_placeholder("frequency"),
        ));
        if fields.boolean("high_alert") == Some(true) {
            critical(&mut situation, "HIGH-ALERT MEDICATION");
        }

        let mut background = String::new();
        labeled(
            &mut background,
            "Known interactions",
            &list_or_placeholder(fields, "interactions"),
        );
        labeled(
            &mut background,
            "Contraindications",
            &list_or_placeholder(fields, "contraindications"),
        );
        labeled(
            &mut background,
            "Allergies",
            &fields.allergies("allergies").display_line(),
        );

        let mut assessment = String::new();
        labeled(
            &mut assessment,
            "Key counseling points",
            fields.text_or_placeholder("key_points"),
        );

        let mut recommendation = String::new();
        labeled(
            &mut recommendation,
            "Patient verbalized understanding",
            fields.yes_no("patient_verbalized_understanding"),
        );

        SbarSections {
            situation,
            background,
            assessment,
            recommendation,
        }
    }
}
