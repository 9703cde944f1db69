use std::sync::LazyLock;

use jiff::Timestamp;
use relevo_core::models::document::SbarSections;
use relevo_core::models::session::FieldView;
use relevo_scores::cardiac::{HeartInput, heart, mace_estimate};
use relevo_scores::{ComputationError, ScoreKind, ScoreResult, ScoreSet};

use crate::Protocol;
use crate::protocols::{critical, labeled, list_or_placeholder, score_line};
use crate::steps::{FieldDefinition, FieldType, StepDefinition};

/// Chest pain assessment with HEART risk stratification and STEMI flagging.
pub struct Cardiac;

fn subscore(id: &str, label: &str) -> FieldDefinition {
    FieldDefinition::required(id, label, FieldType::Number { min: 0.0, max: 2.0 })
}

impl Protocol for Cardiac {
    fn id(&self) -> &str {
        "cardiac"
    }

    fn name(&self) -> &str {
        "Cardiac Chest Pain Assessment"
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
                        FieldDefinition::optional(
                            "age",
                            "Age",
                            FieldType::Number {
                                min: 0.0,
                                max: 130.0,
                            },
                        ),
                    ],
                ),
                StepDefinition::new(
                    "presentation",
                    "Presentation",
                    vec![
                        FieldDefinition::required(
                            "chest_pain_description",
                            "Chest pain description",
                            FieldType::Text,
                        ),
                        FieldDefinition::optional("pain_onset", "Pain onset", FieldType::Timestamp),
                        FieldDefinition::optional("radiation", "Radiation", FieldType::Boolean),
                        FieldDefinition::optional(
                            "associated_symptoms",
                            "Associated symptoms",
                            FieldType::TextList,
                        ),
                    ],
                ),
                StepDefinition::new(
                    "heart_score",
                    "HEART score",
                    vec![
                        subscore("heart_history", "History subscore"),
                        subscore("heart_ecg", "ECG subscore"),
                        subscore("heart_age", "Age subscore"),
                        subscore("heart_risk_factors", "Risk factors subscore"),
                        subscore("heart_troponin", "Troponin subscore"),
                        FieldDefinition::required(
                            "stemi_criteria",
                            "STEMI criteria on ECG",
                            FieldType::Boolean,
                        ),
                    ],
                ),
                StepDefinition::new(
                    "history",
                    "History",
                    vec![
                        FieldDefinition::optional("allergies", "Allergies", FieldType::TextList),
                        FieldDefinition::optional(
                            "cardiac_history",
                            "Cardiac history",
                            FieldType::TextList,
                        ),
                        FieldDefinition::optional(
                            "current_medications",
                            "Current medications",
                            FieldType::TextList,
                        ),
                    ],
                ),
                StepDefinition::new(
                    "plan",
                    "Plan",
                    vec![
                        FieldDefinition::required(
                            "disposition",
                            "Disposition",
                            FieldType::Choice {
                                options: vec![
                                    "cath_lab".to_string(),
                                    "ccu".to_string(),
                                    "telemetry".to_string(),
                                    "ed_observation".to_string(),
                                    "discharge".to_string(),
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

    fn score_kinds(&self) -> &[ScoreKind] {
        &[ScoreKind::Heart]
    }

    fn compute_scores(
        &self,
        fields: &FieldView,
        _now: Timestamp,
    ) -> Vec<Result<ScoreResult, ComputationError>> {
        let input = HeartInput {
            history: fields.number("heart_history"),
            ecg: fields.number("heart_ecg"),
            age: fields.number("heart_age"),
            risk_factors: fields.number("heart_risk_factors"),
            troponin: fields.number("heart_troponin"),
        };
        vec![heart(&input)]
    }

    fn sbar(&self, fields: &FieldView, scores: &ScoreSet) -> SbarSections {
        let mut situation = String::new();
        situation.push_str(&format!(
            "Chest pain assessment for {} (MRN {}).\n",
            fields.text_or_placeholder("patient_name"),
            fields.text_or_placeholder("mrn"),
        ));
        labeled(
            &mut situation,
            "Presentation",
            fields.text_or_placeholder("chest_pain_description"),
        );
        if fields.boolean("stemi_criteria") == Some(true) {
            critical(&mut situation, "STEMI CRITERIA MET — ACTIVATE CATH LAB");
        }

        let mut background = String::new();
        labeled(
            &mut background,
            "Cardiac history",
            &list_or_placeholder(fields, "cardiac_history"),
        );
        labeled(
            &mut background,
            "Current medications",
            &list_or_placeholder(fields, "current_medications"),
        );
        labeled(
            &mut background,
            "Allergies",
            &fields.allergies("allergies").display_line(),
        );

        let mut assessment = String::new();
        score_line(&mut assessment, scores, ScoreKind::Heart, |h| {
            format!(
                "HEART Score: {}/10 ({} risk, {})\n",
                h.raw_value,
                h.risk_band.label(),
                mace_estimate(h.risk_band),
            )
        });
        labeled(
            &mut assessment,
            "Associated symptoms",
            &list_or_placeholder(fields, "associated_symptoms"),
        );

        let mut recommendation = String::new();
        labeled(
            &mut recommendation,
            "Recommended disposition",
            fields.text_or_placeholder("disposition"),
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
