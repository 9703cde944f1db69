use std::collections::BTreeMap;
use std::sync::LazyLock;

use jiff::Timestamp;
use relevo_core::models::document::SbarSections;
use relevo_core::models::session::FieldView;
use relevo_scores::stroke::{
    CincinnatiInput, NIHSS_ITEMS, TpaInput, cincinnati, nihss, tpa_window,
};
use relevo_scores::{ComputationError, ScoreKind, ScoreResult, ScoreSet};

use crate::Protocol;
use crate::protocols::{critical, labeled, list_or_placeholder, score_line};
use crate::steps::{FieldDefinition, FieldType, StepDefinition};

/// Acute stroke assessment: Cincinnati prehospital screen, full NIHSS exam,
/// and the thrombolysis time window.
pub struct Stroke;

impl Protocol for Stroke {
    fn id(&self) -> &str {
        "stroke"
    }

    fn name(&self) -> &str {
        "Acute Stroke Assessment"
    }

    fn version(&self) -> u32 {
        1
    }

    fn steps(&self) -> &[StepDefinition] {
        static STEPS: LazyLock<Vec<StepDefinition>> = LazyLock::new(|| {
            // The NIHSS step is generated from the score's own item table so
            // the exam fields can never drift from the calculator.
            let nihss_fields: Vec<FieldDefinition> = NIHSS_ITEMS
                .iter()
                .map(|&(id, name, max)| {
                    FieldDefinition::required(
                        &format!("nihss_{id}"),
                        name,
                        FieldType::Number { min: 0.0, max },
                    )
                })
                .collect();

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
                    "onset",
                    "Symptom onset",
                    vec![
                        FieldDefinition::optional(
                            "last_known_well",
                            "Last known well",
                            FieldType::Timestamp,
                        ),
                        FieldDefinition::optional(
                            "contraindications",
                            "Thrombolysis contraindications",
                            FieldType::TextList,
                        ),
                    ],
                ),
                StepDefinition::new(
                    "cincinnati",
                    "Cincinnati stroke scale",
                    vec![
                        FieldDefinition::required("facial_droop", "Facial droop", FieldType::Boolean),
                        FieldDefinition::required("arm_drift", "Arm drift", FieldType::Boolean),
                        FieldDefinition::required(
                            "abnormal_speech",
                            "Abnormal speech",
                            FieldType::Boolean,
                        ),
                    ],
                ),
                StepDefinition::new("nihss", "NIHSS exam", nihss_fields),
                StepDefinition::new(
                    "plan",
                    "Plan",
                    vec![
                        FieldDefinition::required(
                            "ct_completed",
                            "Non-contrast CT completed",
                            FieldType::Boolean,
                        ),
                        FieldDefinition::required(
                            "disposition",
                            "Disposition",
                            FieldType::Choice {
                                options: vec![
                                    "stroke_unit".to_string(),
                                    "icu".to_string(),
                                    "transfer".to_string(),
                                    "ed_observation".to_string(),
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
        &[ScoreKind::Cincinnati, ScoreKind::Nihss, ScoreKind::TpaWindow]
    }

    fn compute_scores(
        &self,
        fields: &FieldView,
        now: Timestamp,
    ) -> Vec<Result<ScoreResult, ComputationError>> {
        let cincinnati_input = CincinnatiInput {
            facial_droop: fields.boolean("facial_droop"),
            arm_drift: fields.boolean("arm_drift"),
            abnormal_speech: fields.boolean("abnormal_speech"),
        };

        let nihss_items: BTreeMap<String, f64> = NIHSS_ITEMS
            .iter()
            .filter_map(|&(id, _, _)| {
                fields
                    .number(&format!("nihss_{id}"))
                    .map(|value| (id.to_string(), value))
            })
            .collect();

        let tpa_input = TpaInput {
            last_known_well: fields.timestamp("last_known_well"),
            contraindications: fields.list("contraindications").unwrap_or_default(),
        };

        vec![
            cincinnati(&cincinnati_input),
            nihss(&nihss_items),
            tpa_window(&tpa_input, now),
        ]
    }

    fn sbar(&self, fields: &FieldView, scores: &ScoreSet) -> SbarSections {
        let mut situation = String::new();
        situation.push_str(&format!(
            "Acute stroke assessment for {} (MRN {}).\n",
            fields.text_or_placeholder("patient_name"),
            fields.text_or_placeholder("mrn"),
        ));
        if scores
            .get(ScoreKind::Cincinnati)
            .is_some_and(|c| c.flag("stroke_suspected"))
        {
            critical(&mut situation, "CINCINNATI STROKE SCALE POSITIVE");
        }

        let mut background = String::new();
        let last_known_well = fields
            .timestamp("last_known_well")
            .map(|t| t.to_string())
            .unwrap_or_else(|| "Unknown".to_string());
        labeled(&mut background, "Last known well", &last_known_well);
        labeled(
            &mut background,
            "Thrombolysis contraindications",
            &list_or_placeholder(fields, "contraindications"),
        );

        let mut assessment = String::new();
        score_line(&mut assessment, scores, ScoreKind::Nihss, |n| {
            format!("NIHSS: {} ({} stroke severity)\n", n.raw_value, n.risk_band.label())
        });
        score_line(&mut assessment, scores, ScoreKind::TpaWindow, |t| {
            format!("tPA window: {}\n", t.risk_band.label())
        });
        if let Some(tpa) = scores.get(ScoreKind::TpaWindow) {
            if tpa.flag("eligible") {
                critical(
                    &mut assessment,
                    &format!("tPA CANDIDATE — {}", tpa.risk_band.label()),
                );
            } else {
                labeled(&mut assessment, "tPA eligibility", "Not eligible");
            }
        }

        let mut recommendation = String::new();
        labeled(&mut recommendation, "CT completed", fields.yes_no("ct_completed"));
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
