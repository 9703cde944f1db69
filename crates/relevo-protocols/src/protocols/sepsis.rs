use std::sync::LazyLock;

use jiff::Timestamp;
use relevo_core::models::document::SbarSections;
use relevo_core::models::session::FieldView;
use relevo_scores::sepsis::{QsofaInput, SirsInput, qsofa, sirs};
use relevo_scores::{ComputationError, ScoreKind, ScoreResult, ScoreSet};

use crate::Protocol;
use crate::protocols::{critical, labeled, list_or_placeholder, score_line};
use crate::steps::{FieldDefinition, FieldType, StepDefinition};

/// Sepsis screening assessment: vitals-driven qSOFA and SIRS screens plus
/// the three-item bundle status (lactate, cultures, antibiotics).
pub struct Sepsis;

impl Protocol for Sepsis {
    fn id(&self) -> &str {
        "sepsis"
    }

    fn name(&self) -> &str {
        "Sepsis Screening"
    }

    fn version(&self) -> u32 {
        2
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
                        FieldDefinition::optional("location", "Location", FieldType::Text),
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
                    "vitals",
                    "Vital signs",
                    vec![
                        FieldDefinition::required(
                            "temperature_c",
                            "Temperature (°C)",
                            FieldType::Number {
                                min: 30.0,
                                max: 43.0,
                            },
                        ),
                        FieldDefinition::required(
                            "heart_rate",
                            "Heart rate (bpm)",
                            FieldType::Number {
                                min: 20.0,
                                max: 250.0,
                            },
                        ),
                        FieldDefinition::required(
                            "respiratory_rate",
                            "Respiratory rate (/min)",
                            FieldType::Number { min: 4.0, max: 80.0 },
                        ),
                        FieldDefinition::required(
                            "systolic_bp",
                            "Systolic BP (mmHg)",
                            FieldType::Number {
                                min: 40.0,
                                max: 300.0,
                            },
                        ),
                        FieldDefinition::required(
                            "altered_mentation",
                            "Altered mentation",
                            FieldType::Boolean,
                        ),
                        FieldDefinition::optional(
                            "wbc_count",
                            "WBC count (cells/mm³)",
                            FieldType::Number {
                                min: 100.0,
                                max: 200_000.0,
                            },
                        ),
                        FieldDefinition::optional(
                            "bands_percent",
                            "Bands (%)",
                            FieldType::Number {
                                min: 0.0,
                                max: 100.0,
                            },
                        ),
                    ],
                ),
                StepDefinition::new(
                    "history",
                    "History",
                    vec![
                        FieldDefinition::required(
                            "suspected_source",
                            "Suspected source",
                            FieldType::Choice {
                                options: vec![
                                    "urinary".to_string(),
                                    "respiratory".to_string(),
                                    "abdominal".to_string(),
                                    "skin_soft_tissue".to_string(),
                                    "cns".to_string(),
                                    "unknown".to_string(),
                                ],
                            },
                        ),
                        FieldDefinition::optional("allergies", "Allergies", FieldType::TextList),
                        FieldDefinition::optional(
                            "comorbidities",
                            "Comorbidities",
                            FieldType::TextList,
                        ),
                    ],
                ),
                StepDefinition::new(
                    "interventions",
                    "Sepsis bundle",
                    vec![
                        FieldDefinition::required("lactate_drawn", "Lactate drawn", FieldType::Boolean),
                        FieldDefinition::required(
                            "blood_cultures_drawn",
                            "Blood cultures drawn",
                            FieldType::Boolean,
                        ),
                        FieldDefinition::required(
                            "antibiotics_started",
                            "Antibiotics started",
                            FieldType::Boolean,
                        ),
                        FieldDefinition::optional(
                            "fluids_started",
                            "IV fluids started",
                            FieldType::Boolean,
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
                                    "icu".to_string(),
                                    "step_down".to_string(),
                                    "ward".to_string(),
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
        &[ScoreKind::Qsofa, ScoreKind::Sirs]
    }

    fn compute_scores(
        &self,
        fields: &FieldView,
        _now: Timestamp,
    ) -> Vec<Result<ScoreResult, ComputationError>> {
        let qsofa_input = QsofaInput {
            respiratory_rate: fields.number("respiratory_rate"),
            altered_mentation: fields.boolean("altered_mentation"),
            systolic_bp: fields.number("systolic_bp"),
        };
        let sirs_input = SirsInput {
            temperature_c: fields.number("temperature_c"),
            heart_rate: fields.number("heart_rate"),
            respiratory_rate: fields.number("respiratory_rate"),
            wbc_count: fields.number("wbc_count"),
            bands_percent: fields.number("bands_percent"),
        };
        vec![qsofa(&qsofa_input), sirs(&sirs_input)]
    }

    fn sbar(&self, fields: &FieldView, scores: &ScoreSet) -> SbarSections {
        let mut situation = String::new();
        situation.push_str(&format!(
            "Sepsis screen for {} (MRN {}), location: {}.\n",
            fields.text_or_placeholder("patient_name"),
            fields.text_or_placeholder("mrn"),
            fields.text_or_placeholder("location"),
        ));
        if scores
            .get(ScoreKind::Qsofa)
            .is_some_and(|q| q.flag("sepsis_alert"))
        {
            critical(&mut situation, "SEPSIS ALERT — qSOFA >= 2");
        }

        let mut background = String::new();
        labeled(
            &mut background,
            "Suspected source",
            fields.text_or_placeholder("suspected_source"),
        );
        labeled(
            &mut background,
            "Comorbidities",
            &list_or_placeholder(fields, "comorbidities"),
        );
        labeled(
            &mut background,
            "Allergies",
            &fields.allergies("allergies").display_line(),
        );

        let mut assessment = String::new();
        labeled(
            &mut assessment,
            "Temperature",
            &format!("{} °C", fields.number_or_placeholder("temperature_c")),
        );
        labeled(
            &mut assessment,
            "Heart rate",
            &fields.number_or_placeholder("heart_rate"),
        );
        labeled(
            &mut assessment,
            "Respiratory rate",
            &fields.number_or_placeholder("respiratory_rate"),
        );
        labeled(
            &mut assessment,
            "Systolic BP",
            &fields.number_or_placeholder("systolic_bp"),
        );
        score_line(&mut assessment, scores, ScoreKind::Qsofa, |q| {
            format!(
                "qSOFA Score: {}/3 ({} RISK)\n",
                q.raw_value,
                q.risk_band.label().to_uppercase()
            )
        });
        score_line(&mut assessment, scores, ScoreKind::Sirs, |s| {
            format!("SIRS Criteria: {}/4 ({})\n", s.raw_value, s.risk_band.label())
        });

        let mut recommendation = String::new();
        labeled(
            &mut recommendation,
            "Recommended disposition",
            fields.text_or_placeholder("disposition"),
        );
        labeled(&mut recommendation, "Lactate drawn", fields.yes_no("lactate_drawn"));
        labeled(
            &mut recommendation,
            "Blood cultures drawn",
            fields.yes_no("blood_cultures_drawn"),
        );
        labeled(
            &mut recommendation,
            "Antibiotics started",
            fields.yes_no("antibiotics_started"),
        );
        let bundle_incomplete = ["lactate_drawn", "blood_cultures_drawn", "antibiotics_started"]
            .iter()
            .any(|field| fields.boolean(field) == Some(false));
        if bundle_incomplete {
            critical(&mut recommendation, "SEPSIS BUNDLE INCOMPLETE");
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
