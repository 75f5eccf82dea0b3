//! Shared test fixtures.

#![allow(dead_code)]

use crate::core::explain::{
    ConceptGraph, ConceptLink, ConceptNode, ExplanationData, ExplanationStep, QuizQuestion,
    StatPoint,
};

/// A small but fully populated explanation payload.
pub fn sample_explanation() -> ExplanationData {
    ExplanationData {
        topic: "Photosynthesis".to_string(),
        summary: "How plants turn light into chemical energy.".to_string(),
        steps: vec![
            ExplanationStep {
                title: "Capture light".to_string(),
                description: "Chlorophyll absorbs photons in the leaf.".to_string(),
                icon: "☀️".to_string(),
            },
            ExplanationStep {
                title: "Split water".to_string(),
                description: "Light energy splits H2O into oxygen and protons.".to_string(),
                icon: "💧".to_string(),
            },
        ],
        svg_diagram: "<svg viewBox=\"0 0 800 600\"><circle cx=\"400\" cy=\"300\" r=\"50\"/></svg>"
            .to_string(),
        concept_graph: ConceptGraph {
            nodes: vec![
                ConceptNode {
                    id: "light".to_string(),
                    group: 0,
                },
                ConceptNode {
                    id: "chlorophyll".to_string(),
                    group: 1,
                },
            ],
            links: vec![ConceptLink {
                source: "light".to_string(),
                target: "chlorophyll".to_string(),
                value: 3,
            }],
        },
        quiz: vec![QuizQuestion {
            question: "What gas do plants release?".to_string(),
            options: vec!["CO2".to_string(), "O2".to_string(), "N2".to_string()],
            correct_option_index: 1,
        }],
        related_stats: vec![
            StatPoint {
                label: "Efficiency %".to_string(),
                value: 6.0,
            },
            StatPoint {
                label: "Land coverage %".to_string(),
                value: 31.0,
            },
        ],
    }
}

/// The sample payload as the JSON text Gemini would return.
pub fn sample_explanation_json() -> String {
    serde_json::to_string(&sample_explanation()).unwrap()
}
