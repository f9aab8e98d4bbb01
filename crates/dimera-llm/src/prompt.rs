//! Prompt templates for narrative generation.

use crate::backend::ExplanationRequest;

/// A prompt template for narrative requests.
pub trait PromptTemplate {
    /// Generate the prompt text.
    fn render(&self) -> String;

    /// Get the system prompt (if any).
    fn system_prompt(&self) -> Option<String> {
        None
    }
}

/// Prompt asking for the mechanistic rationale behind one pair.
#[derive(Debug, Clone)]
pub struct MechanismPrompt {
    /// The narrative request to render.
    pub request: ExplanationRequest,
    /// Upper bound on narrative length, in sentences.
    pub max_sentences: usize,
}

impl MechanismPrompt {
    /// Create a new mechanism prompt.
    pub fn new(request: &ExplanationRequest) -> Self {
        Self {
            request: request.clone(),
            max_sentences: 4,
        }
    }

    /// Set the sentence budget.
    pub fn with_max_sentences(mut self, max: usize) -> Self {
        self.max_sentences = max;
        self
    }
}

impl PromptTemplate for MechanismPrompt {
    fn system_prompt(&self) -> Option<String> {
        Some(
            "You are a translational biologist explaining combination drug targets \
             to discovery scientists. Ground every claim in the pathway context you \
             are given. Respond with plain prose only, no headings, no lists."
                .to_string(),
        )
    }

    fn render(&self) -> String {
        let req = &self.request;
        let pathways = if req.pathways.is_empty() {
            "none identified".to_string()
        } else {
            req.pathways.join(", ")
        };

        format!(
            r#"Explain the mechanistic rationale for co-targeting {first} and {second} in {indication}.

Patient population: {population}
Clinical phenotype: {phenotype}
Targeting strategy: {strategy}
Implicated pathways: {pathways}

Write at most {max} sentences of plain text."#,
            first = req.pair.first(),
            second = req.pair.second(),
            indication = req.indication,
            population = req.patient_population,
            phenotype = req.clinical_phenotype,
            strategy = req.strategy,
            pathways = pathways,
            max = self.max_sentences,
        )
    }
}

/// Deterministic narrative used when no backend answer is available.
///
/// Always references the pair and the indication so a degraded
/// recommendation still reads as a complete record.
pub fn fallback_narrative(request: &ExplanationRequest) -> String {
    let pathway_note = match request.pathways.first() {
        Some(pathway) => format!(" through the {} axis", pathway),
        None => String::new(),
    };

    format!(
        "Co-targeting {} and {} is ranked as a {} candidate for {}{}. \
         A generated narrative was not available for this pair.",
        request.pair.first(),
        request.pair.second(),
        request.strategy,
        request.indication,
        pathway_note,
    )
}

/// Normalize raw model output into a bare narrative string.
///
/// Strips markdown code fences and surrounding quotes; models wrap short
/// answers in both more often than not.
pub fn tidy_narrative(text: &str) -> String {
    let text = text.trim();
    let text = match text.strip_prefix("```") {
        // Drop the fence line (and any language tag on it).
        Some(rest) => rest.split_once('\n').map(|(_, body)| body).unwrap_or(rest),
        None => text,
    };
    let text = text.strip_suffix("```").unwrap_or(text);
    let text = text.trim();
    let text = text.strip_prefix('"').unwrap_or(text);
    let text = text.strip_suffix('"').unwrap_or(text);
    text.trim().to_string()
}
