use serde::Deserialize;
use serde_json::{Value, json};

use crate::analysis::AnalysisError;
use crate::inference::InferenceBackend;

/// Sampling parameters for an instruction-tuned generative model.
#[derive(Debug, Clone, Copy)]
pub struct GenerationParams {
    pub max_new_tokens: u32,
    pub temperature: f32,
    pub top_p: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct GeneratedText {
    generated_text: String,
}

/// Wraps `instruction` in the `[INST]` chat template the generative model expects.
pub fn instruction_prompt(instruction: &str) -> String {
    format!("<s>[INST] {} [/INST]</s>", instruction.trim())
}

pub(crate) fn payload(prompt: &str, params: GenerationParams) -> Value {
    let mut parameters = json!({
        "max_new_tokens": params.max_new_tokens,
        "temperature": params.temperature,
        "return_full_text": false,
    });
    if let Some(top_p) = params.top_p {
        parameters["top_p"] = json!(top_p);
    }

    json!({ "inputs": prompt, "parameters": parameters })
}

/// Runs one generation and returns the text of the first candidate.
pub async fn generate(
    backend: &dyn InferenceBackend,
    model: &str,
    prompt: &str,
    params: GenerationParams,
) -> Result<String, AnalysisError> {
    let response = backend.call(model, payload(prompt, params)).await?;
    first_generated_text(response)
}

fn first_generated_text(response: Value) -> Result<String, AnalysisError> {
    let candidates: Vec<GeneratedText> = serde_json::from_value(response.clone())
        .map_err(|_| AnalysisError::Parse(format!("expected generated_text list, got {response}")))?;

    candidates
        .into_iter()
        .next()
        .map(|candidate| candidate.generated_text)
        .ok_or_else(|| AnalysisError::Parse("empty generation list".to_string()))
}
