use super::client::{CompletionClient, CompletionRequest};
use super::parser::{parse_analysis, parse_prediction};
use super::prompt::{
    build_report_prompt, build_symptom_prompt, REPORT_SYSTEM_PROMPT, SYMPTOM_SYSTEM_PROMPT,
};
use super::UpstreamError;
use crate::engine::strategy::Predictor;
use crate::engine::types::{AnalysisResult, PredictionResult, ReportQuery, SymptomQuery};

const TEMPERATURE: f32 = 0.2;
const SYMPTOM_MAX_TOKENS: u32 = 1000;
const REPORT_MAX_TOKENS: u32 = 1500;

/// Hosted-model strategy: prompt, complete once, parse, validate.
pub struct RemoteModel<C: CompletionClient> {
    client: C,
    tag: String,
}

impl<C: CompletionClient> RemoteModel<C> {
    pub fn new(client: C, tag: &str) -> Self {
        Self {
            client,
            tag: tag.to_string(),
        }
    }
}

impl<C: CompletionClient> Predictor for RemoteModel<C> {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn predict(&self, query: &SymptomQuery) -> Result<PredictionResult, UpstreamError> {
        let prompt = build_symptom_prompt(query);
        tracing::info!(model = self.client.model(), "Requesting remote symptom analysis");
        let text = self.client.complete(&CompletionRequest {
            system: SYMPTOM_SYSTEM_PROMPT,
            prompt: &prompt,
            temperature: TEMPERATURE,
            max_tokens: SYMPTOM_MAX_TOKENS,
        })?;
        parse_prediction(&text)
    }

    fn analyze(&self, query: &ReportQuery) -> Result<AnalysisResult, UpstreamError> {
        let prompt = build_report_prompt(query);
        tracing::info!(model = self.client.model(), "Requesting remote report analysis");
        let text = self.client.complete(&CompletionRequest {
            system: REPORT_SYSTEM_PROMPT,
            prompt: &prompt,
            temperature: TEMPERATURE,
            max_tokens: REPORT_MAX_TOKENS,
        })?;
        parse_analysis(&text)
    }
}
