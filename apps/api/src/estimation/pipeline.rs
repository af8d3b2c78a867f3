use serde_json::{Map, Value};
use tracing::{debug, error};

use crate::errors::AppError;
use crate::llm_client::TextGenerator;

use super::prompts::build_estimation_prompt;
use super::recovery::{recover_json_object, RecoveryError};
use super::schema::{validate_record, FieldSpec};

/// Everything one estimation endpoint contributes to the shared pipeline.
pub struct EstimationJob<'a> {
    pub task: &'static str,
    /// (label, value) seed pairs, already validated as non-blank.
    pub seeds: Vec<(&'static str, &'a str)>,
    pub fields: &'static [FieldSpec],
    pub models: &'static [&'static str],
    /// Korean catch-all returned when every model tier fails.
    pub failure_message: &'static str,
}

/// Runs the shared estimation pipeline: prompt build, model chain, JSON
/// recovery, field validation. Returns the normalized record that becomes
/// the response's `data` object.
pub async fn run_estimation(
    llm: &dyn TextGenerator,
    job: EstimationJob<'_>,
) -> Result<Map<String, Value>, AppError> {
    let prompt = build_estimation_prompt(job.task, &job.seeds, job.fields);

    let completion = llm
        .generate(&prompt, job.models)
        .await
        .map_err(|e| AppError::from_llm(e, job.failure_message))?;

    debug!("Completion received: {} chars", completion.len());

    let record = recover_json_object(&completion).map_err(|e| {
        error!("JSON recovery failed: {e}. Raw completion: {completion}");
        match e {
            RecoveryError::NoJsonObject => {
                AppError::Recovery("AI 응답 형식이 올바르지 않습니다.".to_string())
            }
            RecoveryError::Unparsable => {
                AppError::Recovery("AI 응답을 파싱할 수 없습니다.".to_string())
            }
        }
    })?;

    let normalized = validate_record(&record, job.fields).map_err(|e| {
        error!("Completion failed field validation: {e}");
        AppError::Recovery("AI 응답 데이터 형식이 올바르지 않습니다.".to_string())
    })?;

    Ok(normalized)
}
