use metrics_exporter_prometheus::PrometheusHandle;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use trolley_ai::config::DecisionConfig;
use trolley_ai::dilemma::{
    ClassifierHandle, ComparisonOrchestrator, DecisionEngine, InMemoryAgreementLedger, ModelSource,
};
use trolley_ai::error::AppError;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type Orchestrator = ComparisonOrchestrator<InMemoryAgreementLedger>;

/// Classifier slot for the configured model; nothing is read until the first `ml` decision.
pub(crate) fn classifier_handle(config: &DecisionConfig) -> Arc<ClassifierHandle> {
    let source = match &config.model_path {
        Some(path) => ModelSource::File(path.clone()),
        None => ModelSource::Missing,
    };
    Arc::new(ClassifierHandle::new(source))
}

pub(crate) fn build_engine(config: &DecisionConfig) -> Arc<DecisionEngine> {
    Arc::new(DecisionEngine::new(classifier_handle(config)))
}

pub(crate) fn build_orchestrator(config: &DecisionConfig) -> Arc<Orchestrator> {
    let ledger = Arc::new(InMemoryAgreementLedger::new());
    Arc::new(
        ComparisonOrchestrator::new(build_engine(config), ledger)
            .with_default_variant(config.default_deon_variant.clone()),
    )
}

pub(crate) fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let file = File::open(path)?;
    let value = serde_json::from_reader(BufReader::new(file))?;
    Ok(value)
}
