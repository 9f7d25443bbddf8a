use dcm_advisor::config::{AppConfig, EngineSettings};
use dcm_advisor::error::AppError;
use dcm_advisor::telemetry::{self, LogSink};
use dcm_advisor::workflows::myelopathy::{AssessmentEngine, FallbackPolicy};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) engine: Arc<AssessmentEngine>,
    pub(crate) fallback_policy: FallbackPolicy,
}

impl AppState {
    pub(crate) fn new(
        engine: AssessmentEngine,
        fallback_policy: FallbackPolicy,
        metrics: PrometheusHandle,
    ) -> Self {
        Self {
            readiness: Arc::new(AtomicBool::new(false)),
            metrics: Arc::new(metrics),
            engine: Arc::new(engine),
            fallback_policy,
        }
    }
}

/// `--strict` on the command line wins over `DCM_FALLBACK_POLICY`.
pub(crate) fn effective_policy(settings: &EngineSettings, strict: bool) -> FallbackPolicy {
    if strict {
        FallbackPolicy::Strict
    } else {
        settings.fallback_policy
    }
}

/// Config, stderr logging and the engine for one-shot commands; stdout stays
/// free for reports.
pub(crate) fn prepare_command(strict: bool) -> Result<(AssessmentEngine, FallbackPolicy), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry, LogSink::Stderr)?;
    let engine = config.engine.build_engine()?;
    Ok((engine, effective_policy(&config.engine, strict)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_flag_overrides_configured_policy() {
        let settings = EngineSettings::default();
        assert_eq!(effective_policy(&settings, false), FallbackPolicy::Lenient);
        assert_eq!(effective_policy(&settings, true), FallbackPolicy::Strict);

        let strict = EngineSettings {
            fallback_policy: FallbackPolicy::Strict,
            ..EngineSettings::default()
        };
        assert_eq!(effective_policy(&strict, false), FallbackPolicy::Strict);
    }
}
