use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use swifthire::config::AppConfig;
use swifthire::workflows::recruitment::{
    Assistant, ConfiguredCompletion, InMemoryStore, PremiumTier, RecruitmentService,
};

pub(crate) type ApiService = RecruitmentService<InMemoryStore, ConfiguredCompletion>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Wires the recruitment service over a fresh in-memory store.
pub(crate) fn build_service(config: &AppConfig) -> Arc<ApiService> {
    let completion = Arc::new(ConfiguredCompletion::from_config(&config.assistant));
    let assistant = Assistant::new(completion, config.assistant.timeout);
    Arc::new(RecruitmentService::new(
        Arc::new(InMemoryStore::new()),
        assistant,
        config.limits,
    ))
}

pub(crate) fn parse_tier(value: &str) -> Result<PremiumTier, String> {
    if value.trim().eq_ignore_ascii_case("BASIC") {
        return Ok(PremiumTier::Basic);
    }
    PremiumTier::parse_paid(value)
        .ok_or_else(|| format!("unknown tier '{value}' (expected BASIC, PREMIUM or PRO)"))
}
