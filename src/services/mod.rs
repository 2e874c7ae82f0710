pub mod annotation;
pub mod answer_text;
pub mod classifier;
pub mod dataset;
pub mod extractor;
pub mod llm_service;
pub mod matcher;
pub mod reconciler;
pub mod settings_store;

pub use annotation::SummaryLine;
pub use classifier::classify;
pub use dataset::StaticDataset;
pub use extractor::{extract, extract_question};
pub use llm_service::LlmService;
pub use reconciler::{reconcile, ReconcileOutcome};
pub use settings_store::SettingsStore;
