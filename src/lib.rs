pub mod analyzer;
pub mod config;
pub mod domain_utils;
pub mod features;
pub mod history;
pub mod normalization;
pub mod parser;
pub mod scoring;

pub use analyzer::{analyze_url, AnalysisResult, UrlAnalyzer, UrlDetails};
pub use config::Config;
pub use features::{Detector, UrlFeatures};
pub use history::{HistoryFilter, HistoryStore, HistorySummary, JsonFileHistory, MemoryHistory};
pub use scoring::{RiskScorer, ThreatLevel};
