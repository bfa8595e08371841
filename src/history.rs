use crate::analyzer::AnalysisResult;
use crate::scoring::ThreatLevel;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

/// Entries kept per store unless configured otherwise
pub const DEFAULT_MAX_ENTRIES: usize = 50;

/// Storage for past analysis results, newest first.
///
/// The analyzer never touches a store; callers decide what to record.
pub trait HistoryStore {
    /// Record a result, evicting the oldest entries past the cap
    fn append(&mut self, result: AnalysisResult) -> Result<()>;
    /// All retained results, newest first
    fn list(&self) -> Result<Vec<AnalysisResult>>;
    fn clear(&mut self) -> Result<()>;
}

fn effective_cap(max_entries: usize) -> usize {
    if max_entries == 0 {
        DEFAULT_MAX_ENTRIES
    } else {
        max_entries
    }
}

pub struct MemoryHistory {
    entries: VecDeque<AnalysisResult>,
    max_entries: usize,
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }
}

impl MemoryHistory {
    pub fn new(max_entries: usize) -> Self {
        let max_entries = effective_cap(max_entries);
        Self {
            entries: VecDeque::with_capacity(max_entries),
            max_entries,
        }
    }

    fn from_entries(entries: Vec<AnalysisResult>, max_entries: usize) -> Self {
        let mut history = Self::new(max_entries);
        history.entries = entries.into_iter().take(history.max_entries).collect();
        history
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl HistoryStore for MemoryHistory {
    fn append(&mut self, result: AnalysisResult) -> Result<()> {
        self.entries.push_front(result);
        self.entries.truncate(self.max_entries);
        Ok(())
    }

    fn list(&self) -> Result<Vec<AnalysisResult>> {
        Ok(self.entries.iter().cloned().collect())
    }

    fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        Ok(())
    }
}

/// History persisted as a JSON array, rewritten on every change.
pub struct JsonFileHistory {
    path: PathBuf,
    inner: MemoryHistory,
}

impl JsonFileHistory {
    /// Opens the store. A missing file is an empty history.
    pub fn open<P: AsRef<Path>>(path: P, max_entries: usize) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let entries = if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read history file: {}", path.display()))?;
            if content.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str(&content).with_context(|| {
                    format!("Failed to parse history file: {}", path.display())
                })?
            }
        } else {
            Vec::new()
        };

        log::debug!(
            "Opened history {} with {} entries",
            path.display(),
            entries.len()
        );

        Ok(Self {
            path,
            inner: MemoryHistory::from_entries(entries, max_entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create history directory: {}", parent.display())
                })?;
            }
        }

        let content = serde_json::to_string_pretty(&self.inner.list()?)?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write history file: {}", self.path.display()))?;
        Ok(())
    }
}

impl HistoryStore for JsonFileHistory {
    fn append(&mut self, result: AnalysisResult) -> Result<()> {
        self.inner.append(result)?;
        self.flush()
    }

    fn list(&self) -> Result<Vec<AnalysisResult>> {
        self.inner.list()
    }

    fn clear(&mut self) -> Result<()> {
        self.inner.clear()?;
        self.flush()
    }
}

/// Narrow a listing by tier and/or a case-insensitive search over URL and domain
#[derive(Debug, Clone, Default)]
pub struct HistoryFilter {
    pub level: Option<ThreatLevel>,
    pub query: Option<String>,
}

impl HistoryFilter {
    pub fn matches(&self, result: &AnalysisResult) -> bool {
        if let Some(level) = self.level {
            if result.threat_level != level {
                return false;
            }
        }

        match &self.query {
            Some(query) if !query.is_empty() => {
                let query = query.to_lowercase();
                result.url.to_lowercase().contains(&query)
                    || result.details.domain.to_lowercase().contains(&query)
            }
            _ => true,
        }
    }

    pub fn apply(&self, results: Vec<AnalysisResult>) -> Vec<AnalysisResult> {
        results.into_iter().filter(|r| self.matches(r)).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistorySummary {
    pub total_scans: usize,
    pub safe: usize,
    pub suspicious: usize,
    pub malicious: usize,
    pub average_risk_score: f64,
}

impl HistorySummary {
    pub fn from_results(results: &[AnalysisResult]) -> Self {
        let mut summary = Self {
            total_scans: results.len(),
            ..Default::default()
        };

        let mut score_total: u64 = 0;
        for result in results {
            match result.threat_level {
                ThreatLevel::Safe => summary.safe += 1,
                ThreatLevel::Suspicious => summary.suspicious += 1,
                ThreatLevel::Malicious => summary.malicious += 1,
            }
            score_total += result.risk_score as u64;
        }

        if !results.is_empty() {
            summary.average_risk_score = score_total as f64 / results.len() as f64;
        }

        summary
    }
}
