//! StaticTrainingCatalog - 設定ファイルの `[training]` から作る固定の catalog

use std::collections::HashMap;

use crate::ports::TrainingCatalog;

/// Exact-match lookup from skill name to a training resource URL.
#[derive(Debug, Clone, Default)]
pub struct StaticTrainingCatalog {
    entries: HashMap<String, String>,
}

impl StaticTrainingCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(entries: HashMap<String, String>) -> Self {
        Self { entries }
    }

    pub fn with_entry(mut self, skill: impl Into<String>, url: impl Into<String>) -> Self {
        self.entries.insert(skill.into(), url.into());
        self
    }
}

impl TrainingCatalog for StaticTrainingCatalog {
    fn lookup(&self, skill: &str) -> Option<String> {
        self.entries.get(skill.trim()).cloned()
    }
}
