//! In-memory document records.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use docintel::ProcessingResult;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One processed upload: who filed it where, and what the engine decided.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: Uuid,
    pub filename: String,
    /// Department the uploader filed the document under.
    pub department: String,
    pub uploaded_by: String,
    pub uploaded_at: DateTime<Utc>,
    /// Where the upload was written, if it came in as a file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filepath: Option<String>,
    #[serde(flatten)]
    pub result: ProcessingResult,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentFilter {
    /// Declared department
    pub department: Option<String>,
    pub misfiled: Option<bool>,
    pub has_alerts: Option<bool>,
}

impl DocumentFilter {
    fn matches(&self, record: &DocumentRecord) -> bool {
        self.department
            .as_deref()
            .is_none_or(|d| record.department == d)
            && self
                .misfiled
                .is_none_or(|m| record.result.is_misfiled == m)
            && self
                .has_alerts
                .is_none_or(|a| record.result.has_alerts() == a)
    }
}

#[derive(Debug, Default)]
pub struct DocumentStore {
    records: DashMap<Uuid, DocumentRecord>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, record: DocumentRecord) {
        self.records.insert(record.id, record);
    }

    pub fn get(&self, id: &Uuid) -> Option<DocumentRecord> {
        self.records.get(id).map(|r| r.value().clone())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Matching records, newest first, plus the total number of matches before paging.
    pub fn list(
        &self,
        filter: &DocumentFilter,
        offset: usize,
        limit: usize,
    ) -> (usize, Vec<DocumentRecord>) {
        let mut matches: Vec<DocumentRecord> = self
            .records
            .iter()
            .filter(|r| filter.matches(r.value()))
            .map(|r| r.value().clone())
            .collect();
        matches.sort_by(|a, b| {
            b.uploaded_at
                .cmp(&a.uploaded_at)
                .then_with(|| a.id.cmp(&b.id))
        });

        let total = matches.len();
        let page = matches.into_iter().skip(offset).take(limit).collect();
        (total, page)
    }

    pub fn misfiled_count(&self) -> usize {
        self.records.iter().filter(|r| r.result.is_misfiled).count()
    }
}
