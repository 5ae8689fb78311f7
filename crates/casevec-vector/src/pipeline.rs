//! Row-at-a-time ingestion into the vector store.
//!
//! For each row, in file order: blank check → duplicate check → embed →
//! assemble payload → upsert → throttle. Every failure is logged and the row
//! skipped; nothing is retried and nothing aborts the run.

use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use casevec_core::config::DedupFailurePolicy;
use casevec_core::field_mapping::FieldMapping;
use casevec_core::types::{Payload, Point, Record};

use crate::embed_provider::EmbedProvider;
use crate::profile::IngestProfile;
use crate::store::{PointStore, StoreError};

pub const PROVENANCE_FIELD: &str = "source";

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Pause after every upsert attempt.
    pub throttle: Duration,
    pub on_dedup_error: DedupFailurePolicy,
    pub progress: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self { throttle: Duration::from_millis(10), on_dedup_error: DedupFailurePolicy::FailOpen, progress: false }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Inserted { id: String },
    SkippedBlank,
    SkippedDuplicate,
    /// Duplicate check failed under `FailClosed`.
    DedupCheckFailed,
    EmbedFailed,
    UpsertFailed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub total: usize,
    pub inserted: usize,
    pub skipped_blank: usize,
    pub skipped_duplicate: usize,
    pub dedup_check_failed: usize,
    pub embed_failed: usize,
    pub upsert_failed: usize,
}

impl IngestReport {
    pub fn record(&mut self, outcome: &RowOutcome) {
        self.total += 1;
        match outcome {
            RowOutcome::Inserted { .. } => self.inserted += 1,
            RowOutcome::SkippedBlank => self.skipped_blank += 1,
            RowOutcome::SkippedDuplicate => self.skipped_duplicate += 1,
            RowOutcome::DedupCheckFailed => self.dedup_check_failed += 1,
            RowOutcome::EmbedFailed => self.embed_failed += 1,
            RowOutcome::UpsertFailed => self.upsert_failed += 1,
        }
    }
}

impl fmt::Display for IngestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rows={} inserted={} blank={} duplicate={} dedup_error={} embed_error={} upsert_error={}",
            self.total, self.inserted, self.skipped_blank, self.skipped_duplicate,
            self.dedup_check_failed, self.embed_failed, self.upsert_failed
        )
    }
}

/// Destination payload: mapped columns present in the row (values trimmed),
/// the raw text under `profile.raw_field`, and the provenance tag.
pub fn build_payload(record: &Record, mapping: &FieldMapping, profile: &IngestProfile) -> Payload {
    let mut payload = Payload::new();
    for (src, dst) in mapping.entries() {
        if let Some(v) = record.get(src) { payload.insert(dst.to_string(), Value::String(v.trim().to_string())); }
    }
    payload.insert(profile.raw_field.clone(), Value::String(profile.raw_text(record)));
    payload.insert(PROVENANCE_FIELD.to_string(), Value::String(profile.provenance.clone()));
    payload
}

pub struct Pipeline<'a> {
    store: &'a dyn PointStore,
    embedder: &'a dyn EmbedProvider,
    mapping: &'a FieldMapping,
    profile: IngestProfile,
    options: PipelineOptions,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        store: &'a dyn PointStore,
        embedder: &'a dyn EmbedProvider,
        mapping: &'a FieldMapping,
        profile: IngestProfile,
        options: PipelineOptions,
    ) -> Self {
        Self { store, embedder, mapping, profile, options }
    }

    pub async fn run(&self, records: &[Record]) -> IngestReport {
        info!(rows = records.len(), profile = %self.profile.name, embedder = %self.embedder.provider_id(), "starting ingestion");
        let pb = if self.options.progress { ProgressBar::new(records.len() as u64) } else { ProgressBar::hidden() };
        if let Ok(style) = ProgressStyle::default_bar().template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} rows ({percent}%) {msg}") {
            pb.set_style(style.progress_chars("#>-"));
        }
        let mut report = IngestReport::default();
        for (i, record) in records.iter().enumerate() {
            let outcome = self.process_record(record).instrument(info_span!("row", index = i + 1)).await;
            report.record(&outcome);
            pb.inc(1);
        }
        pb.finish_and_clear();
        info!(%report, "all rows processed");
        report
    }

    pub async fn process_record(&self, record: &Record) -> RowOutcome {
        let p = &self.profile;
        if p.skip_blank && p.is_blank(record) {
            info!(column = %p.raw_column, "skip: no content");
            return RowOutcome::SkippedBlank;
        }

        let key = p.dedup_value(record);
        match self.store.find_by_field(&p.dedup_field, &key).await {
            Ok(true) => {
                info!(field = %p.dedup_field, value = %key, "skip: duplicate");
                return RowOutcome::SkippedDuplicate;
            }
            Ok(false) => {}
            Err(e) => match self.options.on_dedup_error {
                DedupFailurePolicy::FailOpen => {
                    warn!(field = %p.dedup_field, value = %key, error = %e, "duplicate check failed; treating row as new");
                }
                DedupFailurePolicy::FailClosed => {
                    error!(field = %p.dedup_field, value = %key, error = %e, "duplicate check failed; skipping row");
                    return RowOutcome::DedupCheckFailed;
                }
            },
        }

        let text = p.embedding_text(record);
        let vector = match self.embedder.embed(&text).await {
            Ok(v) => v,
            Err(e) => {
                error!(field = %p.dedup_field, value = %key, error = %e, "embedding failed");
                return RowOutcome::EmbedFailed;
            }
        };

        let point = Point { id: Uuid::new_v4().to_string(), vector, payload: build_payload(record, self.mapping, p) };
        let outcome = match self.store.upsert(&point).await {
            Ok(()) => RowOutcome::Inserted { id: point.id },
            Err(StoreError::Status { status, body }) => {
                error!(field = %p.dedup_field, value = %key, status, body = %body, "store write failed");
                RowOutcome::UpsertFailed
            }
            Err(e) => {
                error!(field = %p.dedup_field, value = %key, error = %e, "store write failed");
                RowOutcome::UpsertFailed
            }
        };
        if !self.options.throttle.is_zero() { tokio::time::sleep(self.options.throttle).await; }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn payload_has_exactly_mapped_present_fields_plus_fixed_two() {
        let mapping = FieldMapping::builtin();
        let profile = IngestProfile::content();
        let r = Record::from_pairs([
            ("내용", "본문 텍스트"),
            ("카테고리", "피싱"),
            ("컨텐츠명", " 기사1 "),
            ("분야", "사회"),
            ("제목", ""),
            ("알수없음", "x"),
        ]);
        let payload = build_payload(&r, &mapping, &profile);
        let keys: BTreeSet<&str> = payload.keys().map(String::as_str).collect();
        let expected: BTreeSet<&str> = ["CN_NM", "REALM", "CONTENT", "source"].into_iter().collect();
        assert_eq!(keys, expected);
        assert_eq!(payload["CN_NM"], Value::String("기사1".into()));
        assert_eq!(payload["CONTENT"], Value::String("본문 텍스트".into()));
        assert_eq!(payload["source"], Value::String("csv-upload".into()));
    }

    #[test]
    fn payload_keys_stay_within_mapping_plus_fixed() {
        let mapping = FieldMapping::builtin();
        let profile = IngestProfile::title();
        let r = Record::from_pairs(mapping.entries().map(|(src, _)| (src.to_string(), format!("v-{src}"))).collect::<Vec<_>>());
        let payload = build_payload(&r, &mapping, &profile);
        assert_eq!(payload.len(), mapping.len() + 2);
        for k in payload.keys() {
            assert!(mapping.destinations().any(|d| d == k) || k == "TITLE" || k == PROVENANCE_FIELD, "unexpected key {k}");
        }
    }

    #[test]
    fn report_counts_outcomes() {
        let mut report = IngestReport::default();
        report.record(&RowOutcome::Inserted { id: "a".into() });
        report.record(&RowOutcome::SkippedBlank);
        report.record(&RowOutcome::EmbedFailed);
        assert_eq!(report.total, 3);
        assert_eq!(report.inserted, 1);
        assert_eq!(report.to_string(), "rows=3 inserted=1 blank=1 duplicate=0 dedup_error=0 embed_error=1 upsert_error=0");
    }
}
