use casevec_core::config::{IngestSettings, ProfileKind};
use casevec_core::types::Record;

pub const DEFAULT_PROVENANCE: &str = "csv-upload";

/// Which columns an ingestion run reads, and how it deduplicates.
///
/// - `text_columns`: joined with one space to form the embedding text
/// - `raw_column` → `raw_field`: the untouched text stored alongside the mapped columns
/// - `dedup_column` → `dedup_field`: row value looked up by exact match in the store
/// - `skip_blank`: skip rows whose raw text is missing or whitespace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestProfile {
    pub name: String,
    pub text_columns: Vec<String>,
    pub raw_column: String,
    pub raw_field: String,
    pub dedup_column: String,
    pub dedup_field: String,
    pub skip_blank: bool,
    pub provenance: String,
}

impl IngestProfile {
    /// Article body: `카테고리 내용`, deduplicated on the body text.
    pub fn content() -> Self {
        Self {
            name: "content".to_string(),
            text_columns: vec!["카테고리".to_string(), "내용".to_string()],
            raw_column: "내용".to_string(),
            raw_field: "CONTENT".to_string(),
            dedup_column: "내용".to_string(),
            dedup_field: "CONTENT".to_string(),
            skip_blank: true,
            provenance: DEFAULT_PROVENANCE.to_string(),
        }
    }

    /// Headlines: `제목 부제목`, deduplicated on the content name.
    pub fn title() -> Self {
        Self {
            name: "title".to_string(),
            text_columns: vec!["제목".to_string(), "부제목".to_string()],
            raw_column: "제목".to_string(),
            raw_field: "TITLE".to_string(),
            dedup_column: "컨텐츠명".to_string(),
            dedup_field: "CN_NM".to_string(),
            skip_blank: false,
            provenance: DEFAULT_PROVENANCE.to_string(),
        }
    }

    pub fn from_kind(kind: ProfileKind) -> Self {
        match kind {
            ProfileKind::Content => Self::content(),
            ProfileKind::Title => Self::title(),
        }
    }

    /// Preset named by `settings.profile`, with the configured provenance tag
    /// and blank-row override applied.
    pub fn from_settings(settings: &IngestSettings) -> Self {
        let profile = Self::from_kind(settings.profile).with_provenance(&settings.provenance);
        match settings.skip_blank {
            Some(skip) => profile.with_skip_blank(skip),
            None => profile,
        }
    }

    pub fn with_provenance(mut self, tag: &str) -> Self { self.provenance = tag.to_string(); self }

    pub fn with_skip_blank(mut self, skip: bool) -> Self { self.skip_blank = skip; self }

    pub fn raw_text(&self, record: &Record) -> String { cell(record, &self.raw_column) }

    pub fn dedup_value(&self, record: &Record) -> String { cell(record, &self.dedup_column) }

    pub fn is_blank(&self, record: &Record) -> bool { self.raw_text(record).is_empty() }

    pub fn embedding_text(&self, record: &Record) -> String {
        let parts: Vec<String> = self.text_columns.iter().map(|c| cell(record, c)).collect();
        parts.join(" ").trim().to_string()
    }
}

fn cell(record: &Record, column: &str) -> String {
    record.get(column).map(str::trim).unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_text_is_category_then_body() {
        let p = IngestProfile::content();
        let r = Record::from_pairs([("내용", " 본문 텍스트 "), ("카테고리", "피싱")]);
        assert_eq!(p.embedding_text(&r), "피싱 본문 텍스트");
        assert_eq!(p.raw_text(&r), "본문 텍스트");
        assert_eq!(p.dedup_value(&r), "본문 텍스트");
    }

    #[test]
    fn missing_category_leaves_no_leading_space() {
        let p = IngestProfile::content();
        let r = Record::from_pairs([("내용", "본문")]);
        assert_eq!(p.embedding_text(&r), "본문");
    }

    #[test]
    fn blank_detection_trims_whitespace() {
        let p = IngestProfile::content();
        assert!(p.is_blank(&Record::from_pairs([("내용", "   ")])));
        assert!(p.is_blank(&Record::from_pairs([("카테고리", "피싱")])));
        assert!(!p.is_blank(&Record::from_pairs([("내용", "x")])));
    }

    #[test]
    fn title_profile_uses_headline_pair() {
        let p = IngestProfile::from_kind(ProfileKind::Title);
        assert!(!p.skip_blank);
        let r = Record::from_pairs([("제목", "택배 문자 주의"), ("부제목", "링크 클릭 금지"), ("컨텐츠명", "기사A")]);
        assert_eq!(p.embedding_text(&r), "택배 문자 주의 링크 클릭 금지");
        assert_eq!(p.dedup_value(&r), "기사A");
        assert_eq!(p.raw_text(&r), "택배 문자 주의");
    }

    #[test]
    fn settings_override_blank_check_and_provenance() {
        let mut settings = IngestSettings { profile: ProfileKind::Title, ..Default::default() };
        assert!(!IngestProfile::from_settings(&settings).skip_blank);

        settings.skip_blank = Some(true);
        settings.provenance = "xlsx-upload".to_string();
        let p = IngestProfile::from_settings(&settings);
        assert!(p.skip_blank);
        assert_eq!(p.provenance, "xlsx-upload");
        assert_eq!(p.dedup_field, "CN_NM");

        let content = IngestSettings { skip_blank: Some(false), ..Default::default() };
        assert!(!IngestProfile::from_settings(&content).skip_blank);
    }
}
