//! Source column → destination field names for article datasets.
//!
//! Columns not listed here are dropped from the destination payload.

const BUILTIN: [(&str, &str); 17] = [
    ("데이터셋명", "DATA_SET_NM"),
    ("데이터셋처리방법", "DATA_SET_HNDL_MTHD"),
    ("컨텐츠명", "CN_NM"),
    ("기사발행일자", "ART_PBLSH_YMD"),
    ("기사발행시각", "ART_PBLSH_TM"),
    ("중요긴급정도", "IMPRTNC_EMERG_DGRE"),
    ("분야", "REALM"),
    ("지역구분", "AREA_CLSF"),
    ("내용구분", "CONT_CLSF"),
    ("작성처", "WTPLC"),
    ("제목", "SBJECT"),
    ("부제목", "SBTTL"),
    ("자동추출인물", "AUTO_EXTRC_PRS"),
    ("자동추출위치", "AUTO_EXTRC_LOCA"),
    ("자동추출기관", "AUTO_EXTRC_INSTT"),
    ("자동추출키워드", "AUTO_EXTRC_KWRD"),
    ("자동추출링크", "AUTO_EXTRC_LINK"),
];

#[derive(Debug, Clone)]
pub struct FieldMapping {
    entries: Vec<(String, String)>,
}

impl Default for FieldMapping {
    fn default() -> Self { Self::builtin() }
}

impl FieldMapping {
    pub fn builtin() -> Self {
        Self::from_pairs(BUILTIN)
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self { entries: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }

    /// `(source column, destination field)` pairs in table order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(s, d)| (s.as_str(), d.as_str()))
    }

    pub fn destinations(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, d)| d.as_str())
    }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}
