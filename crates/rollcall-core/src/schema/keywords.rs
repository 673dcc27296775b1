use crate::error::CoreError;

pub const PHONE_KEYWORDS: [&str; 5] = ["телефон", "номер", "phone", "tel", "phone_number"];
pub const STATUS_KEYWORDS: [&str; 5] = ["whatsapp", "ошибка", "status", "статус", "result"];

/// Lower-case keywords matched as substrings of a header cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordSet(Vec<String>);

impl KeywordSet {
    pub fn new<I, S>(keywords: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out = Vec::new();
        for keyword in keywords {
            let raw = keyword.as_ref();
            let normalized = raw.trim().to_lowercase();
            if normalized.is_empty() {
                return Err(CoreError::InvalidKeyword(raw.to_string()));
            }
            if !out.contains(&normalized) {
                out.push(normalized);
            }
        }
        if out.is_empty() {
            return Err(CoreError::EmptyKeywordSet);
        }
        Ok(Self(out))
    }

    /// `cell` must already be trimmed and lower-cased.
    pub fn matches(&self, cell: &str) -> bool {
        self.0.iter().any(|keyword| cell.contains(keyword.as_str()))
    }

    pub fn keywords(&self) -> &[String] {
        &self.0
    }

    fn from_static(keywords: &[&str]) -> Self {
        Self(keywords.iter().map(|keyword| keyword.to_string()).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaKeywords {
    pub phone: KeywordSet,
    pub status: KeywordSet,
}

impl Default for SchemaKeywords {
    fn default() -> Self {
        Self {
            phone: KeywordSet::from_static(&PHONE_KEYWORDS),
            status: KeywordSet::from_static(&STATUS_KEYWORDS),
        }
    }
}
