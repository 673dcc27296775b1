use crate::error::CoreError;

pub const DEFAULT_POSITIVE_LABEL: &str = "есть ватсап";
pub const DEFAULT_NEGATIVE_LABEL: &str = "нету";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Positive,
    Negative,
}

impl Verdict {
    pub fn from_match(matched: bool) -> Self {
        if matched {
            Self::Positive
        } else {
            Self::Negative
        }
    }

    pub fn is_positive(self) -> bool {
        matches!(self, Self::Positive)
    }
}

/// Text written into the verdict column for each outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerdictLabels {
    positive: String,
    negative: String,
}

impl VerdictLabels {
    pub fn new(positive: &str, negative: &str) -> Result<Self, CoreError> {
        let positive = positive.trim();
        let negative = negative.trim();
        if positive.is_empty() || negative.is_empty() || positive == negative {
            return Err(CoreError::InvalidVerdictLabel);
        }
        Ok(Self {
            positive: positive.to_string(),
            negative: negative.to_string(),
        })
    }

    pub fn label(&self, verdict: Verdict) -> &str {
        match verdict {
            Verdict::Positive => &self.positive,
            Verdict::Negative => &self.negative,
        }
    }
}

impl Default for VerdictLabels {
    fn default() -> Self {
        Self {
            positive: DEFAULT_POSITIVE_LABEL.to_string(),
            negative: DEFAULT_NEGATIVE_LABEL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Verdict, VerdictLabels};
    use crate::error::CoreError;

    #[test]
    fn labels_render_each_verdict() {
        let labels = VerdictLabels::new(" yes ", "no").unwrap();
        assert_eq!(labels.label(Verdict::Positive), "yes");
        assert_eq!(labels.label(Verdict::Negative), "no");
    }

    #[test]
    fn labels_reject_blank_or_identical_values() {
        assert_eq!(
            VerdictLabels::new("", "no").unwrap_err(),
            CoreError::InvalidVerdictLabel
        );
        assert!(VerdictLabels::new("same", " same").is_err());
    }

    #[test]
    fn verdict_from_match() {
        assert!(Verdict::from_match(true).is_positive());
        assert!(!Verdict::from_match(false).is_positive());
    }
}
