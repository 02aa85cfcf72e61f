//! Detect the critic's approval in free text.

use regex::{Regex, RegexBuilder};

pub const DEFAULT_APPROVAL_KEYWORD: &str = "approve";

/// Case-insensitive keyword match over a critic reply.
#[derive(Debug, Clone)]
pub struct ApprovalDetector {
    keyword: String,
    pattern: Regex,
}

impl ApprovalDetector {
    pub fn new(keyword: &str) -> Result<Self, regex::Error> {
        let pattern = RegexBuilder::new(&regex::escape(keyword.trim()))
            .case_insensitive(true)
            .build()?;
        Ok(Self {
            keyword: keyword.trim().to_string(),
            pattern,
        })
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn is_approval(&self, text: &str) -> bool {
        !self.keyword.is_empty() && self.pattern.is_match(text)
    }
}
