use regex::{Regex, RegexBuilder};

/// Case-insensitive whole-word matcher for a single term.
///
/// The term is escaped, so punctuation inside it is matched literally, and
/// wrapped in Unicode word boundaries: `cat` matches "a cat!" but not
/// "concatenate".
#[derive(Debug, Clone)]
pub struct TermMatcher {
    term: String,
    pattern: Regex,
}

impl TermMatcher {
    pub fn new(term: &str) -> Result<Self, regex::Error> {
        let pattern = RegexBuilder::new(&format!(r"\b{}\b", regex::escape(term)))
            .case_insensitive(true)
            .build()?;

        Ok(Self {
            term: term.to_string(),
            pattern,
        })
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}
