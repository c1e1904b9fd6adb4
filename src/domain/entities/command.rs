/// Words that mark a command as a question when it starts with them
const QUESTION_WORDS: [&str; 6] = ["what", "who", "how", "why", "when", "where"];

/// A user instruction, trimmed and lower-cased
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    text: String,
}

impl Command {
    /// Normalise raw input. Returns `None` when nothing is left after trimming.
    pub fn parse(raw: &str) -> Option<Self> {
        let text = raw.trim().to_lowercase();
        if text.is_empty() {
            return None;
        }
        Some(Self { text })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn contains_any(&self, needles: &[&str]) -> bool {
        needles.iter().any(|n| self.text.contains(n))
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// Starts with an interrogative word or contains a question mark
    pub fn is_question(&self) -> bool {
        QUESTION_WORDS.iter().any(|w| self.text.starts_with(w)) || self.text.contains('?')
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}
