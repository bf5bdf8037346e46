//! Keyword-based intent classification
//!
//! A request is mapped to the first rule whose keywords it contains. Rule order is the
//! tie-break: a request mentioning both "name" and "update" is a name update even when
//! "delete" also appears somewhere in it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Words that turn a field keyword into an update request
const ACTION_WORDS: [&str; 2] = ["update", "change"];

/// What part of a row a request wants to touch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentType {
    Name,
    Phone,
    Email,
    Status,
    Delete,
    Insert,
}

impl IntentType {
    pub const ALL: [IntentType; 6] = [
        IntentType::Name,
        IntentType::Phone,
        IntentType::Email,
        IntentType::Status,
        IntentType::Delete,
        IntentType::Insert,
    ];

    /// The keyword that identifies this type in requests and templates
    pub fn keyword(self) -> &'static str {
        match self {
            IntentType::Name => "name",
            IntentType::Phone => "phone",
            IntentType::Email => "email",
            IntentType::Status => "status",
            IntentType::Delete => "delete",
            IntentType::Insert => "insert",
        }
    }

    pub fn action(self) -> Action {
        match self {
            IntentType::Delete => Action::Delete,
            IntentType::Insert => Action::Insert,
            _ => Action::Update,
        }
    }

    /// Field updates need an action word next to the keyword
    fn needs_action_word(self) -> bool {
        self.action() == Action::Update
    }
}

impl fmt::Display for IntentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Update,
    Delete,
    Insert,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Update => write!(f, "update"),
            Action::Delete => write!(f, "delete"),
            Action::Insert => write!(f, "insert"),
        }
    }
}

/// A classified request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    #[serde(rename = "type")]
    pub intent_type: IntentType,
    pub action: Action,
}

impl From<IntentType> for Intent {
    fn from(intent_type: IntentType) -> Self {
        Self {
            intent_type,
            action: intent_type.action(),
        }
    }
}

/// How keywords are located in a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordMode {
    /// Plain substring containment ("insert" matches inside "reinserted")
    #[default]
    Substring,
    /// The keyword must stand on its own as a word
    WordBoundary,
}

impl KeywordMode {
    pub fn contains(self, text: &str, keyword: &str) -> bool {
        self.find(text, keyword).is_some()
    }

    /// Byte offset of the first occurrence of `keyword` that counts under this mode
    pub fn find(self, text: &str, keyword: &str) -> Option<usize> {
        match self {
            KeywordMode::Substring => text.find(keyword),
            KeywordMode::WordBoundary => text.match_indices(keyword).find_map(|(idx, _)| {
                let before = text[..idx].chars().next_back();
                let after = text[idx + keyword.len()..].chars().next();
                (!before.is_some_and(is_word_char) && !after.is_some_and(is_word_char))
                    .then_some(idx)
            }),
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Classify a normalized request. Returns `None` when no rule applies.
pub fn classify(request: &str, mode: KeywordMode) -> Option<Intent> {
    let has_action_word = ACTION_WORDS
        .iter()
        .any(|word| mode.contains(request, word));

    IntentType::ALL
        .into_iter()
        .find(|intent_type| {
            mode.contains(request, intent_type.keyword())
                && (!intent_type.needs_action_word() || has_action_word)
        })
        .map(Intent::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("update the name john doe to jane doe", IntentType::Name)]
    #[case("change john phone to 555-2222", IntentType::Phone)]
    #[case("update email for bob to b@x.io", IntentType::Email)]
    #[case("change status to inactive", IntentType::Status)]
    #[case("delete inactive account for user 7", IntentType::Delete)]
    #[case("insert 'a', 'b' into users", IntentType::Insert)]
    fn test_classify(#[case] request: &str, #[case] expected: IntentType) {
        let intent = classify(request, KeywordMode::Substring).unwrap();
        assert_eq!(intent.intent_type, expected);
        assert_eq!(intent.action, expected.action());
    }

    #[rstest]
    #[case("gibberish text")]
    #[case("phone john about the outage")]
    #[case("")]
    fn test_no_intent(#[case] request: &str) {
        assert_eq!(classify(request, KeywordMode::Substring), None);
    }

    #[test]
    fn test_name_rule_wins_over_delete() {
        let intent = classify(
            "update the name undeleted to deleted",
            KeywordMode::Substring,
        )
        .unwrap();
        assert_eq!(intent.intent_type, IntentType::Name);
        assert_eq!(intent.action, Action::Update);
    }

    #[test]
    fn test_name_rule_wins_over_phone() {
        let intent = classify("change name and phone to x", KeywordMode::Substring).unwrap();
        assert_eq!(intent.intent_type, IntentType::Name);
    }

    #[test]
    fn test_field_without_action_word_falls_through() {
        // "status" alone is not enough; "delete" still matches
        let intent = classify("delete status row", KeywordMode::Substring).unwrap();
        assert_eq!(intent.intent_type, IntentType::Delete);
    }

    #[test]
    fn test_substring_mode_keeps_false_positives() {
        let intent = classify("reinserted rows look odd", KeywordMode::Substring).unwrap();
        assert_eq!(intent.intent_type, IntentType::Insert);

        // "username" carries "name", "updated" carries "update"
        let intent = classify("username was updated", KeywordMode::Substring).unwrap();
        assert_eq!(intent.intent_type, IntentType::Name);
    }

    #[test]
    fn test_word_boundary_mode_rejects_embedded_keywords() {
        assert_eq!(
            classify("reinserted rows look odd", KeywordMode::WordBoundary),
            None
        );
        assert_eq!(
            classify("username was updated", KeywordMode::WordBoundary),
            None
        );

        let intent = classify("update the name bob to rob", KeywordMode::WordBoundary).unwrap();
        assert_eq!(intent.intent_type, IntentType::Name);
    }

    #[test]
    fn test_word_boundary_splits_on_punctuation() {
        assert!(KeywordMode::WordBoundary.contains("please, delete.", "delete"));
        assert!(!KeywordMode::WordBoundary.contains("delete_me", "delete"));
    }

    #[rstest]
    #[case(KeywordMode::Substring, "undeleted x, delete y", Some(2))]
    #[case(KeywordMode::WordBoundary, "undeleted x, delete y", Some(13))]
    #[case(KeywordMode::WordBoundary, "delete", Some(0))]
    #[case(KeywordMode::WordBoundary, "undeleted", None)]
    fn test_find_first_counting_occurrence(
        #[case] mode: KeywordMode,
        #[case] text: &str,
        #[case] expected: Option<usize>,
    ) {
        assert_eq!(mode.find(text, "delete"), expected);
    }

    #[test]
    fn test_intent_serializes_like_wire_format() {
        let json = serde_json::to_string(&Intent::from(IntentType::Phone)).unwrap();
        assert_eq!(json, r#"{"type":"phone","action":"update"}"#);
    }
}
