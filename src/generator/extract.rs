//! Positional value extraction
//!
//! Values are pulled out of a normalized request with first-occurrence splitting around a few
//! marker tokens (`name`, `to`, the field keyword, `delete`, `insert`, `for user`). Nothing is
//! parsed; repeated markers are not disambiguated.

use super::intent::{IntentType, KeywordMode};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static ACTION_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(update|change)").expect("action word pattern is valid"));

const USER_CLAUSE: &str = "for user";
const TO_TOKEN: &str = "to";
const ARTICLES: [&str; 3] = ["the", "a", "an"];

/// The `(currentValue, newValue, userId)` triple pulled from a request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedValues {
    pub current_value: Option<String>,
    pub new_value: Option<String>,
    pub user_id: Option<String>,
}

impl ExtractedValues {
    /// Whether every value the intent type needs is present
    pub fn is_complete_for(&self, intent_type: IntentType) -> bool {
        match intent_type {
            IntentType::Delete => self.current_value.is_some(),
            IntentType::Insert => self.new_value.is_some(),
            _ => self.current_value.is_some() && self.new_value.is_some(),
        }
    }
}

/// Extract values from a normalized request for the given intent type.
///
/// `mode` decides what counts as an occurrence of the field, `delete` and `insert` markers,
/// the same way it does for classification.
pub fn extract_values(
    request: &str,
    intent_type: IntentType,
    mode: KeywordMode,
) -> ExtractedValues {
    let (body, user_id) = split_user_clause(request);

    let (current_value, new_value) = match intent_type {
        IntentType::Name => extract_name(body),
        IntentType::Phone | IntentType::Email | IntentType::Status => {
            extract_field(body, intent_type.keyword(), mode)
        }
        IntentType::Delete => (text_after(body, "delete", mode), None),
        IntentType::Insert => (None, text_after(body, "insert", mode)),
    };

    ExtractedValues {
        current_value,
        new_value,
        user_id,
    }
}

/// Split off a trailing `for user <id>` clause.
///
/// The id runs up to the next `for user`, if any. When the clause opens the request there is
/// nothing in front of it to cut, so the whole request is kept as the body.
fn split_user_clause(request: &str) -> (&str, Option<String>) {
    let Some(idx) = request.find(USER_CLAUSE) else {
        return (request.trim(), None);
    };

    let rest = &request[idx + USER_CLAUSE.len()..];
    let user_id = rest.split(USER_CLAUSE).next().and_then(non_empty);

    let head = request[..idx].trim();
    let body = if head.is_empty() { request.trim() } else { head };
    (body, user_id)
}

/// `<current> name to <new>`, or `name <current> to <new>` when nothing precedes `name`
fn extract_name(body: &str) -> (Option<String>, Option<String>) {
    let parts: Vec<&str> = body.split(' ').collect();
    let name_idx = parts.iter().position(|part| *part == "name");
    let to_idx = parts.iter().position(|part| *part == TO_TOKEN);

    let mut current_value = name_idx
        .filter(|&idx| idx > 0)
        .map(|idx| strip_action_word(&parts[..idx].join(" ")))
        .filter(|head| !is_only_articles(head));

    if current_value.is_none() {
        if let (Some(name_idx), Some(to_idx)) = (name_idx, to_idx) {
            if name_idx < to_idx {
                current_value = non_empty(&parts[name_idx + 1..to_idx].join(" "));
            }
        }
    }

    let new_value = to_idx
        .filter(|&idx| idx > 0 && idx < parts.len() - 1)
        .and_then(|idx| non_empty(&parts[idx + 1..].join(" ")));

    (current_value, new_value)
}

/// `<current> <keyword> to <new>`, or `<keyword> <current> to <new>`
fn extract_field(
    body: &str,
    keyword: &str,
    mode: KeywordMode,
) -> (Option<String>, Option<String>) {
    let parts: Vec<&str> = body.split(' ').collect();
    let Some(to_idx) = parts
        .iter()
        .position(|part| *part == TO_TOKEN)
        .filter(|&idx| idx > 0)
    else {
        return (None, None);
    };

    let before_to = parts[..to_idx].join(" ");
    let before_to = before_to.trim();
    let (head, tail) = match mode.find(before_to, keyword) {
        Some(idx) => (&before_to[..idx], Some(&before_to[idx + keyword.len()..])),
        None => (before_to, None),
    };

    let head = strip_action_word(head);
    let current_value = if is_only_articles(&head) {
        tail.and_then(non_empty)
    } else {
        non_empty(&head)
    };
    let new_value = non_empty(&parts[to_idx + 1..].join(" "));

    (current_value, new_value)
}

/// Everything after the first occurrence of `marker`
fn text_after(body: &str, marker: &str, mode: KeywordMode) -> Option<String> {
    mode.find(body, marker).and_then(|idx| non_empty(&body[idx + marker.len()..]))
}

/// Drop the first action word
fn strip_action_word(text: &str) -> String {
    ACTION_WORD.replace(text, "").trim().to_string()
}

/// Nothing but articles (or nothing at all) is left, so there is no real value here
fn is_only_articles(text: &str) -> bool {
    text.split_whitespace().all(|word| ARTICLES.contains(&word))
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn extract(request: &str, intent_type: IntentType) -> ExtractedValues {
        extract_values(request, intent_type, KeywordMode::Substring)
    }

    fn values(current: Option<&str>, new: Option<&str>, user: Option<&str>) -> ExtractedValues {
        ExtractedValues {
            current_value: current.map(str::to_string),
            new_value: new.map(str::to_string),
            user_id: user.map(str::to_string),
        }
    }

    #[rstest]
    #[case(
        "update the name john doe to jane doe for user 42",
        values(Some("john doe"), Some("jane doe"), Some("42"))
    )]
    #[case(
        "change john doe name to jane doe",
        values(Some("john doe"), Some("jane doe"), None)
    )]
    #[case(
        "change the smith name to jones for user 9",
        values(Some("the smith"), Some("jones"), Some("9"))
    )]
    #[case("update name to jane", values(None, Some("jane"), None))]
    #[case("change bob name to", values(Some("bob"), None, None))]
    #[case("update the name please", values(None, None, None))]
    fn test_extract_name(#[case] request: &str, #[case] expected: ExtractedValues) {
        assert_eq!(extract(request, IntentType::Name), expected);
    }

    #[rstest]
    #[case(
        "update phone 555-1111 to 555-2222 for user 3",
        IntentType::Phone,
        values(Some("555-1111"), Some("555-2222"), Some("3"))
    )]
    #[case(
        "change john smith email to js@example.com",
        IntentType::Email,
        values(Some("john smith"), Some("js@example.com"), None)
    )]
    #[case(
        "update the status to inactive for user 11",
        IntentType::Status,
        values(None, Some("inactive"), Some("11"))
    )]
    #[case(
        "change acme status from trial to paid",
        IntentType::Status,
        values(Some("acme"), Some("paid"), None)
    )]
    #[case("update phone 555", IntentType::Phone, values(None, None, None))]
    fn test_extract_field(
        #[case] request: &str,
        #[case] intent_type: IntentType,
        #[case] expected: ExtractedValues,
    ) {
        assert_eq!(extract(request, intent_type), expected);
    }

    #[test]
    fn test_extract_delete() {
        assert_eq!(
            extract("delete inactive account for user 7", IntentType::Delete),
            values(Some("inactive account"), None, Some("7"))
        );
        assert_eq!(
            extract("please delete", IntentType::Delete),
            values(None, None, None)
        );
    }

    #[test]
    fn test_extract_insert() {
        assert_eq!(
            extract("insert 'ann', 'lee', 'ann@x.io'", IntentType::Insert),
            values(None, Some("'ann', 'lee', 'ann@x.io'"), None)
        );
    }

    #[test]
    fn test_first_occurrence_wins() {
        let extracted = extract("delete a then delete b", IntentType::Delete);
        assert_eq!(extracted.current_value.as_deref(), Some("a then delete b"));

        let extracted = extract("delete row for user 4 for user 5", IntentType::Delete);
        assert_eq!(extracted.user_id.as_deref(), Some("4"));
    }

    #[test]
    fn test_leading_user_clause_keeps_request() {
        let extracted = extract("for user 5 delete row", IntentType::Delete);
        assert_eq!(extracted.current_value.as_deref(), Some("row"));
        assert_eq!(extracted.user_id.as_deref(), Some("5 delete row"));
    }

    #[test]
    fn test_action_word_removed_only_once() {
        let extracted = extract("update change name to x", IntentType::Name);
        assert_eq!(extracted.current_value.as_deref(), Some("change"));
    }

    #[test]
    fn test_field_articles_kept_before_keyword() {
        let extracted = extract("change the acme status to paid", IntentType::Status);
        assert_eq!(extracted.current_value.as_deref(), Some("the acme"));
    }

    #[rstest]
    #[case(KeywordMode::Substring, Some("d x, delete y"))]
    #[case(KeywordMode::WordBoundary, Some("y"))]
    fn test_delete_marker_follows_keyword_mode(
        #[case] mode: KeywordMode,
        #[case] expected: Option<&str>,
    ) {
        let extracted = extract_values("undeleted x, delete y", IntentType::Delete, mode);
        assert_eq!(extracted.current_value.as_deref(), expected);
    }

    #[test]
    fn test_field_keyword_follows_keyword_mode() {
        let extracted = extract_values(
            "change statusbar status to on",
            IntentType::Status,
            KeywordMode::WordBoundary,
        );
        assert_eq!(extracted.current_value.as_deref(), Some("statusbar"));
    }

    #[test]
    fn test_empty_user_clause_is_absent() {
        let extracted = extract("delete stale row for user   ", IntentType::Delete);
        assert_eq!(extracted.user_id, None);
        assert_eq!(extracted.current_value.as_deref(), Some("stale row"));
    }

    #[rstest]
    #[case(IntentType::Name, values(Some("a"), Some("b"), None), true)]
    #[case(IntentType::Name, values(Some("a"), None, None), false)]
    #[case(IntentType::Status, values(None, Some("b"), None), false)]
    #[case(IntentType::Delete, values(Some("a"), None, None), true)]
    #[case(IntentType::Delete, values(None, Some("b"), None), false)]
    #[case(IntentType::Insert, values(None, Some("b"), None), true)]
    fn test_is_complete_for(
        #[case] intent_type: IntentType,
        #[case] extracted: ExtractedValues,
        #[case] complete: bool,
    ) {
        assert_eq!(extracted.is_complete_for(intent_type), complete);
    }
}
