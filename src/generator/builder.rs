//! Template-to-script rewriting
//!
//! The chosen template is treated as opaque text. A handful of patterns pick out the table,
//! the SET columns and the WHERE clause; the mutation is then rewritten with the extracted
//! values, preceded by a diagnostic SELECT and wrapped in a transaction whose COMMIT and ROLLBACK
//! are left commented out. Generated scripts are drafts for a human to review and run.

use super::extract::ExtractedValues;
use super::intent::IntentType;
use regex::{Captures, NoExpand, Regex};
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Table used when the template names none
pub const DEFAULT_TABLE: &str = "users";
/// Stands in for the user id when the request did not give one
pub const USER_ID_PLACEHOLDER: &str = "<USER_ID_HERE>";

const WHERE_COLUMN: &str = "user_id";
const NAME_COLUMN: &str = "last_name";

static TABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:update|insert|delete)\s+(?:(?:into|from)\s+)?([^\s(;]+)(?:[\s(;]|$)")
        .expect("table pattern is valid")
});
static SET_CLAUSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bset\s+([^;]+?)(?:where|\s*;)").expect("set pattern is valid")
});
static WHERE_CLAUSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)where\s+.+?(\s*;|$)").expect("where pattern is valid")
});
static VALUES_TUPLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)values\s*\([^)]+\)").expect("values pattern is valid")
});
static LITERAL_USER_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"user_id = \d+").expect("user id pattern is valid"));
static TRAILING_TERMINATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*;\s*$").expect("terminator pattern is valid"));
static TRANSACTION_CONTROL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?im)^[ \t]*(?:--[ \t]*)?(?:begin(?:[ \t]+transaction)?|start[ \t]+transaction|commit|rollback)[ \t]*;[ \t]*$\n?",
    )
    .expect("transaction control pattern is valid")
});

/// Structural pieces of a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateShape {
    pub table: String,
    /// Lowercased column names assigned in the SET clause; `None` when there is no SET clause
    pub set_columns: Option<Vec<String>>,
}

impl TemplateShape {
    pub fn parse(template: &str) -> Self {
        let table = TABLE
            .captures(template)
            .map(|caps| caps[1].to_string())
            .unwrap_or_else(|| DEFAULT_TABLE.to_string());

        let set_columns = SET_CLAUSE.captures(template).map(|caps| {
            caps[1]
                .split(',')
                .map(|clause| {
                    clause
                        .trim()
                        .split('=')
                        .next()
                        .unwrap_or_default()
                        .trim()
                        .to_lowercase()
                })
                .collect()
        });

        Self { table, set_columns }
    }

    /// First SET column, or the intent keyword when the template assigns none
    pub fn target_column(&self, intent_type: IntentType) -> String {
        self.set_columns
            .as_ref()
            .and_then(|columns| columns.first())
            .filter(|column| !column.is_empty())
            .cloned()
            .unwrap_or_else(|| intent_type.keyword().to_string())
    }
}

/// `user_id = <id>`, or the placeholder when no id was extracted
pub fn where_clause(values: &ExtractedValues) -> String {
    let user_id = values.user_id.as_deref().unwrap_or(USER_ID_PLACEHOLDER);
    format!("{WHERE_COLUMN} = {user_id}")
}

/// Build the reviewable script for a template, intent type and extracted values
pub fn build_script(template: &str, intent_type: IntentType, values: &ExtractedValues) -> String {
    debug!("Template before update: {}", template);
    debug!("Values for update: {:?}", values);

    let template = TRANSACTION_CONTROL.replace_all(template, "");
    let shape = TemplateShape::parse(&template);
    let column = shape.target_column(intent_type);
    let where_clause = where_clause(values);

    let mutation =
        rewrite_mutation(&template, intent_type, &shape, &column, &where_clause, values);
    let mutation = tidy_mutation(&mutation, &where_clause);
    let select_before =
        diagnostic_select(intent_type, &shape.table, &column, &where_clause, values);

    debug!("Update part: {}", mutation);

    format!("\nBEGIN TRANSACTION;\n{select_before}\n{mutation}\n--COMMIT;\n--ROLLBACK;")
}

fn rewrite_mutation(
    template: &str,
    intent_type: IntentType,
    shape: &TemplateShape,
    column: &str,
    where_clause: &str,
    values: &ExtractedValues,
) -> String {
    let new_value = values.new_value.as_deref().unwrap_or_default();

    if shape.set_columns.is_some() {
        // name updates always target last_name, whatever column came first
        let target = if intent_type == IntentType::Name {
            NAME_COLUMN
        } else {
            column
        };
        return replace_assignment(template, target, new_value);
    }

    match intent_type {
        IntentType::Delete => WHERE_CLAUSE
            .replace(template, |caps: &Captures| {
                format!("WHERE {}{}", where_clause, &caps[1])
            })
            .into_owned(),
        IntentType::Insert => {
            let tuple = values.new_value.as_deref().unwrap_or("default");
            VALUES_TUPLE
                .replace(template, NoExpand(&format!("VALUES ({tuple})")))
                .into_owned()
        }
        _ => template.to_string(),
    }
}

/// Replace the first `<column> = <literal>` with `<column> = '<value>'`
fn replace_assignment(template: &str, column: &str, value: &str) -> String {
    let pattern = format!(r#"(?i){}\s*=\s*['"]?[^'"]*['"]?"#, regex::escape(column));
    match Regex::new(&pattern) {
        Ok(assignment) => assignment
            .replace(template, NoExpand(&format!("{column} = '{value}'")))
            .into_owned(),
        Err(e) => {
            warn!("Cannot rewrite column {}: {}", column, e);
            template.to_string()
        }
    }
}

/// Point leftover literal ids at the computed WHERE clause and normalize terminators
fn tidy_mutation(mutation: &str, where_clause: &str) -> String {
    let mutation = LITERAL_USER_ID.replace(mutation, NoExpand(where_clause));
    let mutation = mutation.replace(";;", ";");
    TRAILING_TERMINATOR.replace(&mutation, ";").into_owned()
}

/// Read-only lookup of the affected row as it stands before the mutation
fn diagnostic_select(
    intent_type: IntentType,
    table: &str,
    column: &str,
    where_clause: &str,
    values: &ExtractedValues,
) -> String {
    if intent_type == IntentType::Name {
        return format!(
            "SELECT user_id, first_name, last_name FROM {table} \
             WHERE CONCAT(first_name, ' ', last_name) LIKE '%{}%';",
            values.current_value.as_deref().unwrap_or_default()
        );
    }

    let filter = if values.user_id.is_some() {
        where_clause
    } else {
        "1=1"
    };
    format!("SELECT user_id, {column} FROM {table} WHERE {filter};")
}
