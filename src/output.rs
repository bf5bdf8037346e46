//! Rendering of results for the terminal

use crate::audit_log::LogEntry;
use crate::generator::library::matching_types;
use crate::generator::{GenerationResult, GeneratorResult, TemplateLibrary};
use nu_ansi_term::{Color, Style};

/// Script and explanation as plain or ANSI-coloured text
pub fn render_text(result: &GenerationResult, color: bool) -> String {
    let script = if color {
        highlight_script(&result.script)
    } else {
        result.script.clone()
    };
    let label = paint(color, Style::new().bold(), "Explanation:");
    format!("Script: {script}\n{label} {}", result.explanation)
}

/// `{"script": ..., "explanation": ...}`
pub fn render_json(result: &GenerationResult) -> GeneratorResult<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// Colour script lines by role: transaction control, diagnostics, inert comments
pub fn highlight_script(script: &str) -> String {
    script
        .split('\n')
        .map(|line| {
            let trimmed = line.trim_start();
            let style = if trimmed.starts_with("--") || trimmed.starts_with("/*") {
                Style::new().fg(Color::DarkGray)
            } else if trimmed.starts_with("BEGIN") {
                Style::new().fg(Color::Green).bold()
            } else if trimmed.starts_with("SELECT") {
                Style::new().fg(Color::Cyan)
            } else {
                Style::new().fg(Color::Yellow)
            };
            if line.is_empty() {
                String::new()
            } else {
                style.paint(line).to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Library templates in order, each with the intent types it would serve
pub fn render_templates(library: &TemplateLibrary) -> String {
    if library.is_empty() {
        return "No templates loaded.".to_string();
    }

    library
        .iter()
        .enumerate()
        .map(|(idx, template)| {
            let types = matching_types(template)
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>();
            let types = if types.is_empty() {
                "-".to_string()
            } else {
                types.join(", ")
            };
            let first_line = template
                .lines()
                .find(|line| !line.trim().is_empty())
                .unwrap_or("");
            format!("{:>3}  [{}]  {}", idx + 1, types, first_line.trim())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_history(entries: &[LogEntry]) -> String {
    if entries.is_empty() {
        return "No generated scripts logged yet.".to_string();
    }

    entries
        .iter()
        .map(|entry| {
            format!(
                "{} {} {}\n{}",
                entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
                entry.user,
                entry.request,
                entry.script.trim()
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn paint(color: bool, style: Style, text: &str) -> String {
    if color {
        style.paint(text).to_string()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    fn result() -> GenerationResult {
        GenerationResult {
            script: "\nBEGIN TRANSACTION;\nSELECT 1;\nDELETE FROM users WHERE user_id = 7;\n\
                     --COMMIT;\n--ROLLBACK;"
                .to_string(),
            explanation: "updates delete for a user (review before committing)".to_string(),
        }
    }

    #[rstest]
    fn test_render_plain_text() {
        let text = render_text(&result(), false);
        assert!(text.starts_with("Script: \nBEGIN TRANSACTION;"));
        assert!(text.ends_with(
            "\nExplanation: updates delete for a user (review before committing)"
        ));
    }

    #[rstest]
    fn test_render_coloured_text_keeps_content() {
        let text = render_text(&result(), true);
        assert!(text.contains("\u{1b}["));
        assert!(text.contains("DELETE FROM users WHERE user_id = 7;"));
    }

    #[rstest]
    fn test_render_json() {
        let json = render_json(&result()).unwrap();
        let parsed: GenerationResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, result());
    }

    #[rstest]
    fn test_render_templates() {
        let library = TemplateLibrary::from_iter([
            "\n-- rename\nUPDATE users SET last_name = 'x';",
            "SELECT 1;",
        ]);
        let text = render_templates(&library);
        assert_eq!(
            text,
            "  1  [name]  -- rename\n  2  [-]  SELECT 1;"
        );
        assert_eq!(render_templates(&TemplateLibrary::default()), "No templates loaded.");
    }

    #[rstest]
    fn test_render_history() {
        let entry = LogEntry {
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap(),
            user: "jdoe".to_string(),
            request: "delete row".to_string(),
            script: "\nBEGIN TRANSACTION;".to_string(),
        };
        assert_eq!(
            render_history(&[entry]),
            "2024-05-01 12:30:00 jdoe delete row\nBEGIN TRANSACTION;"
        );
        assert_eq!(render_history(&[]), "No generated scripts logged yet.");
    }
}
