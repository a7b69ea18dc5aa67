//! Placeholder substitution and message layout.

use coderag_types::config::PromptStyle;
use coderag_types::llm::Message;

use super::templates::{GLOBAL_RULE_TEMPLATE, INSTRUCTION_TEMPLATE, RAG_QA_TEMPLATE};

/// Replace every `{key}` in `template` with its value.
///
/// Substitution is single-pass, so values containing `{...}` are never
/// re-expanded. Placeholders with no matching key are kept verbatim.
pub fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let replaced = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (close, *v))
        });
        match replaced {
            Some((close, value)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Render retrieved rule texts as a bracketed list of quoted strings.
pub fn format_rag_docs(docs: &[String]) -> String {
    let items: Vec<String> = docs.iter().map(|d| quote(d)).collect();
    format!("[{}]", items.join(", "))
}

fn quote(text: &str) -> String {
    let q = if text.contains('\'') && !text.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(text.len() + 2);
    out.push(q);
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == q => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(q);
    out
}

/// Question-answering prompt grounded in retrieved rules.
pub fn rag_qa_prompt(docs: &[String], query: &str) -> String {
    fill(
        RAG_QA_TEMPLATE,
        &[("docs", &format_rag_docs(docs)), ("query", query)],
    )
}

/// Prefix `prompt` with retrieved rules. No rules means no prefix.
pub fn with_rules(prompt: &str, rules: &[String]) -> String {
    if rules.is_empty() {
        return prompt.to_string();
    }
    let listed: Vec<String> = rules.iter().map(|r| format!("- {}", r.trim())).collect();
    fill(
        GLOBAL_RULE_TEMPLATE,
        &[("rules", &listed.join("\n")), ("prompt", prompt)],
    )
}

/// Lay out a system prompt and user prompt for the target model.
///
/// Returns the optional system prompt and the message list for a
/// `CompletionRequest`.
pub fn render_request(style: PromptStyle, system: &str, user: &str) -> (Option<String>, Vec<Message>) {
    match style {
        PromptStyle::Chat => {
            let system = (!system.trim().is_empty()).then(|| system.to_string());
            (system, vec![Message::user(user)])
        }
        PromptStyle::Instruction => {
            let folded = fill(
                INSTRUCTION_TEMPLATE,
                &[("system", system.trim()), ("instruction", user)],
            );
            (None, vec![Message::user(folded)])
        }
        PromptStyle::UserOnly => (None, vec![Message::user(user)]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::templates::{SINGLE_CODE_REVIEW_TEMPLATE, TOTAL_SUMMARY_TEMPLATE};

    #[test]
    fn test_fill_replaces_known_keys_only() {
        let out = fill("a {x} b {y} c {x}", &[("x", "1")]);
        assert_eq!(out, "a 1 b {y} c 1");
    }

    #[test]
    fn test_fill_does_not_reexpand_values() {
        let out = fill("{a}{b}", &[("a", "{b}"), ("b", "2")]);
        assert_eq!(out, "{b}2");
    }

    #[test]
    fn test_fill_handles_json_braces() {
        let out = fill("{\"type\": \"bugfix\"} {code_diff}", &[("code_diff", "x")]);
        assert_eq!(out, "{\"type\": \"bugfix\"} x");
        assert_eq!(fill("unclosed {", &[]), "unclosed {");
    }

    #[test]
    fn test_single_review_template_has_code() {
        let prompt = fill(SINGLE_CODE_REVIEW_TEMPLATE, &[("code_diff", "def f(): pass")]);
        assert!(prompt.trim_end().ends_with("def f(): pass"));
        assert!(!prompt.contains("{code_diff}"));
    }

    #[test]
    fn test_total_summary_template_slots() {
        let prompt = fill(
            TOTAL_SUMMARY_TEMPLATE,
            &[
                ("first_code_review", "R"),
                ("first_summary", "S"),
                ("code_diff", "C"),
            ],
        );
        assert!(!prompt.contains('{'));
    }

    #[test]
    fn test_format_rag_docs() {
        let docs = vec!["plain".to_string(), "it's".to_string(), "a\nb".to_string()];
        assert_eq!(format_rag_docs(&docs), "['plain', \"it's\", 'a\\nb']");
        assert_eq!(format_rag_docs(&[]), "[]");
    }

    #[test]
    fn test_rag_qa_prompt() {
        let prompt = rag_qa_prompt(&["rule".to_string()], "審核 API 要用甚麼規則?");
        assert_eq!(
            prompt,
            "根據以下規則回答問題：\n['rule']\n\n問題：審核 API 要用甚麼規則?\n回答："
        );
    }

    #[test]
    fn test_with_rules() {
        assert_eq!(with_rules("P", &[]), "P");
        let wrapped = with_rules("P", &["one".to_string(), "two".to_string()]);
        assert!(wrapped.contains("- one\n- two"));
        assert!(wrapped.ends_with("\n\nP"));
    }

    #[test]
    fn test_render_request_styles() {
        let (system, messages) = render_request(PromptStyle::Chat, "sys", "hi");
        assert_eq!(system.as_deref(), Some("sys"));
        assert_eq!(messages.len(), 1);

        let (system, _) = render_request(PromptStyle::Chat, "  ", "hi");
        assert!(system.is_none());

        let (system, messages) = render_request(PromptStyle::Instruction, "sys", "hi");
        assert!(system.is_none());
        assert_eq!(
            messages[0].content,
            "sys\n\n@@ Instruction\nhi\n\n@@ Response\n"
        );

        let (system, messages) = render_request(PromptStyle::UserOnly, "sys", "hi");
        assert!(system.is_none());
        assert_eq!(messages[0].content, "hi");
    }
}
