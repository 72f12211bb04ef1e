use colored::*;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Style, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::{as_24_bit_terminal_escaped, LinesWithEndings};

const THEME: &str = "Solarized (dark)";
const RULE_WIDTH: usize = 58;

/// Terminal renderer for complete responses: fenced blocks are boxed and
/// syntax highlighted, everything else passes through.
pub struct Highlighter {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
}

impl Highlighter {
    pub fn new() -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
        }
    }

    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        if !colored::control::SHOULD_COLORIZE.should_colorize() {
            return code.to_string();
        }
        let Some(theme) = self.theme_set.themes.get(THEME) else {
            return code.to_string();
        };

        let syntax = lang
            .and_then(|lang| {
                self.syntax_set
                    .find_syntax_by_token(lang)
                    .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            })
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let mut highlighter = HighlightLines::new(syntax, theme);
        let mut output = String::new();
        for line in LinesWithEndings::from(code) {
            match highlighter.highlight_line(line, &self.syntax_set) {
                Ok(ranges) => {
                    let ranges: Vec<(Style, &str)> = ranges;
                    output.push_str(&as_24_bit_terminal_escaped(&ranges[..], false));
                }
                Err(_) => output.push_str(line),
            }
        }
        // Reset colours so the footer is not tinted
        output.push_str("\x1b[0m");
        output
    }

    fn block(&self, label: &str, body: &str, lang: Option<&str>) -> String {
        let mut out = format!(
            "{}[{}]{}\n",
            "┌─".dimmed(),
            label.cyan(),
            "─".repeat(RULE_WIDTH.saturating_sub(label.chars().count() + 4)).dimmed()
        );
        let mut body = body.to_string();
        if !body.is_empty() && !body.ends_with('\n') {
            body.push('\n');
        }
        out.push_str(&self.highlight_code(&body, lang));
        out.push_str(&format!("{}\n", format!("└{}", "─".repeat(RULE_WIDTH)).dimmed()));
        out
    }

    /// A boxed block with a free-form label, used for tool output
    pub fn labelled(&self, label: &str, body: &str) -> String {
        self.block(label, body, None)
    }

    pub fn render(&self, text: &str) -> String {
        let mut output = String::new();
        let mut rest = text;

        while let Some(start) = rest.find("```") {
            output.push_str(&rest[..start]);
            let after_fence = &rest[start + 3..];

            let (lang, body_start) = match after_fence.find('\n') {
                Some(nl) => (after_fence[..nl].trim(), &after_fence[nl + 1..]),
                None => (after_fence.trim(), ""),
            };
            let lang = (!lang.is_empty()).then_some(lang);

            // An unterminated block runs to the end of the text
            let (body, remainder) = match body_start.find("```") {
                Some(end) => (&body_start[..end], &body_start[end + 3..]),
                None => (body_start, ""),
            };

            output.push_str(&self.block(lang.unwrap_or("code"), body, lang));
            rest = remainder.strip_prefix('\n').unwrap_or(remainder);
        }

        output.push_str(rest);
        output
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_passes_through() {
        colored::control::set_override(false);
        let h = Highlighter::new();
        assert_eq!(h.render("just words\n"), "just words\n");
    }

    #[test]
    fn test_code_block_is_boxed() {
        colored::control::set_override(false);
        let h = Highlighter::new();
        let out = h.render("before\n```python\nprint(1)\n```\nafter");
        assert!(out.starts_with("before\n┌─[python]"));
        assert!(out.contains("print(1)"));
        assert!(out.contains("└──"));
        assert!(out.ends_with("after"));
        assert!(!out.contains("```"));
    }

    #[test]
    fn test_unterminated_block_is_closed() {
        colored::control::set_override(false);
        let out = Highlighter::new().render("```\nx = 1\n");
        assert!(out.starts_with("┌─[code]"));
        assert!(out.contains("x = 1"));
        assert!(out.trim_end().ends_with('─'));
    }
}
