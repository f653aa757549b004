use std::iter::Enumerate;
use std::str::Lines;

use crate::document::{DEFAULT_SECTION_NAME, Document};
use crate::error::ConfigError;
use crate::util::clean_name;

/// Marks a line as continued when it ends an odd run, and cancels the special meaning of the
/// character following it inside a key/value line.
pub const ESCAPE_TOKEN: char = '\\';

const COMMENT_POUND: char = '#';
const COMMENT_SEMICOLON: char = ';';
const SECTION_PREFIX: char = '[';
const SECTION_SUFFIX: char = ']';

/// What a single physical line contributes to a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LineKind<'a> {
    Blank,
    Comment,
    /// Carries the already-cleaned section name.
    Header(&'a str),
    Content,
}

pub(crate) fn classify(line: &str) -> LineKind<'_> {
    let line = line.trim();

    if line.is_empty() {
        LineKind::Blank
    } else if line.starts_with(COMMENT_POUND) || line.starts_with(COMMENT_SEMICOLON) {
        LineKind::Comment
    } else if let Some(name) = line
        .strip_prefix(SECTION_PREFIX)
        .and_then(|s| s.strip_suffix(SECTION_SUFFIX))
    {
        LineKind::Header(clean_name(name))
    } else {
        LineKind::Content
    }
}

/// Represents an on-going parse.
#[derive(Debug, Clone)]
pub struct Parser<'a> {
    lines: Enumerate<Lines<'a>>,
}

impl<'a> Parser<'a> {
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().enumerate(),
        }
    }

    /// Consumes every line of the input and assembles the resulting document.
    ///
    /// Content lines are buffered per section and only split into key/value pairs once the
    /// section closes, either at the next header or at the end of the input.
    pub fn into_document(self) -> Result<Document, ConfigError> {
        let mut document = Document::new();
        let mut section_name = DEFAULT_SECTION_NAME;
        let mut content = Vec::<(usize, &'a str)>::with_capacity(32);

        for (i, line) in self.lines {
            match classify(line) {
                LineKind::Blank | LineKind::Comment => {}
                LineKind::Header(name) => {
                    flush_section(&mut document, section_name, &content)?;
                    content.clear();
                    section_name = name;
                    tracing::debug!("parsing [{section_name}]");
                }
                // Line numbers are 1-based for error messages.
                LineKind::Content => content.push((i + 1, line)),
            }
        }

        flush_section(&mut document, section_name, &content)?;

        Ok(document)
    }
}

/// Splits buffered content into pairs and stores them in the named section. A section with no
/// buffered content is never created.
fn flush_section(
    document: &mut Document,
    name: &str,
    content: &[(usize, &str)],
) -> Result<(), ConfigError> {
    if content.is_empty() {
        return Ok(());
    }

    let section = document.add_section(name);

    for (line, logical) in LogicalLines::new(content.iter().copied()) {
        let Some((key, value)) = split_key_value(&logical) else {
            return Err(ConfigError::MalformedLine {
                line,
                content: logical,
            });
        };

        tracing::trace!("discovered key/value pair: {key} = {value}");
        section.insert(key, value);
    }

    Ok(())
}

/// Returns `true` if `line` ends with an odd number of escape tokens.
#[must_use]
pub fn is_continued(line: &str) -> bool {
    let run = line
        .chars()
        .rev()
        .take_while(|&c| c == ESCAPE_TOKEN)
        .count();

    run % 2 != 0
}

/// Joins physical lines into logical lines.
///
/// Each physical line is trimmed. A continued line loses its final escape token and the next
/// physical line is appended directly, with nothing inserted between them. Each item carries
/// the number of the physical line the logical line started on.
#[derive(Debug, Clone)]
pub(crate) struct LogicalLines<I> {
    lines: I,
}

impl<I> LogicalLines<I> {
    pub(crate) fn new(lines: I) -> Self {
        Self { lines }
    }
}

impl<'a, I> Iterator for LogicalLines<I>
where
    I: Iterator<Item = (usize, &'a str)>,
{
    type Item = (usize, String);

    fn next(&mut self) -> Option<Self::Item> {
        let mut buffer = String::new();
        let mut start = None::<usize>;

        for (number, line) in self.lines.by_ref() {
            let line = line.trim();
            start.get_or_insert(number);

            if is_continued(line) {
                buffer.push_str(&line[..line.len() - ESCAPE_TOKEN.len_utf8()]);
                continue;
            }

            buffer.push_str(line);
            return start.map(|n| (n, buffer));
        }

        // Input ended while a continuation was still pending.
        start.map(|n| (n, buffer))
    }
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == ':' || c == '='
}

/// Splits one logical content line into a key and a value.
///
/// The key ends at the first whitespace, `:` or `=` not directly preceded by an escape token.
/// Separators at the start of the value are skipped. Escape tokens never reach the output.
/// Returns `None` if either the key or the value is empty after trimming.
#[must_use]
pub fn split_key_value(line: &str) -> Option<(String, String)> {
    let line = line.trim();

    let mut key = String::with_capacity(line.len());
    let mut value = String::with_capacity(line.len());
    let mut building_key = true;
    let mut previous_was_escape = false;

    for c in line.chars() {
        let escaped = previous_was_escape;
        previous_was_escape = c == ESCAPE_TOKEN;

        if c == ESCAPE_TOKEN {
            continue;
        }

        if building_key {
            if is_separator(c) && !escaped {
                building_key = false;
            } else {
                key.push(c);
            }
        } else if value.is_empty() && is_separator(c) {
            // Swallow the separators between the key and the value.
        } else {
            value.push(c);
        }
    }

    let key = key.trim();
    let value = value.trim();

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key.to_owned(), value.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(key: &str, value: &str) -> Option<(String, String)> {
        Some((key.to_owned(), value.to_owned()))
    }

    fn logical(lines: &[&str]) -> Vec<String> {
        LogicalLines::new(lines.iter().copied().enumerate())
            .map(|(_, line)| line)
            .collect()
    }

    #[test]
    fn classify_lines() {
        assert_eq!(classify(""), LineKind::Blank);
        assert_eq!(classify("   \t"), LineKind::Blank);
        assert_eq!(classify("  # comment"), LineKind::Comment);
        assert_eq!(classify("; comment"), LineKind::Comment);
        assert_eq!(classify(" [ users ] "), LineKind::Header("users"));
        assert_eq!(classify("[]"), LineKind::Header(""));
        assert_eq!(classify("[  ]"), LineKind::Header(""));
        assert_eq!(classify("[a]b]"), LineKind::Header("a]b"));
        assert_eq!(classify("[unterminated"), LineKind::Content);
        assert_eq!(classify("key = [value]"), LineKind::Content);
    }

    #[test]
    fn separators_are_interchangeable() {
        let expected = pair("foo", "bar");

        for line in [
            "foo = bar",
            "foo:bar",
            "foo   bar",
            "foo=bar",
            "foo: bar",
            "foo  :bar",
            "foo:bar        ",
            "foo        =bar        ",
            "  foo\t=\tbar  ",
        ] {
            assert_eq!(split_key_value(line), expected, "line: {line:?}");
        }
    }

    #[test]
    fn value_keeps_inner_separators() {
        assert_eq!(
            split_key_value("root = secret, admin"),
            pair("root", "secret, admin")
        );
        assert_eq!(
            split_key_value("prop4 : value 4"),
            pair("prop4", "value 4")
        );
        assert_eq!(
            split_key_value("url = http://host:8080/?a=b"),
            pair("url", "http://host:8080/?a=b")
        );
    }

    #[test]
    fn key_without_value_fails() {
        assert_eq!(split_key_value("justAKey"), None);
        assert_eq!(split_key_value("  Truth  "), None);
        assert_eq!(split_key_value("key ="), None);
        assert_eq!(split_key_value("= value"), None);
        assert_eq!(split_key_value(""), None);
    }

    #[test]
    fn escaped_separator_joins_key() {
        assert_eq!(
            split_key_value(r"Truth\=Beauty = value"),
            pair("Truth=Beauty", "value")
        );
        assert_eq!(
            split_key_value(r"a\ b c"),
            pair("a b", "c")
        );
    }

    #[test]
    fn escaped_separator_without_later_separator_fails() {
        assert_eq!(split_key_value(r"Truth\=Beauty"), None);
        assert_eq!(split_key_value(r"Truth\:Beauty"), None);
    }

    #[test]
    fn escape_tokens_are_dropped() {
        assert_eq!(split_key_value(r"ke\y = va\lue"), pair("key", "value"));
        assert_eq!(split_key_value(r"key = value\\"), pair("key", "value"));
    }

    #[test]
    fn escape_is_judged_by_previous_character() {
        // The second escape token still precedes the separator, so it does not end the key.
        assert_eq!(split_key_value(r"a\\=b"), None);
        assert_eq!(split_key_value(r"a\\=b c"), pair("a=b", "c"));
    }

    #[test]
    fn continued_lines() {
        assert!(!is_continued("prop = value "));
        assert!(is_continued(r"prop = value\"));
        assert!(!is_continued(r"prop = value\\"));
        assert!(is_continued(r"prop = value\\\"));
        assert!(!is_continued(""));
    }

    #[test]
    fn continuation_inserts_nothing() {
        assert_eq!(logical(&[r"key = value\", "more"]), vec!["key = valuemore"]);
        assert_eq!(
            logical(&[r"prop5 some long \", "      value "]),
            vec!["prop5 some long value"]
        );
    }

    #[test]
    fn even_escape_run_does_not_continue() {
        assert_eq!(
            logical(&[r"a = b\\", "c = d"]),
            vec![r"a = b\\", "c = d"]
        );
    }

    #[test]
    fn odd_escape_run_keeps_remaining_pairs() {
        assert_eq!(logical(&[r"a = b\\\", "c"]), vec![r"a = b\\c"]);
    }

    #[test]
    fn chained_continuations() {
        assert_eq!(
            logical(&[r"a = 1\", r"2\", "3", "b = 4"]),
            vec!["a = 123", "b = 4"]
        );
    }

    #[test]
    fn pending_continuation_at_end_is_emitted() {
        assert_eq!(logical(&["a = 1", r"b = 2\"]), vec!["a = 1", "b = 2"]);
    }

    #[test]
    fn lone_escape_token_line_is_malformed() {
        assert_eq!(logical(&["\\"]), vec![""]);

        let err = Parser::new("[a]\n\\\n")
            .into_document()
            .expect_err("expected a malformed line error");

        assert!(matches!(
            err,
            ConfigError::MalformedLine { line: 2, ref content } if content.is_empty()
        ));
    }

    #[test]
    fn logical_lines_report_start_line() {
        let lines = [(3, r"a = 1\"), (4, "2"), (7, "b = 3")];
        let numbered = LogicalLines::new(lines.into_iter()).collect::<Vec<_>>();

        assert_eq!(
            numbered,
            vec![(3, "a = 12".to_owned()), (7, "b = 3".to_owned())]
        );
    }

    #[test]
    fn malformed_line_reports_line_number() {
        let text = "[main]\nok = yes\n\n# comment\nbroken\n";
        let err = Parser::new(text)
            .into_document()
            .expect_err("expected a malformed line error");

        assert!(matches!(
            err,
            ConfigError::MalformedLine { line: 5, ref content } if content == "broken"
        ));
    }
}
