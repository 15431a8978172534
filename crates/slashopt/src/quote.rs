//! Windows command-line quoting.
//!
//! [`quote`] produces text that [`split`] (and the Microsoft C runtime's argv
//! tokenizer) reads back as the original string.

/// Characters that force a value to be wrapped in double quotes.
const NEEDS_QUOTES: [char; 5] = [' ', '\t', '\u{0B}', '\n', '"'];

/// Quote `value` so it survives command-line tokenization unchanged.
///
/// Values that are non-empty and free of whitespace and double quotes are
/// returned as-is.
pub fn quote(value: &str) -> String {
    if !value.is_empty() && !value.contains(NEEDS_QUOTES) {
        return value.to_string();
    }

    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    let mut backslashes = 0usize;
    for c in value.chars() {
        match c {
            '\\' => backslashes += 1,
            '"' => {
                push_backslashes(&mut out, backslashes * 2 + 1);
                out.push('"');
                backslashes = 0;
            }
            _ => {
                push_backslashes(&mut out, backslashes);
                out.push(c);
                backslashes = 0;
            }
        }
    }
    // A run before the closing quote would escape it.
    push_backslashes(&mut out, backslashes * 2);
    out.push('"');
    out
}

/// Quote each value and join them with single spaces.
pub fn join<I, S>(values: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .map(|v| quote(v.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split a command line into arguments.
///
/// Spaces and tabs separate arguments outside quotes. `2n` backslashes before
/// a `"` become `n` backslashes and the quote toggles quoting; `2n+1`
/// backslashes become `n` backslashes and a literal `"`. Backslashes not
/// followed by `"` are literal.
pub fn split(line: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_arg = false;
    let mut quoted = false;
    let mut backslashes = 0usize;

    for c in line.chars() {
        match c {
            '\\' => {
                backslashes += 1;
                in_arg = true;
            }
            '"' => {
                push_backslashes(&mut current, backslashes / 2);
                if backslashes % 2 == 1 {
                    current.push('"');
                } else {
                    quoted = !quoted;
                }
                backslashes = 0;
                in_arg = true;
            }
            ' ' | '\t' if !quoted => {
                push_backslashes(&mut current, backslashes);
                backslashes = 0;
                if in_arg {
                    args.push(std::mem::take(&mut current));
                    in_arg = false;
                }
            }
            _ => {
                push_backslashes(&mut current, backslashes);
                backslashes = 0;
                current.push(c);
                in_arg = true;
            }
        }
    }

    push_backslashes(&mut current, backslashes);
    if in_arg {
        args.push(current);
    }
    args
}

fn push_backslashes(out: &mut String, count: usize) {
    out.extend(std::iter::repeat_n('\\', count));
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn plain_values_are_untouched() {
        assert_eq!(quote("MyCommand"), "MyCommand");
        assert_eq!(quote(r"C:\dir\file.txt"), r"C:\dir\file.txt");
        assert_eq!(quote(r"trailing\"), r"trailing\");
    }

    #[test]
    fn quotes_when_required() {
        assert_eq!(quote(""), r#""""#);
        assert_eq!(quote("two words"), r#""two words""#);
        assert_eq!(quote("tab\there"), "\"tab\there\"");
        assert_eq!(quote("v\u{0B}t"), "\"v\u{0B}t\"");
        assert_eq!(quote("line\nbreak"), "\"line\nbreak\"");
    }

    #[test]
    fn escapes_quotes_and_preceding_backslashes() {
        assert_eq!(quote(r#"say "hi""#), r#""say \"hi\"""#);
        assert_eq!(quote(r#"a\"b"#), r#""a\\\"b""#);
        assert_eq!(quote(r#"a\\"b"#), r#""a\\\\\"b""#);
    }

    #[test]
    fn doubles_backslashes_before_closing_quote() {
        assert_eq!(quote(r"dir name\"), r#""dir name\\""#);
        assert_eq!(quote(r"x y\\"), r#""x y\\\\""#);
        // Backslashes not followed by a quote stay single.
        assert_eq!(quote(r"a b\c"), r#""a b\c""#);
    }

    #[test]
    fn split_handles_quotes_and_escapes() {
        assert_eq!(split(r#"a "b c" d"#), ["a", "b c", "d"]);
        assert_eq!(split(r#""" x"#), ["", "x"]);
        assert_eq!(split(r#"a\\\"b"#), [r#"a\"b"#]);
        assert_eq!(split(r"a\\b c\"), [r"a\\b", r"c\"]);
        assert_eq!(split("  \t "), Vec::<String>::new());
        assert_eq!(split(r#"pre"mid dle"post"#), ["premid dlepost"]);
    }

    #[test]
    fn quote_round_trips_through_split() {
        let samples = [
            "",
            "plain",
            "two words",
            r"\",
            r"\\",
            r#"""#,
            r#"\""#,
            r#"a\\"b\c\"#,
            "new\nline",
            "\t",
            r#"end with quote""#,
            r"C:\Program Files\App\",
            "ünïcödé and spaces",
        ];
        for s in samples {
            assert_eq!(split(&quote(s)), [s], "value: {s:?}");
        }

        let line = join(samples);
        assert_eq!(split(&line), samples);
    }

    /// Strings built mostly from the characters the quoting rules care about.
    fn tricky_string() -> impl Strategy<Value = String> {
        let tricky = prop::sample::select(vec![' ', '\t', '\u{0B}', '\n', '"', '\\']);
        prop::collection::vec(prop_oneof![3 => tricky, 1 => any::<char>()], 0..24)
            .prop_map(|chars| chars.into_iter().collect::<String>())
    }

    proptest! {
        #[test]
        fn any_string_round_trips(s in tricky_string()) {
            prop_assert_eq!(split(&quote(&s)), vec![s.clone()]);
        }

        #[test]
        fn any_list_round_trips_through_join(values in prop::collection::vec(tricky_string(), 0..8)) {
            prop_assert_eq!(split(&join(&values)), values);
        }
    }
}
