//! Token scanning and callback dispatch.
//!
//! Tokens are consumed strictly left to right. The first violation stops the
//! scan, and callbacks that already ran are not undone.

use std::collections::HashSet;

use crate::decl::{Chain, OptionAction};
use crate::env;
use crate::error::{ParseError, ParseResult};
use crate::registry::{Registry, normalize_key};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Seen {
    Option(usize),
    Argument(usize),
}

/// State owned by a single parse call.
#[derive(Debug)]
struct Scan {
    allow_options: bool,
    seen: HashSet<Seen>,
    /// Next positional slot; `None` once every slot has been handed over.
    cursor: Option<usize>,
}

impl<C> Registry<C> {
    /// Parse `tokens`, dispatching matches to the declared callbacks.
    ///
    /// Returns `false` on the first malformed token or when a required
    /// positional slot received nothing.
    pub fn parse_with<I, S>(&self, tokens: I, ctx: &mut C) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.try_parse_with(tokens, ctx).is_ok()
    }

    /// Like [`parse_with`](Self::parse_with), but reports why parsing stopped.
    ///
    /// # Panics
    ///
    /// If a positional slot that does not allow multiple values asks to stay
    /// on itself via [`Chain::Stay`].
    pub fn try_parse_with<I, S>(&self, tokens: I, ctx: &mut C) -> ParseResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut scan = Scan {
            allow_options: true,
            seen: HashSet::new(),
            cursor: if self.arguments.is_empty() { None } else { Some(0) },
        };

        for (index, token) in tokens.into_iter().enumerate() {
            let token = token.as_ref();
            if let Err(err) = self.match_token(&mut scan, token, ctx) {
                tracing::debug!(index, token, error = %err, "token rejected");
                return Err(err);
            }
        }

        if let Some((_, missing)) = self
            .arguments
            .iter()
            .enumerate()
            .find(|(idx, arg)| !arg.optional && !scan.seen.contains(&Seen::Argument(*idx)))
        {
            tracing::debug!(argument = %missing.meta, "required argument missing");
            return Err(ParseError::MissingArgument(missing.meta.clone()));
        }

        Ok(())
    }

    fn match_token(&self, scan: &mut Scan, token: &str, ctx: &mut C) -> ParseResult<()> {
        if token.is_empty() {
            return Err(ParseError::EmptyToken);
        }

        if scan.allow_options && token.starts_with(self.prefix) {
            self.match_option(scan, token, ctx)
        } else {
            scan.cursor = self.match_argument(scan.cursor, &mut scan.seen, token, ctx)?;
            Ok(())
        }
    }

    /// Feed `token` to the slot at `cursor` and return where the cursor ends up.
    fn match_argument(
        &self,
        cursor: Option<usize>,
        seen: &mut HashSet<Seen>,
        token: &str,
        ctx: &mut C,
    ) -> ParseResult<Option<usize>> {
        let Some(idx) = cursor else {
            return Err(ParseError::UnexpectedArgument(token.to_string()));
        };
        let arg = &self.arguments[idx];

        if !seen.insert(Seen::Argument(idx)) && !arg.multiple {
            return Err(ParseError::ArgumentRepeated(arg.meta.clone()));
        }

        tracing::trace!(argument = %arg.meta, value = token, "positional matched");
        let chain = arg.dispatch(ctx, token);
        match chain {
            Chain::Stay if !arg.multiple => panic!(
                "positional argument {} does not allow multiple values but asked to keep consuming",
                arg.meta
            ),
            Chain::Stay => Ok(Some(idx)),
            Chain::Advance => {
                let next = idx + 1;
                Ok((next < self.arguments.len()).then_some(next))
            }
        }
    }

    fn match_option(&self, scan: &mut Scan, token: &str, ctx: &mut C) -> ParseResult<()> {
        let body = &token[self.prefix.len_utf8()..];
        if body.is_empty() {
            return Err(ParseError::BarePrefix);
        }

        let mut chars = body.chars();
        if chars.next() == Some(self.prefix) && chars.next().is_none() {
            tracing::trace!("option terminator");
            scan.allow_options = false;
            return Ok(());
        }

        let mut parts = body.splitn(2, |c: char| self.delimiters.contains(&c));
        let key = parts.next().unwrap_or_default();
        let inline = parts.next();
        if key.is_empty() {
            return Err(ParseError::MalformedOption(token.to_string()));
        }

        let normalized = normalize_key(key);
        let Some(idx) = self.keys.get(&normalized).copied() else {
            return Err(ParseError::UnknownOption(token.to_string()));
        };
        let option = &self.options[idx];
        let shown = format!("{}{}", self.prefix, normalized);

        if !scan.seen.insert(Seen::Option(idx)) && !option.multiple {
            return Err(ParseError::OptionRepeated(shown));
        }

        match (&option.action, inline) {
            (OptionAction::Value { action, .. }, Some(value)) => {
                tracing::trace!(option = %shown, value, "option matched");
                action(ctx, value);
            }
            (OptionAction::Value { .. }, None) => return Err(ParseError::MissingValue(shown)),
            (OptionAction::Flag(action), None) => {
                tracing::trace!(option = %shown, "flag matched");
                action(ctx);
            }
            (OptionAction::Flag(_), Some(_)) => return Err(ParseError::UnexpectedValue(shown)),
        }
        Ok(())
    }
}

/// Forms for callers that do not need a context object.
impl Registry<()> {
    pub fn parse<I, S>(&self, tokens: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.parse_with(tokens, &mut ())
    }

    pub fn try_parse<I, S>(&self, tokens: I) -> ParseResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.try_parse_with(tokens, &mut ())
    }

    /// Parse the process arguments, skipping the program name.
    pub fn parse_env(&self) -> bool {
        self.parse(env::args())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decl::{ArgumentSpec, OptionSpec};

    #[derive(Debug, Default)]
    struct Log {
        flags: Vec<&'static str>,
        values: Vec<(&'static str, String)>,
        args: Vec<(&'static str, String)>,
    }

    fn registry() -> Registry<Log> {
        Registry::builder()
            .command("tool")
            .option(OptionSpec::flag("v|verbose", "Verbose", |l: &mut Log| l.flags.push("v")).multiple())
            .option(OptionSpec::flag("q", "Quiet", |l: &mut Log| l.flags.push("q")))
            .option(OptionSpec::value("o|out", "FILE", "Output", |l: &mut Log, v| {
                l.values.push(("o", v.to_string()))
            }))
            .argument(ArgumentSpec::new("SRC", |l: &mut Log, v| l.args.push(("SRC", v.to_string()))))
            .argument(
                ArgumentSpec::new("REST", |l: &mut Log, v| l.args.push(("REST", v.to_string())))
                    .optional()
                    .multiple(),
            )
            .build()
            .unwrap()
    }

    fn run(tokens: &[&str]) -> (ParseResult<()>, Log) {
        let mut log = Log::default();
        let res = registry().try_parse_with(tokens, &mut log);
        (res, log)
    }

    #[test]
    fn options_recognized_before_any_terminator() {
        let (res, log) = run(&["/V", "src"]);
        assert_eq!(res, Ok(()));
        assert_eq!(log.flags, ["v"]);
    }

    #[test]
    fn options_and_positionals_interleave() {
        let (res, log) = run(&["a", "/verbose", "b", "/o:out.txt", "c", "/v"]);
        assert_eq!(res, Ok(()));
        assert_eq!(log.flags, ["v", "v"]);
        assert_eq!(log.values, [("o", "out.txt".to_string())]);
        assert_eq!(
            log.args,
            [("SRC", "a".to_string()), ("REST", "b".to_string()), ("REST", "c".to_string())]
        );
    }

    #[test]
    fn option_matches_are_traced() {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_test_writer()
            .finish();
        let (res, log) = tracing::subscriber::with_default(subscriber, || {
            run(&["/o=x", "/v", "/Q", "/q", "src"])
        });
        assert_eq!(res, Err(ParseError::OptionRepeated("/Q".to_string())));
        assert_eq!(log.values, [("o", "x".to_string())]);
        assert_eq!(log.flags, ["v", "q"]);
    }

    #[test]
    fn value_split_happens_once() {
        let (res, log) = run(&["/o=a=b:c", "src"]);
        assert_eq!(res, Ok(()));
        assert_eq!(log.values, [("o", "a=b:c".to_string())]);
    }

    #[test]
    fn empty_inline_value_is_a_value() {
        let (res, log) = run(&["/o=", "src"]);
        assert_eq!(res, Ok(()));
        assert_eq!(log.values, [("o", String::new())]);
    }

    #[test]
    fn rejections() {
        let cases: &[(&[&str], ParseError)] = &[
            (&["src", ""], ParseError::EmptyToken),
            (&["/", "src"], ParseError::BarePrefix),
            (&["/=x", "src"], ParseError::MalformedOption("/=x".to_string())),
            (&["/nope", "src"], ParseError::UnknownOption("/nope".to_string())),
            (&["/q", "/Q", "src"], ParseError::OptionRepeated("/Q".to_string())),
            (&["/o", "src"], ParseError::MissingValue("/O".to_string())),
            (&["/q=1", "src"], ParseError::UnexpectedValue("/Q".to_string())),
            (&["/v"], ParseError::MissingArgument("SRC".to_string())),
            (&["//x", "src"], ParseError::UnknownOption("//x".to_string())),
        ];
        for (tokens, expected) in cases {
            let (res, _) = run(tokens);
            assert_eq!(res.as_ref(), Err(expected), "tokens: {tokens:?}");
        }
    }

    #[test]
    fn stops_at_first_failure() {
        let (res, log) = run(&["/v", "/bogus", "/v", "src"]);
        assert!(res.is_err());
        assert_eq!(log.flags, ["v"]);
        assert!(log.args.is_empty());
    }

    #[test]
    fn terminator_disables_options() {
        let (res, log) = run(&["//", "/v", "//"]);
        assert_eq!(res, Ok(()));
        assert!(log.flags.is_empty());
        assert_eq!(
            log.args,
            [("SRC", "/v".to_string()), ("REST", "//".to_string())]
        );
    }

    #[test]
    fn extra_positional_fails_without_list_slot() {
        let reg: Registry = Registry::new("t", [], [ArgumentSpec::new("ONE", |_, _| {})]).unwrap();
        assert_eq!(reg.try_parse(["a"]), Ok(()));
        assert_eq!(
            reg.try_parse(["a", "b"]),
            Err(ParseError::UnexpectedArgument("b".to_string()))
        );
    }

    #[test]
    fn chained_slot_can_hand_over() {
        let reg: Registry<Vec<String>> = Registry::new(
            "t",
            [],
            [
                ArgumentSpec::chained("ITEMS", |v: &mut Vec<String>, s| {
                    v.push(format!("item:{s}"));
                    if s.ends_with(';') { Chain::Advance } else { Chain::Stay }
                })
                .multiple(),
                ArgumentSpec::new("LAST", |v: &mut Vec<String>, s| v.push(format!("last:{s}"))),
            ],
        )
        .unwrap();

        let mut out = Vec::new();
        assert!(reg.parse_with(["a", "b;", "c"], &mut out));
        assert_eq!(out, ["item:a", "item:b;", "last:c"]);

        let mut out = Vec::new();
        assert!(!reg.parse_with(["a", "b"], &mut out));
    }

    #[test]
    #[should_panic(expected = "does not allow multiple values")]
    fn single_slot_asking_to_stay_panics() {
        let reg: Registry = Registry::new(
            "t",
            [],
            [ArgumentSpec::chained("ONE", |_, _| Chain::Stay)],
        )
        .unwrap();
        let _ = reg.parse(["a"]);
    }

    #[test]
    fn custom_prefix_and_delimiters() {
        let reg: Registry<Vec<String>> = Registry::builder()
            .prefix('-')
            .delimiters(['#'])
            .option(OptionSpec::value("n", "N", "", |v: &mut Vec<String>, s| v.push(s.to_string())))
            .build()
            .unwrap();

        let mut out = Vec::new();
        assert!(reg.parse_with(["-N#3"], &mut out));
        assert_eq!(out, ["3"]);
        assert!(!reg.parse_with(["-n=3"], &mut Vec::new()));
        assert!(!reg.parse_with(["/n#3"], &mut Vec::new()));
        assert!(reg.parse_with(["--"], &mut Vec::new()));
    }
}
