//! Option and positional-argument declarations.

use std::fmt;

type FlagFn<C> = Box<dyn Fn(&mut C) + Send + Sync>;
type ValueFn<C> = Box<dyn Fn(&mut C, &str) + Send + Sync>;
type PlainFn<C> = Box<dyn Fn(&mut C, &str) + Send + Sync>;
type ChainedFn<C> = Box<dyn Fn(&mut C, &str) -> Chain + Send + Sync>;

/// Key collection accepted when declaring an option.
///
/// A single string is split on `|`, so `"a|abc"` declares two aliases.
pub trait IntoKeys {
    fn into_keys(self) -> Vec<String>;
}

impl IntoKeys for &str {
    fn into_keys(self) -> Vec<String> {
        self.split('|').map(str::to_string).collect()
    }
}

impl IntoKeys for String {
    fn into_keys(self) -> Vec<String> {
        self.as_str().into_keys()
    }
}

impl IntoKeys for &[&str] {
    fn into_keys(self) -> Vec<String> {
        self.iter().map(|s| s.to_string()).collect()
    }
}

impl<const N: usize> IntoKeys for [&str; N] {
    fn into_keys(self) -> Vec<String> {
        self.into_iter().map(str::to_string).collect()
    }
}

impl IntoKeys for Vec<String> {
    fn into_keys(self) -> Vec<String> {
        self
    }
}

/// What happens when an option matches.
pub enum OptionAction<C> {
    /// Bare flag: `/verbose`.
    Flag(FlagFn<C>),
    /// Value-taking option: `/count=5`. `meta` is the placeholder shown in usage.
    Value { meta: String, action: ValueFn<C> },
}

impl<C> fmt::Debug for OptionAction<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(_) => f.write_str("Flag"),
            Self::Value { meta, .. } => f.debug_struct("Value").field("meta", meta).finish(),
        }
    }
}

/// One declared option.
pub struct OptionSpec<C> {
    pub(crate) keys: Vec<String>,
    pub(crate) help: String,
    pub(crate) multiple: bool,
    pub(crate) action: OptionAction<C>,
}

impl<C> OptionSpec<C> {
    /// Declare a flag that takes no value.
    pub fn flag<K, F>(keys: K, help: impl Into<String>, action: F) -> Self
    where
        K: IntoKeys,
        F: Fn(&mut C) + Send + Sync + 'static,
    {
        Self {
            keys: keys.into_keys(),
            help: help.into(),
            multiple: false,
            action: OptionAction::Flag(Box::new(action)),
        }
    }

    /// Declare an option that must be given an inline value (`/key=value`).
    pub fn value<K, F>(keys: K, meta: impl Into<String>, help: impl Into<String>, action: F) -> Self
    where
        K: IntoKeys,
        F: Fn(&mut C, &str) + Send + Sync + 'static,
    {
        Self {
            keys: keys.into_keys(),
            help: help.into(),
            multiple: false,
            action: OptionAction::Value {
                meta: meta.into(),
                action: Box::new(action),
            },
        }
    }

    /// Allow the option to be given more than once.
    pub fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    /// Aliases in declaration order. Upper-cased once the option is registered.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    pub fn takes_value(&self) -> bool {
        matches!(self.action, OptionAction::Value { .. })
    }

    pub fn meta_value(&self) -> Option<&str> {
        match &self.action {
            OptionAction::Flag(_) => None,
            OptionAction::Value { meta, .. } => Some(meta),
        }
    }

    pub fn allows_multiple(&self) -> bool {
        self.multiple
    }
}

impl<C> fmt::Debug for OptionSpec<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionSpec")
            .field("keys", &self.keys)
            .field("help", &self.help)
            .field("multiple", &self.multiple)
            .field("action", &self.action)
            .finish()
    }
}

/// Whether the next positional token goes to the same slot or the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chain {
    Advance,
    Stay,
}

enum ArgumentAction<C> {
    Plain(PlainFn<C>),
    Chained(ChainedFn<C>),
}

/// One declared positional slot.
pub struct ArgumentSpec<C> {
    pub(crate) meta: String,
    pub(crate) optional: bool,
    pub(crate) multiple: bool,
    action: ArgumentAction<C>,
}

impl<C> ArgumentSpec<C> {
    /// Declare a required, single-value slot.
    ///
    /// After each value the slot advances, unless it was marked
    /// [`multiple`](Self::multiple), in which case it keeps consuming.
    pub fn new<F>(meta: impl Into<String>, action: F) -> Self
    where
        F: Fn(&mut C, &str) + Send + Sync + 'static,
    {
        Self {
            meta: meta.into(),
            optional: false,
            multiple: false,
            action: ArgumentAction::Plain(Box::new(action)),
        }
    }

    /// Declare a slot whose callback decides after every value whether to
    /// keep consuming or hand over to the next slot.
    ///
    /// Returning [`Chain::Stay`] is only legal on a `multiple` slot.
    pub fn chained<F>(meta: impl Into<String>, action: F) -> Self
    where
        F: Fn(&mut C, &str) -> Chain + Send + Sync + 'static,
    {
        Self {
            meta: meta.into(),
            optional: false,
            multiple: false,
            action: ArgumentAction::Chained(Box::new(action)),
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    pub fn meta_value(&self) -> &str {
        &self.meta
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn allows_multiple(&self) -> bool {
        self.multiple
    }

    pub(crate) fn default_chain(&self) -> Chain {
        if self.multiple { Chain::Stay } else { Chain::Advance }
    }

    pub(crate) fn dispatch(&self, ctx: &mut C, value: &str) -> Chain {
        match &self.action {
            ArgumentAction::Plain(f) => {
                f(ctx, value);
                self.default_chain()
            }
            ArgumentAction::Chained(f) => f(ctx, value),
        }
    }
}

impl<C> fmt::Debug for ArgumentSpec<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgumentSpec")
            .field("meta", &self.meta)
            .field("optional", &self.optional)
            .field("multiple", &self.multiple)
            .finish_non_exhaustive()
    }
}
