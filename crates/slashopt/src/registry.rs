//! The declaration registry: options, positional slots and grammar settings.

use std::collections::HashMap;
use std::fmt;

use crate::decl::{ArgumentSpec, OptionAction, OptionSpec};
use crate::env;
use crate::error::DeclarationError;

pub const DEFAULT_PREFIX: char = '/';
pub const DEFAULT_DELIMITERS: [char; 2] = ['=', ':'];

/// An immutable set of declarations ready to parse token sequences.
///
/// `C` is the caller's context type threaded through every callback.
/// A built registry is never mutated, so it can be shared across threads and
/// used for any number of concurrent parses.
pub struct Registry<C = ()> {
    pub(crate) command: String,
    pub(crate) prefix: char,
    pub(crate) delimiters: Vec<char>,
    pub(crate) options: Vec<OptionSpec<C>>,
    pub(crate) keys: HashMap<String, usize>,
    pub(crate) arguments: Vec<ArgumentSpec<C>>,
}

impl<C> Registry<C> {
    pub fn builder() -> RegistryBuilder<C> {
        RegistryBuilder::new()
    }

    /// Build a registry with the default prefix and delimiters.
    pub fn new(
        command: impl Into<String>,
        options: impl IntoIterator<Item = OptionSpec<C>>,
        arguments: impl IntoIterator<Item = ArgumentSpec<C>>,
    ) -> Result<Self, DeclarationError> {
        RegistryBuilder::new()
            .command(command)
            .options(options)
            .arguments(arguments)
            .build()
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn prefix(&self) -> char {
        self.prefix
    }

    pub fn delimiters(&self) -> &[char] {
        &self.delimiters
    }

    pub fn options(&self) -> &[OptionSpec<C>] {
        &self.options
    }

    pub fn arguments(&self) -> &[ArgumentSpec<C>] {
        &self.arguments
    }

    /// Look up an option by any alias, ignoring case.
    pub fn find_option(&self, key: &str) -> Option<&OptionSpec<C>> {
        self.option_index(key).map(|idx| &self.options[idx])
    }

    pub(crate) fn option_index(&self, key: &str) -> Option<usize> {
        self.keys.get(&normalize_key(key)).copied()
    }
}

impl<C> fmt::Debug for Registry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("command", &self.command)
            .field("prefix", &self.prefix)
            .field("delimiters", &self.delimiters)
            .field("options", &self.options)
            .field("arguments", &self.arguments)
            .finish()
    }
}

/// Collects declarations and settings, then validates them in [`build`](Self::build).
pub struct RegistryBuilder<C> {
    command: String,
    prefix: char,
    delimiters: Vec<char>,
    options: Vec<OptionSpec<C>>,
    arguments: Vec<ArgumentSpec<C>>,
}

impl<C> Default for RegistryBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> RegistryBuilder<C> {
    pub fn new() -> Self {
        Self {
            command: String::new(),
            prefix: DEFAULT_PREFIX,
            delimiters: DEFAULT_DELIMITERS.to_vec(),
            options: Vec::new(),
            arguments: Vec::new(),
        }
    }

    /// Display name used in the usage line.
    pub fn command(mut self, command: impl Into<String>) -> Self {
        self.command = command.into();
        self
    }

    /// Use the running executable's file stem as the display name.
    ///
    /// Leaves the current name untouched when `argv[0]` is unavailable.
    pub fn command_from_env(mut self) -> Self {
        if let Some(name) = env::command_name() {
            self.command = name;
        }
        self
    }

    pub fn prefix(mut self, prefix: char) -> Self {
        self.prefix = prefix;
        self
    }

    /// Characters separating an option key from its inline value.
    ///
    /// Order matters for usage text: the first delimiter is the one shown.
    pub fn delimiters(mut self, delimiters: impl IntoIterator<Item = char>) -> Self {
        self.delimiters = Vec::new();
        for d in delimiters {
            if !self.delimiters.contains(&d) {
                self.delimiters.push(d);
            }
        }
        self
    }

    pub fn option(mut self, option: OptionSpec<C>) -> Self {
        self.options.push(option);
        self
    }

    pub fn options(mut self, options: impl IntoIterator<Item = OptionSpec<C>>) -> Self {
        self.options.extend(options);
        self
    }

    pub fn argument(mut self, argument: ArgumentSpec<C>) -> Self {
        self.arguments.push(argument);
        self
    }

    pub fn arguments(mut self, arguments: impl IntoIterator<Item = ArgumentSpec<C>>) -> Self {
        self.arguments.extend(arguments);
        self
    }

    pub fn build(self) -> Result<Registry<C>, DeclarationError> {
        if self.prefix.is_alphanumeric() || self.prefix.is_whitespace() {
            return Err(DeclarationError::InvalidPrefix(self.prefix));
        }
        if self.delimiters.is_empty() {
            return Err(DeclarationError::NoDelimiters);
        }
        if let Some(&d) = self
            .delimiters
            .iter()
            .find(|&&d| d == self.prefix || d.is_ascii_alphanumeric())
        {
            return Err(DeclarationError::InvalidDelimiter(d));
        }

        let mut options = self.options;
        let mut keys: HashMap<String, usize> = HashMap::new();
        for (idx, option) in options.iter_mut().enumerate() {
            if option.keys.is_empty() {
                return Err(DeclarationError::NoKeys);
            }
            for key in option.keys.iter_mut() {
                if !is_valid_key(key) {
                    return Err(DeclarationError::InvalidKey { key: key.clone() });
                }
                *key = normalize_key(key);
                if keys.insert(key.clone(), idx).is_some() {
                    return Err(DeclarationError::DuplicateKey { key: key.clone() });
                }
            }
            if let OptionAction::Value { meta, .. } = &option.action {
                if meta.is_empty() {
                    return Err(DeclarationError::MissingMetaValue {
                        key: option.keys[0].clone(),
                    });
                }
            }
        }

        if self.arguments.iter().any(|a| a.meta.is_empty()) {
            return Err(DeclarationError::EmptyMetaValue);
        }

        tracing::trace!(
            command = %self.command,
            options = options.len(),
            arguments = self.arguments.len(),
            "registry built"
        );

        Ok(Registry {
            command: self.command,
            prefix: self.prefix,
            delimiters: self.delimiters,
            options,
            keys,
            arguments: self.arguments,
        })
    }
}

fn is_valid_key(key: &str) -> bool {
    !key.is_empty() && key.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Canonical form used for key matching.
pub(crate) fn normalize_key(key: &str) -> String {
    key.to_ascii_uppercase()
}
