//! Slash-prefixed command-line parsing with callback dispatch.
//!
//! Declare options (`/verbose`, `/out=FILE`) and positional slots once, then
//! feed a token sequence through [`Registry::parse_with`]. Every match is
//! handed to the callback it was declared with; nothing is collected on the
//! caller's behalf. The same declarations render a usage text whose command
//! name and placeholders are quoted for the Windows shell.
//!
//! ```
//! use slashopt::{ArgumentSpec, OptionSpec, Registry};
//!
//! #[derive(Default)]
//! struct Opts {
//!     verbose: bool,
//!     file: String,
//! }
//!
//! let registry = Registry::new(
//!     "MyCommand",
//!     [OptionSpec::flag("v|verbose", "Chatty output.", |o: &mut Opts| o.verbose = true)],
//!     [ArgumentSpec::new("FILE", |o: &mut Opts, v| o.file = v.to_string())],
//! )
//! .unwrap();
//!
//! let mut opts = Opts::default();
//! assert!(registry.parse_with(["/V", "in.txt"], &mut opts));
//! assert!(opts.verbose);
//! assert_eq!(opts.file, "in.txt");
//! ```

mod decl;
pub mod env;
mod error;
mod parse;
pub mod quote;
mod registry;
mod usage;

pub use decl::{ArgumentSpec, Chain, IntoKeys, OptionAction, OptionSpec};
pub use error::{DeclarationError, ParseError, ParseResult};
pub use registry::{DEFAULT_DELIMITERS, DEFAULT_PREFIX, Registry, RegistryBuilder};
