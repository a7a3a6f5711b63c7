//! rangelink — parse, format, and detect `path#L10C5-L20C10` range
//! links in plain text.
//!
//! The core is four small engines sharing one delimiter configuration:
//! a grammar parser ([`grammar::parse`]), a selection validator
//! ([`selection::validate`]), a range-notation resolver
//! ([`resolver::compute_range`]), and a link formatter
//! ([`formatter::format_link`]). On top of them, [`scanner::scan`]
//! finds links embedded in arbitrary free text, including quoted paths
//! with spaces.
//!
//! Every operation is a pure, synchronous function of its inputs; the
//! only shared state is the caller-owned, immutable
//! [`delimiters::DelimiterConfig`].

pub mod commands;
pub mod config;
pub mod delimiters;
pub mod diagnostics;
pub mod error;
pub mod formatter;
pub mod grammar;
pub mod logging;
pub mod resolver;
pub mod scanner;
pub mod selection;
pub mod types;

pub use delimiters::DelimiterConfig;
pub use error::Error;
pub use grammar::parse;
pub use resolver::compute_range;
pub use scanner::scan_text;
pub use types::{DetectedLink, ParsedLink};
