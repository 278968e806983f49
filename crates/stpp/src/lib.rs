//! Conditional text preprocessing over a mutable tag set.
//!
//! A pass copies its input to its output, except where directive lines say
//! otherwise. Directives start with a marker byte (`#` by default):
//!
//! - `if <condition>`, `elif <condition>`, `else`, `endif` select which spans
//!   of text are copied. Groups nest, and only the first true clause of a
//!   group is copied.
//! - `define <tag>` and `undef <tag>` add a tag to, or remove it from, the
//!   [`TagContext`] for the rest of the pass.
//! - Anything else after a marker is copied unchanged.
//!
//! Conditions combine tag names with `&&`, `||`, `^`, `!` and parentheses.
//! The binary operators have no precedence and group to the right, so
//! `a && b || c` reads as `a && (b || c)`.
//!
//! Malformed conditions are reported in the pass [`Report`] and count as
//! false. A `define` or `undef` without a tag name aborts the pass with
//! [`EngineError`].
//!
//! ```
//! use stpp::{Preprocessor, TagContext};
//!
//! let mut tags = TagContext::new();
//! let input = "#define FOO\n#if FOO\nHELLO\n#endif\n";
//! let (output, _) = Preprocessor::new().process_str(input, &mut tags)?;
//! assert_eq!(output, "HELLO\n");
//! assert!(tags.is_defined("FOO"));
//! # Ok::<(), stpp::EngineError>(())
//! ```

mod copier;
mod diagnostics;
mod directive;
mod engine;
mod errors;
mod expr;
mod source;
mod tags;

pub use diagnostics::{Diagnostic, DiagnosticKind, Report};
pub use directive::{DirectiveKind, MAX_KEYWORD_LEN};
pub use engine::{DEFAULT_MARKER, Preprocessor};
pub use errors::EngineError;
pub use expr::{Condition, ExprError, LexWarning, MAX_DEPTH};
pub use tags::TagContext;
