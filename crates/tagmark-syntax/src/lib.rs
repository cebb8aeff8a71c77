//! # tagmark-syntax
//!
//! A lossless syntax tree for the HTML-like tag markup that tagmark imports,
//! built with [Rowan] + [Logos] on the [rust-analyzer] model.
//!
//! [Rowan]: https://docs.rs/rowan
//! [Logos]: https://docs.rs/logos
//! [rust-analyzer]: https://rust-analyzer.github.io/book/contributing/syntax.html
//!
//! ## Pipeline
//!
//! ```text
//! Source Text → Lexer → Tokens → Parser → Events → Sink → Rowan Tree
//!               (Logos)          (Grammar)        (GreenNodeBuilder)
//! ```
//!
//! The lexer is context-free; the grammar decides what `<`, names and quotes
//! mean. The tree keeps every byte, including malformed tags, so importers
//! can be tolerant of whatever markup they are handed.
//!
//! ## Module Structure
//!
//! ```text
//! tagmark-syntax/
//! ├── lib.rs           # Public API and snapshot tests
//! ├── syntax_kind.rs   # SyntaxKind enum (tokens + nodes) and Rowan integration
//! ├── lexer.rs         # Logos-based tokenizer
//! ├── ast.rs           # Typed Element/Content views
//! └── parser/
//!     ├── mod.rs       # Parser struct, Marker system, public parse() function
//!     ├── event.rs     # Event enum (Start, Token, Finish, Placeholder)
//!     ├── sink.rs      # Converts events to Rowan GreenNode
//!     └── grammar/
//!         └── mod.rs   # Element, tag and attribute rules
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use tagmark_syntax::{parse, SyntaxKind};
//! use tagmark_syntax::ast::{root_content, Content};
//!
//! let tree = parse("<strong>Hi</strong>");
//! assert_eq!(tree.text().to_string(), "<strong>Hi</strong>");
//!
//! let Some(Content::Element(strong)) = root_content(&tree).next() else {
//!     panic!("expected an element");
//! };
//! assert_eq!(strong.name(), "strong");
//! assert_eq!(strong.syntax().kind(), SyntaxKind::ELEMENT);
//! ```

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod syntax_kind;

pub use parser::{is_void, parse};
pub use syntax_kind::{MarkupLang, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};
