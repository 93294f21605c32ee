//! picomon Readline Library
//!
//! Line intake for a single-threaded monitor that must never block:
//! - [`LineEditor`]: byte-at-a-time editing with echo, backspace and
//!   escape-sequence filtering over a fixed buffer
//! - [`split`]: whitespace tokenizer honoring single and double quotes
//!
//! # Example
//!
//! ```rust,ignore
//! use picomon_readline::{LineEditor, split};
//!
//! let mut editor: LineEditor = LineEditor::new();
//!
//! loop {
//!     if editor.poll_line(&mut uart).is_some() {
//!         let args = split(editor.line());
//!         // dispatch args
//!         editor.reset();
//!     }
//!     // other polled work
//! }
//! ```

#![cfg_attr(not(test), no_std)]

mod editor;
mod key;
mod tokenize;

pub use editor::{LineEditor, LINE_MAX};
pub use key::{classify, EscapeState, Key};
pub use tokenize::{split, Tokens, MAX_TOKENS};
