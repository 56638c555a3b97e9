//! Lexical C# front end: tokenizer, keyword tables and the per-file extractor.

pub mod extractor;
pub mod keywords;
pub mod lexer;

pub use extractor::{ExtractedMethod, FileExtraction, extract};
pub use lexer::{Token, TokenKind, tokenize};
