//! Structural complexity scoring.
//!
//! Two scales live here and are never mixed:
//!
//! - **Decision-point score** for any code span (method body, whole file):
//!   `1 + sum(construct counts)`, see [`score_constructs`].
//! - **Weighted structural score** for a class body, computed from member
//!   counts, see [`ClassStructure::weighted_score`].
//!
//! Constructs are counted by independent patterns over the token stream, so
//! text inside comments and string literals never contributes. The patterns
//! overlap on purpose where the source shapes overlap: `else if (` counts as
//! one `if` and one `else if`, and the trailing `while (` of a `do` loop also
//! counts as a `while`.

use serde::{Deserialize, Serialize};

use crate::parsing::lexer::{Token, TokenKind, tokenize};

/// Per-construct decision-point counts for one code span.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructCounts {
    pub if_statements: u32,
    pub else_statements: u32,
    pub else_if_statements: u32,
    pub switch_statements: u32,
    pub case_branches: u32,
    pub while_loops: u32,
    pub for_loops: u32,
    pub do_while_loops: u32,
    pub foreach_loops: u32,
    pub catch_blocks: u32,
    pub ternary_operators: u32,
    pub logical_operators: u32,
}

impl ConstructCounts {
    pub fn total(&self) -> u32 {
        self.if_statements
            + self.else_statements
            + self.else_if_statements
            + self.switch_statements
            + self.case_branches
            + self.while_loops
            + self.for_loops
            + self.do_while_loops
            + self.foreach_loops
            + self.catch_blocks
            + self.ternary_operators
            + self.logical_operators
    }

    /// Decision-point score: 1 + sum of all counts.
    pub fn score(&self) -> u32 {
        1 + self.total()
    }

    /// Labelled counts in a stable order, for display.
    pub fn entries(&self) -> [(&'static str, u32); 12] {
        [
            ("if", self.if_statements),
            ("else", self.else_statements),
            ("else if", self.else_if_statements),
            ("switch", self.switch_statements),
            ("case", self.case_branches),
            ("while", self.while_loops),
            ("for", self.for_loops),
            ("do-while", self.do_while_loops),
            ("foreach", self.foreach_loops),
            ("catch", self.catch_blocks),
            ("ternary", self.ternary_operators),
            ("&& / ||", self.logical_operators),
        ]
    }
}

/// Score a span of source text. Returns `(score, breakdown)`.
///
/// An empty span scores 1 with all counts zero.
pub fn score_constructs(code: &str) -> (u32, ConstructCounts) {
    let tokens = tokenize(code);
    let counts = count_constructs(&tokens);
    (counts.score(), counts)
}

/// Count decision points over an already tokenized span.
pub fn count_constructs(tokens: &[Token<'_>]) -> ConstructCounts {
    let mut counts = ConstructCounts::default();
    let next_is = |i: usize, text: &str| tokens.get(i + 1).is_some_and(|t| t.is_punct(text));

    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::Ident => match token.text {
                "if" if next_is(i, "(") => counts.if_statements += 1,
                "else" if next_is(i, "{") => counts.else_statements += 1,
                "else"
                    if tokens.get(i + 1).is_some_and(|t| t.is_ident_text("if"))
                        && tokens.get(i + 2).is_some_and(|t| t.is_punct("(")) =>
                {
                    counts.else_if_statements += 1
                }
                "switch" if next_is(i, "(") => counts.switch_statements += 1,
                "case" if is_case_label(tokens, i + 1) => counts.case_branches += 1,
                "while" if next_is(i, "(") => counts.while_loops += 1,
                "for" if next_is(i, "(") => counts.for_loops += 1,
                "do" if next_is(i, "{") => counts.do_while_loops += 1,
                "foreach" if next_is(i, "(") => counts.foreach_loops += 1,
                "catch" => counts.catch_blocks += 1,
                _ => {}
            },
            TokenKind::Punct => match token.text {
                "&&" | "||" => counts.logical_operators += 1,
                "?" if is_ternary_tail(tokens, i + 1) => counts.ternary_operators += 1,
                _ => {}
            },
            _ => {}
        }
    }
    counts
}

/// Length of a simple operand (`name`, `a.b.c`, `42`) starting at `start`.
fn simple_operand_len(tokens: &[Token<'_>], start: usize) -> usize {
    let mut i = start;
    loop {
        match tokens.get(i) {
            Some(t) if t.kind == TokenKind::Ident || t.kind == TokenKind::Number => i += 1,
            _ => break,
        }
        match tokens.get(i) {
            Some(t) if t.is_punct(".") => i += 1,
            _ => break,
        }
    }
    i - start
}

/// `case <operand>:` where the operand is a simple operand or one literal.
fn is_case_label(tokens: &[Token<'_>], start: usize) -> bool {
    let len = match tokens.get(start) {
        Some(t) if matches!(t.kind, TokenKind::Str | TokenKind::Char) => 1,
        _ => simple_operand_len(tokens, start),
    };
    len > 0 && tokens.get(start + len).is_some_and(|t| t.is_punct(":"))
}

/// `? <simple operand> :`
fn is_ternary_tail(tokens: &[Token<'_>], start: usize) -> bool {
    let len = simple_operand_len(tokens, start);
    len > 0 && tokens.get(start + len).is_some_and(|t| t.is_punct(":"))
}

/// Member counts of one class body, input to the weighted class score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassStructure {
    pub properties: u32,
    pub methods: u32,
    pub fields: u32,
    pub nested_classes: u32,
    pub interfaces: u32,
}

impl ClassStructure {
    pub const PROPERTY_WEIGHT: f64 = 0.5;
    pub const METHOD_WEIGHT: f64 = 1.0;
    pub const FIELD_WEIGHT: f64 = 0.3;
    pub const NESTED_CLASS_WEIGHT: f64 = 2.0;
    pub const INTERFACE_WEIGHT: f64 = 0.5;

    /// `0.5*properties + 1.0*methods + 0.3*fields + 2.0*nested + 0.5*interfaces`
    pub fn weighted_score(&self) -> f64 {
        let raw = Self::PROPERTY_WEIGHT * f64::from(self.properties)
            + Self::METHOD_WEIGHT * f64::from(self.methods)
            + Self::FIELD_WEIGHT * f64::from(self.fields)
            + Self::NESTED_CLASS_WEIGHT * f64::from(self.nested_classes)
            + Self::INTERFACE_WEIGHT * f64::from(self.interfaces);
        // Keep the persisted value free of float noise like 0.8999999999999999.
        (raw * 100.0).round() / 100.0
    }

    /// Combine the counts of two declarations of the same class (partial types).
    pub fn merge(&mut self, other: &ClassStructure) {
        self.properties += other.properties;
        self.methods += other.methods;
        self.fields += other.fields;
        self.nested_classes += other.nested_classes;
        self.interfaces += other.interfaces;
    }
}

/// Human-readable band for a decision-point score.
pub fn rating(score: u32) -> &'static str {
    match score {
        0..=5 => "simple",
        6..=10 => "moderate",
        11..=20 => "complex",
        _ => "very complex",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_span_scores_one() {
        let (score, counts) = score_constructs("");
        assert_eq!(score, 1);
        assert_eq!(counts, ConstructCounts::default());
    }

    #[test]
    fn test_additivity() {
        let body = r#"
            if (a) { x++; }
            for (int i = 0; i < n; i++) { }
            try { Run(); } catch (Exception e) { }
            if (b) { y++; }
        "#;
        let (score, counts) = score_constructs(body);
        assert_eq!(counts.if_statements, 2);
        assert_eq!(counts.for_loops, 1);
        assert_eq!(counts.catch_blocks, 1);
        assert_eq!(counts.total(), 4);
        assert_eq!(score, 5);
    }

    #[test]
    fn test_else_if_counts_both_patterns() {
        let (score, counts) = score_constructs("if (a) {} else if (b) {} else {}");
        assert_eq!(counts.if_statements, 2);
        assert_eq!(counts.else_if_statements, 1);
        assert_eq!(counts.else_statements, 1);
        assert_eq!(score, 5);
    }

    #[test]
    fn test_switch_and_cases() {
        let code = r#"
            switch (kind) {
                case Kind.A: break;
                case 2: break;
                case "three": break;
                default: break;
            }
        "#;
        let (_, counts) = score_constructs(code);
        assert_eq!(counts.switch_statements, 1);
        assert_eq!(counts.case_branches, 3);
    }

    #[test]
    fn test_loops() {
        let code = "while (x) {} do { } while (y); foreach (var i in items) {}";
        let (_, counts) = score_constructs(code);
        assert_eq!(counts.while_loops, 2);
        assert_eq!(counts.do_while_loops, 1);
        assert_eq!(counts.foreach_loops, 1);
    }

    #[test]
    fn test_ternary_and_logical_operators() {
        let code = "var v = ok && ready || forced ? first : second; var w = a?.b ?? c;";
        let (_, counts) = score_constructs(code);
        assert_eq!(counts.logical_operators, 2);
        assert_eq!(counts.ternary_operators, 1);
    }

    #[test]
    fn test_comments_and_strings_do_not_count() {
        let code = r#"
            // if (a) { }
            /* while (b) { } */
            Log("for (;;) && ||");
        "#;
        let (score, counts) = score_constructs(code);
        assert_eq!(counts.total(), 0);
        assert_eq!(score, 1);
    }

    #[test]
    fn test_weighted_class_score() {
        let structure = ClassStructure {
            properties: 2,
            methods: 3,
            fields: 1,
            nested_classes: 1,
            interfaces: 2,
        };
        // 1.0 + 3.0 + 0.3 + 2.0 + 1.0
        assert_eq!(structure.weighted_score(), 7.3);
        assert_eq!(ClassStructure::default().weighted_score(), 0.0);
    }

    #[test]
    fn test_rating_bands() {
        assert_eq!(rating(1), "simple");
        assert_eq!(rating(8), "moderate");
        assert_eq!(rating(15), "complex");
        assert_eq!(rating(40), "very complex");
    }
}
