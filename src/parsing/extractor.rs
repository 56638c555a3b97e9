//! Lexical extraction of declarations and references from one C# file.
//!
//! Works over the token stream from [`super::lexer`]. The rules are
//! heuristics over declaration *shapes*, not a grammar:
//!
//! - a type declaration is `class|struct|interface|record` followed by an
//!   identifier;
//! - a method declaration starts a statement and reads
//!   `modifier* type name generic-params? (`; the name may not be a control
//!   keyword and may not equal the enclosing class name (constructors);
//! - a method body is the balanced `{ }` region after the parameter list, or
//!   the expression after `=>` up to `;`. When braces never balance the body is
//!   empty but the method is still reported;
//! - every callable `identifier(` inside a body is a call edge from that
//!   method;
//! - `using [static] A.B.C;` and `using Alias = A.B.C;` name dependencies.
//!
//! Class membership is positional: a method belongs to the innermost type body
//! that contains its name.

use std::collections::HashMap;
use std::ops::Range;

use super::keywords;
use super::lexer::{Token, TokenKind, tokenize};
use crate::complexity::ClassStructure;
use crate::types::{CallEdge, MethodEntity};

/// Everything the lexical pass learns about one file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileExtraction {
    pub classes: Vec<String>,
    pub methods: Vec<ExtractedMethod>,
    pub dependencies: Vec<String>,
    pub call_edges: Vec<CallEdge>,
    /// Member counts per class name, in declaration order.
    pub class_structures: Vec<(String, ClassStructure)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedMethod {
    pub entity: MethodEntity,
    /// Byte range of the body inside the source, `None` when the body is
    /// absent (`;`) or could not be matched.
    pub body: Option<Range<usize>>,
}

impl ExtractedMethod {
    pub fn body_text<'s>(&self, source: &'s str) -> &'s str {
        self.body.clone().map_or("", |range| &source[range])
    }
}

/// Extract classes, methods, dependencies and call edges from `source`.
pub fn extract(source: &str) -> FileExtraction {
    let tokens = tokenize(source);
    let scopes = BraceScopes::build(&tokens);
    let extractor = Extractor {
        source,
        tokens: &tokens,
        scopes: &scopes,
    };
    extractor.run()
}

/// Brace nesting for a token stream.
struct BraceScopes {
    /// Innermost open `{` index enclosing each token. For a `}` this is the
    /// brace it closes.
    enclosing: Vec<Option<usize>>,
    /// Matching `}` index for every balanced `{`.
    close: HashMap<usize, usize>,
}

impl BraceScopes {
    fn build(tokens: &[Token<'_>]) -> Self {
        let mut enclosing = Vec::with_capacity(tokens.len());
        let mut close = HashMap::new();
        let mut stack: Vec<usize> = Vec::new();

        for (i, token) in tokens.iter().enumerate() {
            enclosing.push(stack.last().copied());
            if token.is_punct("{") {
                stack.push(i);
            } else if token.is_punct("}") {
                if let Some(open) = stack.pop() {
                    close.insert(open, i);
                }
            }
        }
        Self { enclosing, close }
    }
}

/// A type declaration and the token range of its body.
#[derive(Debug)]
struct TypeDecl {
    name: String,
    open: Option<usize>,
    /// Index of the closing brace, or the token count when unbalanced.
    close: usize,
    bases: Vec<String>,
}

impl TypeDecl {
    fn contains(&self, index: usize) -> bool {
        self.open.is_some_and(|open| open < index && index < self.close)
    }
}

/// A method declaration located in the token stream.
struct MethodDecl {
    entity: MethodEntity,
    /// Innermost `{` enclosing the name token.
    scope: Option<usize>,
    /// Body token range, exclusive of delimiters.
    body: Option<Range<usize>>,
}

struct Extractor<'s, 't> {
    source: &'s str,
    tokens: &'t [Token<'s>],
    scopes: &'t BraceScopes,
}

impl<'s, 't> Extractor<'s, 't> {
    fn run(&self) -> FileExtraction {
        let types = self.find_types();
        let methods = self.find_methods(&types);
        let dependencies = self.find_dependencies();

        let mut call_edges = Vec::new();
        for method in &methods {
            if let Some(body) = &method.body {
                for callee in self.calls_in(body.clone()) {
                    call_edges.push(CallEdge::new(method.entity.name.clone(), callee));
                }
            }
        }

        let mut classes: Vec<String> = Vec::new();
        for decl in &types {
            if !classes.contains(&decl.name) {
                classes.push(decl.name.clone());
            }
        }

        let mut class_structures: Vec<(String, ClassStructure)> = Vec::new();
        for decl in &types {
            let structure = self.class_structure(decl, &methods);
            match class_structures.iter_mut().find(|(name, _)| *name == decl.name) {
                Some((_, existing)) => existing.merge(&structure),
                None => class_structures.push((decl.name.clone(), structure)),
            }
        }

        let methods = methods
            .into_iter()
            .map(|decl| ExtractedMethod {
                body: decl.body.map(|range| self.byte_range(range)),
                entity: decl.entity,
            })
            .collect();

        FileExtraction {
            classes,
            methods,
            dependencies,
            call_edges,
            class_structures,
        }
    }

    fn tok(&self, index: usize) -> Option<&Token<'s>> {
        self.tokens.get(index)
    }

    fn is_punct_at(&self, index: usize, text: &str) -> bool {
        self.tok(index).is_some_and(|t| t.is_punct(text))
    }

    fn text_between(&self, first: usize, last_exclusive: usize) -> &'s str {
        &self.source[self.tokens[first].start..self.tokens[last_exclusive - 1].end]
    }

    /// Byte range covered by body tokens `range`.
    fn byte_range(&self, range: Range<usize>) -> Range<usize> {
        if range.is_empty() {
            let at = self.tokens.get(range.start).map_or(self.source.len(), |t| t.start);
            return at..at;
        }
        self.tokens[range.start].start..self.tokens[range.end - 1].end
    }

    // ----- type declarations -------------------------------------------------

    fn find_types(&self) -> Vec<TypeDecl> {
        let mut types = Vec::new();
        for (i, token) in self.tokens.iter().enumerate() {
            if token.kind != TokenKind::Ident || !keywords::is_type_declaration(token.text) {
                continue;
            }
            // `where T : class` and `where T : struct, new()`
            if i > 0 && (self.tokens[i - 1].is_punct(":") || self.tokens[i - 1].is_punct(",")) {
                continue;
            }
            let Some(name_token) = self.tok(i + 1) else {
                continue;
            };
            // `record class X` / `record struct X` are handled at the second keyword.
            if token.text == "record" && matches!(name_token.text, "class" | "struct") {
                continue;
            }
            if !name_token.is_ident() || keywords::is_reserved(name_token.text) {
                continue;
            }
            types.push(self.type_decl(name_token.text, i + 1));
        }
        types
    }

    fn type_decl(&self, name: &str, name_index: usize) -> TypeDecl {
        let mut i = name_index + 1;
        let mut bases = Vec::new();
        let mut paren_depth = 0usize;
        let mut open = None;
        let mut in_constraints = false;

        while let Some(token) = self.tok(i) {
            match token.text {
                "where" if token.kind == TokenKind::Ident && paren_depth == 0 => {
                    in_constraints = true
                }
                "(" if token.kind == TokenKind::Punct => paren_depth += 1,
                ")" if token.kind == TokenKind::Punct => paren_depth = paren_depth.saturating_sub(1),
                "<" if token.kind == TokenKind::Punct && paren_depth == 0 => {
                    if let Some(after) = self.skip_angle(i) {
                        i = after;
                        continue;
                    }
                }
                ":" if token.kind == TokenKind::Punct && paren_depth == 0 && !in_constraints => {
                    let (list, after) = self.base_list(i + 1);
                    bases = list;
                    i = after;
                    continue;
                }
                "{" if token.kind == TokenKind::Punct && paren_depth == 0 => {
                    open = Some(i);
                    break;
                }
                ";" if token.kind == TokenKind::Punct && paren_depth == 0 => break,
                "}" if token.kind == TokenKind::Punct => break,
                _ => {}
            }
            i += 1;
        }

        let close = open
            .and_then(|o| self.scopes.close.get(&o).copied())
            .unwrap_or(self.tokens.len());
        TypeDecl {
            name: name.to_string(),
            open,
            close,
            bases,
        }
    }

    /// Parse `Base, IFoo<T>, Ns.IBar` up to `{`, `;` or `where`. Returns the
    /// simple name of each entry and the index where parsing stopped.
    fn base_list(&self, start: usize) -> (Vec<String>, usize) {
        let mut bases = Vec::new();
        let mut current: Option<&str> = None;
        let mut depth = 0usize;
        let mut i = start;

        while let Some(token) = self.tok(i) {
            if depth == 0
                && (token.is_punct("{") || token.is_punct(";") || token.is_ident_text("where"))
            {
                break;
            }
            match token.kind {
                TokenKind::Punct => match token.text {
                    "<" | "(" => depth += 1,
                    ">" | ")" => depth = depth.saturating_sub(1),
                    "," if depth == 0 => {
                        if let Some(name) = current.take() {
                            bases.push(name.to_string());
                        }
                    }
                    _ => {}
                },
                TokenKind::Ident if depth == 0 => current = Some(token.text),
                _ => {}
            }
            i += 1;
        }
        if let Some(name) = current {
            bases.push(name.to_string());
        }
        (bases, i)
    }

    fn innermost_type<'d>(&self, types: &'d [TypeDecl], index: usize) -> Option<&'d TypeDecl> {
        types
            .iter()
            .filter(|decl| decl.contains(index))
            .max_by_key(|decl| decl.open)
    }

    // ----- methods -----------------------------------------------------------

    fn find_methods(&self, types: &[TypeDecl]) -> Vec<MethodDecl> {
        let mut methods = Vec::new();
        for i in 0..self.tokens.len() {
            if !self.starts_statement(i) {
                continue;
            }
            if let Some(method) = self.method_at(i, types) {
                methods.push(method);
            }
        }
        methods
    }

    fn starts_statement(&self, index: usize) -> bool {
        if index == 0 {
            return true;
        }
        let prev = &self.tokens[index - 1];
        prev.kind == TokenKind::Punct && matches!(prev.text, "{" | "}" | ";" | "]")
    }

    fn method_at(&self, start: usize, types: &[TypeDecl]) -> Option<MethodDecl> {
        let mut i = start;
        let mut visibility: Option<String> = None;

        while let Some(token) = self.tok(i) {
            if !token.is_ident() || !keywords::is_modifier(token.text) {
                break;
            }
            if keywords::is_visibility(token.text) {
                visibility = Some(match visibility {
                    Some(existing) => format!("{existing} {}", token.text),
                    None => token.text.to_string(),
                });
            }
            i += 1;
        }

        let type_start = i;
        let type_end = self.skip_type(i)?;

        let mut name_index = type_end;
        let name = self.tok(name_index)?;
        if !name.is_ident() || !keywords::can_name_method(name.text) {
            return None;
        }
        let mut i = name_index + 1;
        // Explicit interface implementation: `void IFoo.Bar()`
        while self.is_punct_at(i, ".") && self.tok(i + 1).is_some_and(|t| t.is_ident()) {
            name_index = i + 1;
            i += 2;
        }
        let name = self.tokens[name_index].text;
        if !keywords::can_name_method(name) {
            return None;
        }
        if self.is_punct_at(i, "<") {
            i = self.skip_angle(i)?;
        }
        if !self.is_punct_at(i, "(") {
            return None;
        }

        let class = self.innermost_type(types, name_index).map(|decl| decl.name.clone());
        if class.as_deref() == Some(name) {
            return None;
        }

        let body = self
            .matching_paren(i)
            .and_then(|close_paren| self.body_after(close_paren + 1));

        Some(MethodDecl {
            entity: MethodEntity {
                name: name.to_string(),
                class,
                visibility,
                return_type: Some(self.text_between(type_start, type_end).to_string()),
                line: self.tokens[name_index].line,
            },
            scope: self.scopes.enclosing[name_index],
            body,
        })
    }

    /// Skip a type expression starting at `start`, returning the index after it.
    fn skip_type(&self, start: usize) -> Option<usize> {
        let first = self.tok(start)?;
        let mut i = if first.is_punct("(") {
            // Tuple type
            self.matching_paren(start)? + 1
        } else {
            if !first.is_ident() || !keywords::can_start_type(first.text) {
                return None;
            }
            let mut i = start + 1;
            while (self.is_punct_at(i, ".") || self.is_punct_at(i, "::"))
                && self.tok(i + 1).is_some_and(|t| t.is_ident())
            {
                i += 2;
            }
            if self.is_punct_at(i, "<") {
                i = self.skip_angle(i)?;
            }
            i
        };

        loop {
            if self.is_punct_at(i, "?") || self.is_punct_at(i, "*") {
                i += 1;
            } else if self.is_punct_at(i, "[") {
                let mut j = i + 1;
                while self.is_punct_at(j, ",") {
                    j += 1;
                }
                if !self.is_punct_at(j, "]") {
                    return None;
                }
                i = j + 1;
            } else {
                break;
            }
        }
        Some(i)
    }

    /// Skip a generic argument list starting at the `<` at `start`.
    /// Returns `None` when the tokens cannot form one.
    fn skip_angle(&self, start: usize) -> Option<usize> {
        let mut depth = 0usize;
        for (i, token) in self.tokens.iter().enumerate().skip(start) {
            match token.kind {
                TokenKind::Ident => {}
                TokenKind::Punct => match token.text {
                    "<" => depth += 1,
                    ">" => {
                        depth -= 1;
                        if depth == 0 {
                            return Some(i + 1);
                        }
                    }
                    "," | "." | "?" | "[" | "]" | "(" | ")" | "::" | "*" => {}
                    _ => return None,
                },
                _ => return None,
            }
        }
        None
    }

    fn matching_paren(&self, open: usize) -> Option<usize> {
        let mut depth = 0usize;
        for (i, token) in self.tokens.iter().enumerate().skip(open) {
            if token.is_punct("(") {
                depth += 1;
            } else if token.is_punct(")") {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
        }
        None
    }

    /// Locate the body following a parameter list. Skips constraint clauses.
    fn body_after(&self, start: usize) -> Option<Range<usize>> {
        let mut paren_depth = 0usize;
        for (i, token) in self.tokens.iter().enumerate().skip(start) {
            if token.kind != TokenKind::Punct {
                continue;
            }
            match token.text {
                "(" => paren_depth += 1,
                ")" => paren_depth = paren_depth.saturating_sub(1),
                "{" if paren_depth == 0 => {
                    let close = *self.scopes.close.get(&i)?;
                    return Some(i + 1..close);
                }
                "=>" if paren_depth == 0 => {
                    let end = self.statement_end(i + 1)?;
                    return Some(i + 1..end);
                }
                ";" | "}" if paren_depth == 0 => return None,
                _ => {}
            }
        }
        None
    }

    /// Index of the `;` ending the expression that starts at `start`.
    fn statement_end(&self, start: usize) -> Option<usize> {
        let mut depth = 0usize;
        for (i, token) in self.tokens.iter().enumerate().skip(start) {
            if token.kind != TokenKind::Punct {
                continue;
            }
            match token.text {
                "(" | "[" | "{" => depth += 1,
                ")" | "]" | "}" => {
                    if depth == 0 {
                        return None;
                    }
                    depth -= 1;
                }
                ";" if depth == 0 => return Some(i),
                _ => {}
            }
        }
        None
    }

    // ----- calls -------------------------------------------------------------

    fn calls_in(&self, body: Range<usize>) -> Vec<&'s str> {
        let mut calls = Vec::new();
        for i in body.clone() {
            let token = &self.tokens[i];
            if !token.is_ident() || !keywords::is_callable(token.text) {
                continue;
            }
            let args = if self.is_punct_at(i + 1, "<") {
                match self.skip_angle(i + 1) {
                    Some(after) => after,
                    None => continue,
                }
            } else {
                i + 1
            };
            if args < body.end && self.is_punct_at(args, "(") {
                calls.push(token.text);
            }
        }
        calls
    }

    // ----- dependencies ------------------------------------------------------

    fn find_dependencies(&self) -> Vec<String> {
        let mut dependencies = Vec::new();
        for (i, token) in self.tokens.iter().enumerate() {
            if !token.is_ident_text("using") {
                continue;
            }
            let mut j = i + 1;
            if self.tok(j).is_some_and(|t| t.is_ident_text("static")) {
                j += 1;
            }
            let Some(mut path_end) = self.skip_dotted(j) else {
                continue;
            };
            let mut path_start = j;
            if self.is_punct_at(path_end, "=") {
                path_start = path_end + 1;
                let Some(end) = self.skip_dotted(path_start) else {
                    continue;
                };
                path_end = end;
                let after_generics = if self.is_punct_at(path_end, "<") {
                    self.skip_angle(path_end)
                } else {
                    Some(path_end)
                };
                if !after_generics.is_some_and(|k| self.is_punct_at(k, ";")) {
                    continue;
                }
            } else if !self.is_punct_at(path_end, ";") {
                continue;
            }
            dependencies.push(self.text_between(path_start, path_end).to_string());
        }
        dependencies
    }

    /// `Ident (('.' | '::') Ident)*`, returning the index after the path.
    fn skip_dotted(&self, start: usize) -> Option<usize> {
        let first = self.tok(start)?;
        if !first.is_ident() || keywords::is_reserved(first.text) {
            return None;
        }
        let mut i = start + 1;
        while (self.is_punct_at(i, ".") || self.is_punct_at(i, "::"))
            && self.tok(i + 1).is_some_and(|t| t.is_ident())
        {
            i += 2;
        }
        Some(i)
    }

    // ----- class structure ---------------------------------------------------

    fn class_structure(&self, decl: &TypeDecl, methods: &[MethodDecl]) -> ClassStructure {
        let mut structure = ClassStructure {
            interfaces: decl
                .bases
                .iter()
                .filter(|base| is_interface_name(base))
                .count() as u32,
            ..ClassStructure::default()
        };
        let Some(open) = decl.open else {
            return structure;
        };
        structure.methods = methods
            .iter()
            .filter(|m| m.scope == Some(open) && m.entity.class.as_deref() == Some(&decl.name))
            .count() as u32;

        let mut i = open + 1;
        while i < decl.close {
            i = self.classify_member(i, decl.close, &mut structure);
        }
        structure
    }

    /// Classify the member declaration starting at `start` and return the
    /// index after it. Methods are counted separately from the method list.
    fn classify_member(&self, start: usize, end: usize, structure: &mut ClassStructure) -> usize {
        let mut i = start;
        // Attribute sections
        while i < end && self.tokens[i].is_punct("[") {
            match self.matching_bracket(i) {
                Some(close) => i = close + 1,
                None => return end,
            }
        }

        let head_start = i;
        let mut has_paren = false;
        let mut has_assign = false;
        let mut declares_type = false;
        let mut words = 0u32;

        while i < end {
            let token = &self.tokens[i];
            if token.is_ident() && !has_paren && !has_assign {
                if keywords::is_type_declaration(token.text) || token.text == "enum" {
                    declares_type = true;
                }
                if !keywords::is_modifier(token.text) {
                    words += 1;
                }
            }
            if token.kind != TokenKind::Punct {
                i += 1;
                continue;
            }
            match token.text {
                "(" if !has_assign => has_paren = true,
                "=" => has_assign = true,
                ";" => {
                    if !declares_type && !has_paren && words >= 2 {
                        structure.fields += 1;
                    }
                    return i + 1;
                }
                "{" => {
                    let close = self.scopes.close.get(&i).copied().unwrap_or(end);
                    if declares_type {
                        let nested_keyword = self.tokens[head_start..i]
                            .iter()
                            .any(|t| t.is_ident() && keywords::is_type_declaration(t.text));
                        if nested_keyword {
                            structure.nested_classes += 1;
                        }
                        return close + 1;
                    }
                    if has_assign {
                        // Initializer block inside a field declaration.
                        i = close + 1;
                        continue;
                    }
                    if !has_paren && words >= 2 {
                        structure.properties += 1;
                        // Auto-property initializer: `{ get; set; } = value;`
                        if self.is_punct_at(close + 1, "=") {
                            return self.statement_end(close + 2).map_or(end, |s| s + 1);
                        }
                    }
                    return close + 1;
                }
                "=>" if !has_assign => {
                    if !has_paren && words >= 2 {
                        structure.properties += 1;
                    }
                    return self.statement_end(i + 1).map_or(end, |s| s + 1);
                }
                "}" => return i + 1,
                _ => {}
            }
            i += 1;
        }
        end
    }

    fn matching_bracket(&self, open: usize) -> Option<usize> {
        let mut depth = 0usize;
        for (i, token) in self.tokens.iter().enumerate().skip(open) {
            if token.is_punct("[") {
                depth += 1;
            } else if token.is_punct("]") {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
        }
        None
    }
}

/// `IDisposable`, `IEnumerable<T>`: the conventional interface prefix.
fn is_interface_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next() == Some('I') && chars.next().is_some_and(|c| c.is_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method_names(extraction: &FileExtraction) -> Vec<String> {
        extraction
            .methods
            .iter()
            .map(|m| m.entity.qualified_name())
            .collect()
    }

    #[test]
    fn test_basic_class_and_methods() {
        let source = r#"
using System;
using System.Collections.Generic;

namespace Shop
{
    public class Cart
    {
        private readonly List<Item> _items = new List<Item>();

        public Cart() { }

        public decimal ComputeTotal()
        {
            decimal total = 0;
            foreach (var item in _items)
            {
                total += Price(item);
            }
            return total;
        }

        private static decimal Price(Item item) => item.Cost * Tax.Rate();
    }
}
"#;
        let extraction = extract(source);
        assert_eq!(extraction.classes, vec!["Cart"]);
        assert_eq!(
            method_names(&extraction),
            vec!["Cart.ComputeTotal", "Cart.Price"]
        );
        assert_eq!(extraction.dependencies, vec!["System", "System.Collections.Generic"]);

        let compute = &extraction.methods[0].entity;
        assert_eq!(compute.visibility.as_deref(), Some("public"));
        assert_eq!(compute.return_type.as_deref(), Some("decimal"));
        assert_eq!(compute.line, 13);

        assert_eq!(
            extraction.call_edges,
            vec![CallEdge::new("ComputeTotal", "Price"), CallEdge::new("Price", "Rate")]
        );
    }

    #[test]
    fn test_control_flow_is_not_a_method() {
        let source = r#"
class Loop
{
    void Run()
    {
        for (int i = 0; i < 3; i++) { }
        while (Check()) { }
        if (x) { } else if (y) { }
        switch (v) { default: break; }
        try { } catch (Exception e) { }
        using (var s = Open()) { }
        lock (gate) { }
    }
}
"#;
        let extraction = extract(source);
        assert_eq!(method_names(&extraction), vec!["Loop.Run"]);
        let callees: Vec<_> = extraction.call_edges.iter().map(|e| e.callee.as_str()).collect();
        assert_eq!(callees, vec!["Check", "Open"]);
    }

    #[test]
    fn test_constructor_excluded() {
        let source = "class Widget { public Widget(int size) { Init(); } Widget Widget() { return null; } void Init() { } }";
        let extraction = extract(source);
        assert_eq!(method_names(&extraction), vec!["Widget.Init"]);
        assert!(extraction.call_edges.is_empty());
    }

    #[test]
    fn test_comments_and_strings_hide_declarations() {
        let source = r#"
class Quiet
{
    // public void Hidden() { Ghost(); }
    void Speak()
    {
        Console.WriteLine("void Fake() { Phantom(); }");
        /* Other(); */
    }
}
"#;
        let extraction = extract(source);
        assert_eq!(method_names(&extraction), vec!["Quiet.Speak"]);
        let callees: Vec<_> = extraction.call_edges.iter().map(|e| e.callee.as_str()).collect();
        assert_eq!(callees, vec!["WriteLine"]);
    }

    #[test]
    fn test_generic_signatures() {
        let source = r#"
public class Repo<T> where T : class, new()
{
    public async Task<Dictionary<string, List<T>>> LoadAsync<TKey>(TKey key) where TKey : notnull
    {
        var result = await Fetch<T>(key);
        return Convert<Dictionary<string, List<T>>>(result);
    }
    public (int, string) Pair() => (1, "a");
    int[] Numbers() { return new int[0]; }
}
"#;
        let extraction = extract(source);
        assert_eq!(extraction.classes, vec!["Repo"]);
        assert_eq!(
            method_names(&extraction),
            vec!["Repo.LoadAsync", "Repo.Pair", "Repo.Numbers"]
        );
        assert_eq!(
            extraction.methods[0].entity.return_type.as_deref(),
            Some("Task<Dictionary<string, List<T>>>")
        );
        let callees: Vec<_> = extraction.call_edges.iter().map(|e| e.callee.as_str()).collect();
        assert_eq!(callees, vec!["Fetch", "Convert"]);
    }

    #[test]
    fn test_unbalanced_body_is_empty_but_listed() {
        let source = "class Broken { void Start() { if (a) { Go(); }";
        let extraction = extract(source);
        assert_eq!(method_names(&extraction), vec!["Broken.Start"]);
        assert_eq!(extraction.methods[0].body, None);
        assert_eq!(extraction.methods[0].body_text(source), "");
        assert!(extraction.call_edges.is_empty());
    }

    #[test]
    fn test_body_range_covers_inner_text() {
        let source = "class B { void Bar(){ if(true){} } }";
        let extraction = extract(source);
        assert_eq!(extraction.methods[0].body_text(source), "if(true){}");
    }

    #[test]
    fn test_interface_and_abstract_methods_have_no_body() {
        let source = "interface IRunner { void Run(); Task StopAsync(CancellationToken token); }";
        let extraction = extract(source);
        assert_eq!(extraction.classes, vec!["IRunner"]);
        assert_eq!(method_names(&extraction), vec!["IRunner.Run", "IRunner.StopAsync"]);
        assert!(extraction.methods.iter().all(|m| m.body.is_none()));
    }

    #[test]
    fn test_nested_class_membership() {
        let source = r#"
class Outer
{
    void A() { }
    class Inner
    {
        void B() { }
    }
    void C() { }
}
"#;
        let extraction = extract(source);
        assert_eq!(extraction.classes, vec!["Outer", "Inner"]);
        assert_eq!(method_names(&extraction), vec!["Outer.A", "Inner.B", "Outer.C"]);
    }

    #[test]
    fn test_using_forms() {
        let source = r#"
global using System.Linq;
using static System.Math;
using Json = Newtonsoft.Json.JsonConvert;
using Map = System.Collections.Generic.Dictionary<string, int>;
class U
{
    void M()
    {
        using (var s = Open()) { }
        using var t = Open();
    }
}
"#;
        let extraction = extract(source);
        assert_eq!(
            extraction.dependencies,
            vec![
                "System.Linq",
                "System.Math",
                "Newtonsoft.Json.JsonConvert",
                "System.Collections.Generic.Dictionary"
            ]
        );
    }

    #[test]
    fn test_class_structure_counts() {
        let source = r#"
public class Account : Entity, IDisposable, IComparable<Account>
{
    private int _id;
    private readonly string _name = "x", _alias;
    public const int Limit = 10;

    public string Name { get; set; } = "none";
    public int Id => _id;
    [JsonIgnore]
    public decimal Balance { get { return _b; } }

    public Account(int id) { _id = id; }
    public void Dispose() { }
    public int CompareTo(Account other) => 0;
    void Helper() { int Local() => 1; }

    private class Audit { void Log() { } }
    private enum State { Open, Closed }
}
"#;
        let extraction = extract(source);
        let (_, account) = extraction
            .class_structures
            .iter()
            .find(|(name, _)| name == "Account")
            .unwrap();
        assert_eq!(account.fields, 3);
        assert_eq!(account.properties, 3);
        assert_eq!(account.methods, 3);
        assert_eq!(account.nested_classes, 1);
        assert_eq!(account.interfaces, 2);
    }

    #[test]
    fn test_generic_constraint_is_not_a_class() {
        let source = "class Box<T> where T : class { T Get() { return default; } }";
        let extraction = extract(source);
        assert_eq!(extraction.classes, vec!["Box"]);
    }

    #[test]
    fn test_every_call_occurrence_is_kept() {
        let source = "class R { void A() { B(); B(); C(); } }";
        let extraction = extract(source);
        assert_eq!(extraction.call_edges.len(), 3);
    }

    #[test]
    fn test_explicit_interface_implementation() {
        let source = "class Impl : IThing { void IThing.Do() { Work(); } }";
        let extraction = extract(source);
        assert_eq!(method_names(&extraction), vec!["Impl.Do"]);
    }

    #[test]
    fn test_positional_records_are_not_methods() {
        let extraction = extract("namespace N { public record Person(string Name); }");
        assert_eq!(extraction.classes, vec!["Person"]);
        assert!(extraction.methods.is_empty());

        let source = r#"
class Host
{
    public record Item(int Id);
    public sealed record class Entry(string Key);
    private readonly record struct Point(int X, int Y);
    void Go() { }
}
"#;
        let extraction = extract(source);
        assert_eq!(method_names(&extraction), vec!["Host.Go"]);
        assert_eq!(extraction.classes, vec!["Host", "Item", "Entry", "Point"]);
    }

    #[test]
    fn test_record_with_body_keeps_its_methods() {
        let source = "record Person(string Name) { public string Greet() => Name; }";
        let extraction = extract(source);
        assert_eq!(method_names(&extraction), vec!["Person.Greet"]);
    }

    #[test]
    fn test_byte_order_mark_before_first_declaration() {
        let source = "\u{FEFF}using System.Text;\nusing System.IO;\nclass A { void Go(){ } }";
        assert_eq!(extract(source).dependencies, vec!["System.Text", "System.IO"]);

        let extraction = extract("\u{FEFF}class Widget { void Run(){ } }");
        assert_eq!(extraction.classes, vec!["Widget"]);
        assert_eq!(method_names(&extraction), vec!["Widget.Run"]);
    }
}
