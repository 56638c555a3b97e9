//! C# keyword tables used by the declaration and call heuristics.

/// Reserved words. None of these can name a method, a call target or a
/// user-defined type.
const RESERVED: &[&str] = &[
    "abstract", "as", "base", "break", "case", "catch", "checked", "class", "const",
    "continue", "default", "delegate", "do", "else", "enum", "event", "explicit", "extern",
    "false", "finally", "fixed", "for", "foreach", "goto", "if", "implicit", "in",
    "interface", "internal", "is", "lock", "namespace", "new", "null", "operator", "out",
    "override", "params", "private", "protected", "public", "readonly", "ref", "return",
    "sealed", "sizeof", "stackalloc", "static", "struct", "switch", "this", "throw", "true",
    "try", "typeof", "unchecked", "unsafe", "using", "virtual", "volatile", "while",
];

/// Built-in type keywords. Reserved, but valid where a type is expected.
const BUILTIN_TYPES: &[&str] = &[
    "bool", "byte", "char", "decimal", "double", "dynamic", "float", "int", "long",
    "nint", "nuint", "object", "sbyte", "short", "string", "uint", "ulong", "ushort", "var",
    "void",
];

/// Contextual words that never start a type in a member declaration.
const CONTEXTUAL_NON_TYPES: &[&str] = &[
    "await", "yield", "when", "where", "nameof", "with", "and", "or", "not", "select",
    "from", "let", "orderby", "group", "join", "into",
];

/// Modifiers that may precede a member declaration.
const MODIFIERS: &[&str] = &[
    "public", "private", "protected", "internal", "static", "virtual", "override",
    "abstract", "sealed", "async", "extern", "unsafe", "new", "partial", "readonly",
    "required", "file", "volatile", "const",
];

const VISIBILITY: &[&str] = &["public", "private", "protected", "internal"];

/// Control-flow keywords that share the `identifier(` shape with calls and
/// declarations.
const CONTROL: &[&str] = &[
    "if", "else", "for", "foreach", "while", "do", "switch", "case", "catch", "try",
    "finally", "using", "lock", "fixed", "return", "throw", "when", "checked", "unchecked",
];

/// Operator-like words that take a parenthesised operand but are not calls.
const NOT_CALLABLE: &[&str] = &["typeof", "sizeof", "default", "nameof", "stackalloc"];

/// Keywords that introduce a type declaration whose members are counted.
const TYPE_DECLARATIONS: &[&str] = &["class", "struct", "interface", "record"];

pub fn is_reserved(word: &str) -> bool {
    RESERVED.contains(&word) || BUILTIN_TYPES.contains(&word)
}

pub fn is_builtin_type(word: &str) -> bool {
    BUILTIN_TYPES.contains(&word)
}

pub fn is_modifier(word: &str) -> bool {
    MODIFIERS.contains(&word)
}

pub fn is_visibility(word: &str) -> bool {
    VISIBILITY.contains(&word)
}

pub fn is_control(word: &str) -> bool {
    CONTROL.contains(&word)
}

pub fn is_type_declaration(word: &str) -> bool {
    TYPE_DECLARATIONS.contains(&word)
}

/// Whether `word` can start the type of a member declaration.
///
/// `record` is contextual, so `record Person(string Name);` would otherwise
/// read as a method returning `record`.
pub fn can_start_type(word: &str) -> bool {
    is_builtin_type(word)
        || !(is_reserved(word)
            || is_type_declaration(word)
            || CONTEXTUAL_NON_TYPES.contains(&word))
}

/// Whether `word(` may be recorded as a call.
pub fn is_callable(word: &str) -> bool {
    !(is_reserved(word) || is_control(word) || NOT_CALLABLE.contains(&word))
}

/// Whether `word` may name a declared method.
pub fn can_name_method(word: &str) -> bool {
    !(is_reserved(word) || is_control(word) || CONTEXTUAL_NON_TYPES.contains(&word))
}
