//! Source names to Rust identifiers

use regex::Regex;

/// Keywords usable as raw identifiers
const RAW_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do", "dyn",
    "else", "enum", "extern", "false", "final", "fn", "for", "if", "impl", "in", "let", "loop",
    "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref", "return", "static",
    "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized", "use", "virtual",
    "where", "while", "yield",
];

/// Keywords that cannot be raw identifiers
const PATH_KEYWORDS: &[&str] = &["self", "Self", "super", "crate"];

/// Associated functions every binding defines; getters never take these names
const CONSTRUCTORS: &[&str] = &["new", "from_fields", "from_map", "from_previous"];

/// Source-name syntax accepted for tables and columns
pub struct IdentifierRules {
    pattern: Regex,
}

impl IdentifierRules {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$")?,
        })
    }

    /// ASCII letters, digits and underscores, not starting with a digit,
    /// with at least one letter or digit
    pub fn is_valid(&self, name: &str) -> bool {
        self.pattern.is_match(name) && name.chars().any(|c| c.is_ascii_alphanumeric())
    }
}

/// `userId` -> `user_id`, `Users` -> `users`
pub fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut previous: Option<char> = None;

    for c in name.chars() {
        if c.is_ascii_uppercase() {
            if previous.is_some_and(|p| p.is_ascii_lowercase() || p.is_ascii_digit()) {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
        previous = Some(c);
    }
    out
}

/// `users_extra` -> `UsersExtra`; a leading digit gets a `T` prefix
pub fn pascal_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for part in name.split('_').filter(|p| !p.is_empty()) {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            out.push(first.to_ascii_uppercase());
            out.extend(chars);
        }
    }

    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, 'T');
    }
    if out == "Self" {
        out.push('_');
    }
    out
}

/// Make an identifier usable in Rust source
pub fn escape(ident: &str) -> String {
    if RAW_KEYWORDS.contains(&ident) {
        format!("r#{}", ident)
    } else if PATH_KEYWORDS.contains(&ident) {
        format!("{}_", ident)
    } else {
        ident.to_string()
    }
}

/// Identifier with any raw prefix removed, for file names and derived names
pub fn unraw(ident: &str) -> &str {
    ident.strip_prefix("r#").unwrap_or(ident)
}

/// Struct field and constructor parameter for a column
pub fn field_ident(column: &str) -> String {
    escape(&snake_case(column))
}

/// Getter name for a column
pub fn getter_ident(column: &str) -> String {
    let snake = snake_case(column);
    if CONSTRUCTORS.contains(&snake.as_str()) {
        format!("{}_value", snake)
    } else {
        escape(&snake)
    }
}

/// Setter name for a column
pub fn setter_ident(column: &str) -> String {
    format!("set_{}", snake_case(column))
}

/// Module name for a table
pub fn module_ident(table: &str) -> String {
    escape(&snake_case(table))
}

/// Rust string literal for arbitrary text
pub fn string_literal(text: &str) -> String {
    format!("{:?}", text)
}
