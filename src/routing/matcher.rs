//! Route template compilation and path matching.
//!
//! # Template Grammar
//! ```text
//! template    := segment*
//! segment     := literal | optional | param
//! optional    := '[' segment* ']'
//! param       := '{' name (':' regex)? '}'
//! ```
//!
//! # Translation
//! - Literals are matched verbatim (regex metacharacters are escaped)
//! - `[` ... `]` becomes `(?:` ... `)?`, nesting allowed
//! - `{name}` becomes `(?P<name>[^/]+)`
//! - `{name:expr}` becomes `(?P<name>expr)`
//! - The whole pattern is anchored with `^` and `$`
//!
//! # Design Decisions
//! - Compiled once at registration, immutable afterwards
//! - Brackets and braces inside `{...}` belong to the parameter expression
//! - Malformed templates are rejected, never silently accepted

use regex::Regex;

use crate::error::RouterError;
use crate::routing::params::Params;

/// Token class used when a parameter carries no custom expression.
pub const DEFAULT_PARAM_PATTERN: &str = "[^/]+";

/// A compiled route template.
#[derive(Debug, Clone)]
pub struct RoutePattern {
    template: String,
    regex: Regex,
    names: Vec<String>,
}

impl RoutePattern {
    /// Compile a template (group prefix already prepended).
    pub fn compile(template: &str) -> Result<Self, RouterError> {
        let invalid = |reason: String| RouterError::InvalidTemplate {
            template: template.to_string(),
            reason,
        };

        let mut source = String::with_capacity(template.len() * 2 + 2);
        let mut names: Vec<String> = Vec::new();
        let mut literal = String::new();
        let mut open_sections = 0usize;

        source.push('^');
        let mut chars = template.chars();
        while let Some(c) = chars.next() {
            match c {
                '[' => {
                    flush_literal(&mut source, &mut literal);
                    source.push_str("(?:");
                    open_sections += 1;
                }
                ']' => {
                    if open_sections == 0 {
                        return Err(invalid("unmatched `]`".into()));
                    }
                    flush_literal(&mut source, &mut literal);
                    source.push_str(")?");
                    open_sections -= 1;
                }
                '{' => {
                    flush_literal(&mut source, &mut literal);
                    let body = read_param_body(&mut chars).ok_or_else(|| invalid("unterminated `{`".into()))?;
                    let (name, expr) = split_param(&body).map_err(invalid)?;
                    if names.iter().any(|n| n == name) {
                        return Err(invalid(format!("duplicate parameter `{}`", name)));
                    }
                    source.push_str("(?P<");
                    source.push_str(name);
                    source.push('>');
                    source.push_str(expr);
                    source.push(')');
                    names.push(name.to_string());
                }
                '}' => return Err(invalid("unmatched `}`".into())),
                other => literal.push(other),
            }
        }
        if open_sections > 0 {
            return Err(invalid("unclosed `[`".into()));
        }
        flush_literal(&mut source, &mut literal);
        source.push('$');

        let regex = Regex::new(&source).map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            template: template.to_string(),
            regex,
            names,
        })
    }

    /// Returns true if the whole path matches.
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Match the path and collect the parameters that took part in the match.
    pub fn captures(&self, path: &str) -> Option<Params> {
        let caps = self.regex.captures(path)?;
        let mut params = Params::new();
        for name in &self.names {
            if let Some(m) = caps.name(name) {
                params.insert(name.as_str(), m.as_str());
            }
        }
        Some(params)
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Parameter names in declaration order.
    pub fn param_names(&self) -> &[String] {
        &self.names
    }

    /// The anchored expression the template compiled to.
    pub fn as_regex_str(&self) -> &str {
        self.regex.as_str()
    }
}

fn flush_literal(source: &mut String, literal: &mut String) {
    if !literal.is_empty() {
        source.push_str(&regex::escape(literal));
        literal.clear();
    }
}

/// Read up to the `}` closing the current parameter. Nested braces and
/// backslash escapes are kept so custom expressions may use quantifiers.
fn read_param_body(chars: &mut std::str::Chars<'_>) -> Option<String> {
    let mut body = String::new();
    let mut depth = 1usize;
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                body.push(c);
                body.push(chars.next()?);
            }
            '{' => {
                depth += 1;
                body.push(c);
            }
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(body);
                }
                body.push(c);
            }
            _ => body.push(c),
        }
    }
    None
}

fn split_param(body: &str) -> Result<(&str, &str), String> {
    let (name, expr) = match body.split_once(':') {
        Some((name, expr)) => (name, expr),
        None => (body, DEFAULT_PARAM_PATTERN),
    };

    let mut name_chars = name.chars();
    let valid_start = name_chars
        .next()
        .map(|c| c.is_ascii_alphabetic() || c == '_')
        .unwrap_or(false);
    if !valid_start || !name_chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(format!("invalid parameter name `{}`", name));
    }
    if expr.is_empty() {
        return Err(format!("empty expression for parameter `{}`", name));
    }
    Ok((name, expr))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_param() {
        let pattern = RoutePattern::compile("/items/{id}").unwrap();

        let params = pattern.captures("/items/42").unwrap();
        assert_eq!(params.get("id"), Some("42"));
        assert_eq!(params.len(), 1);

        assert!(pattern.captures("/items/42/extra").is_none());
        assert!(pattern.captures("/items/").is_none());
        assert!(pattern.captures("/prefix/items/42").is_none());
    }

    #[test]
    fn test_optional_section() {
        let pattern = RoutePattern::compile("/posts[/{id}]").unwrap();

        let params = pattern.captures("/posts").unwrap();
        assert!(params.is_empty());

        let params = pattern.captures("/posts/5").unwrap();
        assert_eq!(params.get("id"), Some("5"));
    }

    #[test]
    fn test_nested_optional_sections() {
        let pattern = RoutePattern::compile("/archive[/{year}[/{month}]]").unwrap();

        assert!(pattern.captures("/archive").unwrap().is_empty());
        assert_eq!(pattern.captures("/archive/2024").unwrap().get("year"), Some("2024"));

        let params = pattern.captures("/archive/2024/05").unwrap();
        let pairs: Vec<(&str, &str)> = params.iter().collect();
        assert_eq!(pairs, [("year", "2024"), ("month", "05")]);

        assert!(pattern.captures("/archive//05").is_none());
    }

    #[test]
    fn test_custom_expression() {
        let pattern = RoutePattern::compile("/users/{id:\\d+}").unwrap();
        assert!(pattern.is_match("/users/17"));
        assert!(!pattern.is_match("/users/abc"));
    }

    #[test]
    fn test_brackets_inside_param_are_part_of_expression() {
        let pattern = RoutePattern::compile("/files/{name:[a-z]+}[.{ext:[a-z]{2,4}}]").unwrap();

        let params = pattern.captures("/files/report.html").unwrap();
        assert_eq!(params.get("name"), Some("report"));
        assert_eq!(params.get("ext"), Some("html"));

        assert!(pattern.is_match("/files/report"));
        assert!(!pattern.is_match("/files/Report"));
    }

    #[test]
    fn test_literals_are_escaped() {
        let pattern = RoutePattern::compile("/feed.xml").unwrap();
        assert!(pattern.is_match("/feed.xml"));
        assert!(!pattern.is_match("/feedxxml"));
    }

    #[test]
    fn test_compile_is_idempotent() {
        let a = RoutePattern::compile("/a/{b}[/{c:\\d+}]").unwrap();
        let b = RoutePattern::compile("/a/{b}[/{c:\\d+}]").unwrap();
        assert_eq!(a.as_regex_str(), b.as_regex_str());
        assert_eq!(a.param_names(), b.param_names());
    }

    #[test]
    fn test_malformed_templates_rejected() {
        for template in [
            "/posts[/{id}",
            "/posts/{id}]",
            "/posts/{id",
            "/posts/id}",
            "/posts/{}",
            "/posts/{1id}",
            "/posts/{id:}",
            "/posts/{id}/{id}",
            "/posts/{id:(}",
        ] {
            assert!(
                matches!(RoutePattern::compile(template), Err(RouterError::InvalidTemplate { .. })),
                "template {} should be rejected",
                template
            );
        }
    }
}
