// Lexical import scanning.
//
// This is a heuristic, not a parser. Known false negatives/positives:
// only the first target of `@import "a", "b";` is found, and imports inside
// comments or strings are still reported.
//
// Unlike the bare pattern, targets that stay plain CSS imports in the
// compiler output (`url(...)`, `http://`, `https://`, `//`) are dropped,
// since there is no file to resolve or re-import for them.

use once_cell::sync::Lazy;
use regex::Regex;

static STYLE_IMPORT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"@import[\s'"]*([^;'"]*)[;'"]"#).expect("valid regex"));

static JS_IMPORT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^\s*import\s+(?:[^'";]*?\s+from\s+)?['"]([^'"]+)['"]"#).expect("valid regex")
});

/// Targets of `@import` statements in stylesheet source, in order
pub fn extract_imports(source: &str) -> Vec<String> {
    STYLE_IMPORT_RE
        .captures_iter(source)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|target| !target.is_empty() && !is_plain_css_import(target))
        .collect()
}

/// Specifiers of static `import` statements in emitted JS modules
pub fn extract_js_imports(code: &str) -> Vec<String> {
    JS_IMPORT_RE
        .captures_iter(code)
        .filter_map(|caps| caps.get(1))
        .map(|m| unescape_js(m.as_str()))
        .collect()
}

/// Imports the compiler leaves untouched in its output
fn is_plain_css_import(target: &str) -> bool {
    target.starts_with("url(")
        || target.starts_with("http://")
        || target.starts_with("https://")
        || target.starts_with("//")
}

fn unescape_js(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}
