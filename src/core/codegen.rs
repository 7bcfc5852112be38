// JS module bodies emitted for stylesheet modules

/// Escape text for a single-quoted JS string literal
pub fn escape_js_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + s.len() / 8);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}

/// One bare import per resolved dependency, so the host sees the edge
pub fn import_statements(dependencies: &[String]) -> String {
    dependencies
        .iter()
        .map(|dep| format!("import '{}';", escape_js_string(dep)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Imports followed by `export default '<css>';`
pub fn export_module(dependencies: &[String], css: &str) -> String {
    let mut code = import_statements(dependencies);
    if !code.is_empty() {
        code.push('\n');
    }
    code.push_str(&format!("export default '{}';\n", escape_js_string(css)));
    code
}

/// Imports followed by a script that appends a `<style>` element to the head
pub fn insert_module(dependencies: &[String], css: &str) -> String {
    let mut code = import_statements(dependencies);
    code.push_str(&format!(
        r#"

(function(){{
    const head = document.head || document.getElementsByTagName('head')[0];
    const style = document.createElement('style');
    style.textContent = '{}';
    head.appendChild(style);
}})();
"#,
        escape_js_string(css)
    ));
    code
}

/// Source map with no mappings, for modules the compiler gave no map for
pub fn empty_source_map() -> String {
    serde_json::json!({
        "version": 3,
        "sources": [],
        "names": [],
        "mappings": "",
    })
    .to_string()
}

#[cfg(test)]
pub(crate) fn unescape_js_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}
