//! JavaScript emission for individual templates.

/// Escape template source for a double-quoted JavaScript string literal.
///
/// Order matters: backslashes first so later escapes are not doubled.
pub fn escape_template(source: &str) -> String {
    let mut out = String::with_capacity(source.len() + source.len() / 8);
    for c in source.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\r' => out.push_str("\\r"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}

/// Escape a name for a single-quoted JavaScript string literal.
fn escape_name(name: &str) -> String {
    name.replace('\\', "\\\\").replace('\'', "\\'")
}

/// `this['NS']`
pub fn namespace_expr(namespace: &str) -> String {
    format!("this['{}']", escape_name(namespace))
}

/// `this['NS'] = this['NS'] || {};`
pub fn namespace_decl(namespace: &str) -> String {
    let ns = namespace_expr(namespace);
    format!("{ns} = {ns} || {{}};")
}

/// `this['NS']['name'] = mote.compile("...");`
pub fn compile_template(namespace: &str, name: &str, source: &str) -> String {
    format!(
        "{}['{}'] = mote.compile(\"{}\");",
        namespace_expr(namespace),
        escape_name(name),
        escape_template(source)
    )
}

/// `mote.compilePartial('name', "...");`
pub fn compile_partial(name: &str, source: &str) -> String {
    format!(
        "mote.compilePartial('{}', \"{}\");",
        escape_name(name),
        escape_template(source)
    )
}

/// Partial name for a file path: basename without its last extension and
/// without its first character (the partial marker).
pub fn partial_name(path: &str) -> String {
    let base = path.rsplit('/').next().unwrap_or(path);
    let stem = match base.rsplit_once('.') {
        Some((stem, _)) => stem,
        None => base,
    };
    stem.chars().skip(1).collect()
}
