/// Escape text for element content and attribute values
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Serialize a value as JSON that is safe inside an inline `<script>`.
///
/// `<`, `>` and `&` only ever occur inside JSON strings, so rewriting them
/// as `\u` escapes keeps the JSON valid while making `</script>` and
/// `<!--` impossible. U+2028/U+2029 are escaped for pre-ES2019 parsers.
pub fn script_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string(value)?;
    let mut out = String::with_capacity(json.len());
    for ch in json.chars() {
        match ch {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            _ => out.push(ch),
        }
    }
    Ok(out)
}

/// JS call expression for an inline handler, e.g. `navigateToSection("id")`
pub fn js_call(function: &str, argument: &str) -> Result<String, serde_json::Error> {
    Ok(format!("{}({})", function, script_json(argument)?))
}

/// Only allow link targets that cannot execute script
pub fn safe_url(url: &str) -> &str {
    let lowered = url.trim_start().to_ascii_lowercase();
    if lowered.starts_with("javascript:") || lowered.starts_with("vbscript:") || lowered.starts_with("data:text/html") {
        "#"
    } else {
        url
    }
}
