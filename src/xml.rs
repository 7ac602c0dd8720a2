use std::borrow::Cow;

/// XML 1.0 valid char ranges:
/// - 0x09, 0x0A, 0x0D
/// - 0x20..=0xD7FF
/// - 0xE000..=0xFFFD
/// - 0x10000..=0x10FFFF
fn is_valid_xml_char(c: char) -> bool {
    matches!(
        c as u32,
        0x09 | 0x0A | 0x0D | 0x20..=0xD7FF | 0xE000..=0xFFFD | 0x10000..=0x10FFFF
    )
}

fn needs_escape(c: char) -> bool {
    matches!(c, '&' | '<' | '>' | '"' | '\'') || !is_valid_xml_char(c)
}

/// Drop characters that cannot appear in an XML document at all.
pub fn sanitize_xml_text(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_valid_xml_char) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.chars().filter(|&c| is_valid_xml_char(c)).collect())
    }
}

/// Escape a label for use in SVG text content or attribute values.
///
/// Element names come straight from user JSON, so anything can show up here.
pub fn escape_xml(text: &str) -> Cow<'_, str> {
    if !text.chars().any(needs_escape) {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c if is_valid_xml_char(c) => escaped.push(c),
            _ => {}
        }
    }
    escaped.into()
}

#[cfg(test)]
mod tests {
    use super::{escape_xml, sanitize_xml_text};
    use std::borrow::Cow;

    #[test]
    fn plain_labels_are_borrowed() {
        assert!(matches!(escape_xml("Validate Data"), Cow::Borrowed(_)));
        assert!(matches!(sanitize_xml_text("User → DB"), Cow::Borrowed(_)));
    }

    #[test]
    fn control_chars_are_dropped() {
        let s = "Pay\u{0007}ment\u{000C}s";
        assert_eq!(sanitize_xml_text(s), "Payments");
        assert_eq!(escape_xml(s), "Payments");
    }

    #[test]
    fn markup_in_names_is_escaped() {
        assert_eq!(
            escape_xml(r#"<Auth & "Token" 'Svc'>"#),
            "&lt;Auth &amp; &quot;Token&quot; &apos;Svc&apos;&gt;"
        );
    }
}
