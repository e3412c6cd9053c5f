use super::Size;
use roxmltree::Document;
use thiserror::Error;

const FALLBACK_SIZE: Size = Size::new(300.0, 300.0);

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid XML format: {0}")]
    Xml(String),

    #[error("No SVG element found")]
    NoSvgRoot,
}

/// Checks that `text` is well-formed XML whose root element is `svg`.
pub fn validate(text: &str) -> Result<Document<'_>, ValidationError> {
    let doc = Document::parse(text).map_err(|err| ValidationError::Xml(err.to_string()))?;

    if doc.root_element().tag_name().name() != "svg" {
        return Err(ValidationError::NoSvgRoot);
    }

    Ok(doc)
}

/// Infers the intrinsic size of a document. Never fails; documents that
/// don't validate fall back to 300x300.
pub fn resolve(text: &str) -> Size {
    match validate(text) {
        Ok(doc) => resolve_document(&doc),
        Err(_) => FALLBACK_SIZE,
    }
}

/// Like [`resolve`], for a document that already passed [`validate`].
pub fn resolve_document(doc: &Document) -> Size {
    let root = doc.root_element();

    let attrs = root
        .attribute("width")
        .and_then(parse_length)
        .zip(root.attribute("height").and_then(parse_length));

    if let Some((width, height)) = attrs {
        return Size::new(width, height);
    }

    root.attribute("viewBox")
        .and_then(parse_view_box)
        .unwrap_or(FALLBACK_SIZE)
}

/// Drops everything but digits and dots, then reads the longest numeric
/// prefix. `"120px"` is 120, `"50%"` is 50.
fn parse_length(value: &str) -> Option<f32> {
    let digits: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    let mut seen_dot = false;
    let end = digits
        .char_indices()
        .find(|&(_, c)| {
            if c == '.' {
                if seen_dot {
                    return true;
                }
                seen_dot = true;
            }
            false
        })
        .map_or(digits.len(), |(i, _)| i);

    digits[..end].parse().ok()
}

fn parse_view_box(value: &str) -> Option<Size> {
    let tokens = value
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>();

    if tokens.len() < 4 {
        return None;
    }

    let width = tokens[2].parse().ok()?;
    let height = tokens[3].parse().ok()?;

    Some(Size::new(width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_win_over_view_box() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" width="64" height="32" viewBox="0 0 120 80"/>"#;
        assert_eq!(resolve(svg), Size::new(64.0, 32.0));
    }

    #[test]
    fn view_box_when_no_attributes() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 120 80"/>"#;
        assert_eq!(resolve(svg), Size::new(120.0, 80.0));
    }

    #[test]
    fn view_box_with_commas() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0, 0, 40, 20"/>"#;
        assert_eq!(resolve(svg), Size::new(40.0, 20.0));
    }

    #[test]
    fn fallback_without_size_information() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg"/>"#;
        assert_eq!(resolve(svg), Size::new(300.0, 300.0));
    }

    #[test]
    fn only_one_attribute_uses_view_box() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" width="64" viewBox="0 0 10 20"/>"#;
        assert_eq!(resolve(svg), Size::new(10.0, 20.0));
    }

    #[test]
    fn short_view_box_falls_back() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 10"/>"#;
        assert_eq!(resolve(svg), Size::new(300.0, 300.0));
    }

    #[test]
    fn unit_suffixes_are_stripped() {
        assert_eq!(parse_length("120px"), Some(120.0));
        assert_eq!(parse_length("12.5mm"), Some(12.5));
        assert_eq!(parse_length("50%"), Some(50.0));
        assert_eq!(parse_length("1.2.3"), Some(1.2));
        assert_eq!(parse_length("auto"), None);
    }

    #[test]
    fn non_numeric_attributes_use_view_box() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" width="auto" height="auto" viewBox="0 0 7 9"/>"#;
        assert_eq!(resolve(svg), Size::new(7.0, 9.0));
    }

    #[test]
    fn validate_rejects_broken_xml() {
        assert!(matches!(validate("<svg"), Err(ValidationError::Xml(_))));
    }

    #[test]
    fn validate_rejects_other_roots() {
        assert_eq!(
            validate("<html><svg/></html>").unwrap_err(),
            ValidationError::NoSvgRoot
        );
    }
}
