//! Label cleanup applied to every anchor's text.
use std::sync::LazyLock;

use regex::Regex;

// One trailing "mp4"/"version"/"ver"/"v..." word plus the whitespace before it.
static TRAILING_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*\b(mp4|version|ver|v\w*)\b\s*$").expect("trailing token pattern compiles")
});
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern compiles"));
static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag pattern compiles"));
static CHAR_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[A-Za-z][A-Za-z0-9]*);?")
        .expect("character reference pattern compiles")
});

// Named references HTML5 still decodes without a closing `;`.
const LEGACY_ENTITIES: &[&str] = &[
    "AElig", "AMP", "Aacute", "Acirc", "Agrave", "Aring", "Atilde", "Auml", "COPY", "Ccedil",
    "ETH", "Eacute", "Ecirc", "Egrave", "Euml", "GT", "Iacute", "Icirc", "Igrave", "Iuml", "LT",
    "Ntilde", "Oacute", "Ocirc", "Ograve", "Oslash", "Otilde", "Ouml", "QUOT", "REG", "THORN",
    "Uacute", "Ucirc", "Ugrave", "Uuml", "Yacute", "aacute", "acirc", "acute", "aelig", "agrave",
    "amp", "aring", "atilde", "auml", "brvbar", "ccedil", "cedil", "cent", "copy", "curren", "deg",
    "divide", "eacute", "ecirc", "egrave", "eth", "euml", "frac12", "frac14", "frac34", "gt",
    "iacute", "icirc", "iexcl", "igrave", "iquest", "iuml", "laquo", "lt", "macr", "micro",
    "middot", "nbsp", "not", "ntilde", "oacute", "ocirc", "ograve", "ordf", "ordm", "oslash",
    "otilde", "ouml", "para", "plusmn", "pound", "quot", "raquo", "reg", "sect", "shy", "sup1",
    "sup2", "sup3", "szlig", "thorn", "times", "uacute", "ucirc", "ugrave", "uml", "uuml",
    "yacute", "yen", "yuml",
];

/// Decode entities, drop one trailing file/version token, collapse whitespace.
///
/// ```
/// use lifeprint_extract::normalize::clean_label;
///
/// assert_eq!(clean_label("0242 book mp4"), "0242 book");
/// assert_eq!(clean_label("  salt &amp;\n pepper "), "salt & pepper");
/// assert_eq!(clean_label("mp4"), "");
/// ```
pub fn clean_label(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    let decoded = decode_entities(raw);
    let stripped = TRAILING_TOKEN.replace(decoded.trim(), "");
    WHITESPACE
        .replace_all(stripped.trim(), " ")
        .trim()
        .to_string()
}

/// Decode character references the way a browser does, including the
/// unterminated forms (`&eacute`, `&#39`, `&lt`) old pages are full of.
///
/// ```
/// use lifeprint_extract::normalize::decode_entities;
///
/// assert_eq!(decode_entities("caf&eacute au lait"), "café au lait");
/// assert_eq!(decode_entities("it&#39s"), "it's");
/// assert_eq!(decode_entities("&amp;lt;"), "&lt;");
/// ```
pub fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }
    let terminated = CHAR_REF.replace_all(raw, |caps: &regex::Captures<'_>| {
        let whole = &caps[0];
        let name = &caps[1];
        if whole.ends_with(';') {
            return whole.to_string();
        }
        if name.starts_with('#') {
            return format!("&{name};");
        }
        // Longest legacy prefix wins; the rest of the word stays literal.
        (2..=name.len())
            .rev()
            .find(|&end| LEGACY_ENTITIES.contains(&&name[..end]))
            .map(|end| format!("&{};{}", &name[..end], &name[end..]))
            .unwrap_or_else(|| whole.to_string())
    });
    html_escape::decode_html_entities(&terminated).into_owned()
}

/// Remove every `<...>` tag, leaving the text between them.
pub fn strip_tags(markup: &str) -> String {
    TAG.replace_all(markup, "").into_owned()
}
