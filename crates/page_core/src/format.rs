//! Display formatting helpers shared by the directory pages.

/// Formats a North American phone number as `+1 (AAA) BBB-CCCC`.
///
/// Non-digits are stripped first; an 11-digit number with a leading `1`
/// drops the country code. Anything that doesn't reduce to 10 digits is
/// returned unchanged, including the empty string.
pub fn format_phone_number(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    let digits = match digits.strip_prefix('1') {
        Some(rest) if digits.len() == 11 => rest,
        _ => digits.as_str(),
    };
    if digits.len() == 10 {
        format!("+1 ({}) {}-{}", &digits[..3], &digits[3..6], &digits[6..])
    } else {
        raw.to_string()
    }
}

/// Derives a URL slug from a display name: lower-case, drop everything
/// outside `a-z`, `0-9`, whitespace, and `-`, then collapse each whitespace
/// run into a single hyphen.
///
/// Hyphens already present are kept verbatim, so runs of hyphens and
/// leading/trailing hyphens survive; slugs served by the directory API went
/// through the same rules.
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut pending_hyphen = false;
    for c in lowered.chars() {
        if c.is_whitespace() {
            pending_hyphen = true;
        } else if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
            if pending_hyphen {
                slug.push('-');
                pending_hyphen = false;
            }
            slug.push(c);
        }
    }
    if pending_hyphen {
        slug.push('-');
    }
    slug
}
