//! Program-text helpers: fixed-decimal coordinate formatting and the
//! ASCII sanitizer for free-text annotations.
//!
//! Controllers in the field disagree on locale handling and extended
//! character sets, so the output contract is strict: `.` as the decimal
//! separator, no trailing zeros, plain ASCII comments.

/// Formats a coordinate or feed value with at most three decimals,
/// trailing zeros trimmed.
///
/// `format_coord(3.750)` is `"3.75"`, `format_coord(10.0)` is `"10"`.
pub fn format_coord(value: f64) -> String {
    // -0.0 would survive the trim below as "-0".
    let value = if value == 0.0 { 0.0 } else { value };
    let mut s = format!("{:.3}", value);
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    s
}

/// Strips diacritics and drops characters outside the printable ASCII
/// range so annotations survive any controller's comment parser.
pub fn sanitize_annotation(text: &str) -> String {
    text.chars()
        .filter_map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => Some('a'),
            'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => Some('A'),
            'é' | 'è' | 'ê' | 'ë' => Some('e'),
            'É' | 'È' | 'Ê' | 'Ë' => Some('E'),
            'í' | 'ì' | 'î' | 'ï' => Some('i'),
            'Í' | 'Ì' | 'Î' | 'Ï' => Some('I'),
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => Some('o'),
            'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => Some('O'),
            'ú' | 'ù' | 'û' | 'ü' => Some('u'),
            'Ú' | 'Ù' | 'Û' | 'Ü' => Some('U'),
            'ç' => Some('c'),
            'Ç' => Some('C'),
            'ñ' => Some('n'),
            'Ñ' => Some('N'),
            c if (' '..='~').contains(&c) => Some(c),
            _ => None,
        })
        .collect()
}
