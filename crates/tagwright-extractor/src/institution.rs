//! Institution name canonicalization

/// Full names of well-known institutions and their canonical abbreviation
const ABBREVIATIONS: &[(&str, &str)] = &[
    ("Massachusetts Institute of Technology", "MIT"),
    ("Stanford University", "Stanford"),
    ("Carnegie Mellon University", "CMU"),
    ("University of California, Berkeley", "UC Berkeley"),
    ("University of California Berkeley", "UC Berkeley"),
    ("California Institute of Technology", "Caltech"),
    ("University of Illinois Urbana-Champaign", "UIUC"),
    ("University of Illinois at Urbana-Champaign", "UIUC"),
    ("University of Michigan", "UMich"),
    ("Georgia Institute of Technology", "Georgia Tech"),
    ("University of Washington", "UW"),
    ("Princeton University", "Princeton"),
    ("Harvard University", "Harvard"),
    ("Columbia University", "Columbia"),
    ("ETH Zurich", "ETH Zurich"),
    ("École Polytechnique Fédérale de Lausanne", "EPFL"),
    ("University of Oxford", "Oxford"),
    ("University of Cambridge", "Cambridge"),
    ("National University of Singapore", "NUS"),
    ("Nanyang Technological University", "NTU"),
    ("University of Tokyo", "UTokyo"),
    ("Tsinghua University", "Tsinghua"),
    ("Peking University", "PKU"),
    ("The Chinese University of Hong Kong", "CUHK"),
    ("The University of Hong Kong", "HKU"),
    ("University of Toronto", "UofT"),
];

/// Whether `s` contains a CJK unified ideograph (U+3400..=U+9FFF)
fn has_cjk(s: &str) -> bool {
    s.chars().any(|c| ('\u{3400}'..='\u{9FFF}').contains(&c))
}

/// Canonicalize an institution name
///
/// Names written in CJK characters are kept as-is. Otherwise an exact,
/// case-insensitive match on a known full name yields its abbreviation.
/// Everything else, including names already abbreviated, passes through
/// trimmed but otherwise verbatim.
pub fn canonicalize_institution(name: &str) -> String {
    let raw = name.trim();
    if raw.is_empty() || has_cjk(raw) {
        return raw.to_string();
    }

    let folded = raw.to_lowercase();
    ABBREVIATIONS
        .iter()
        .find(|(full, _)| full.to_lowercase() == folded)
        .map(|(_, abbr)| abbr.to_string())
        .unwrap_or_else(|| raw.to_string())
}
