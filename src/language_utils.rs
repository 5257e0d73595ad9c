use isolang::Language;

/// Language utilities for target language handling
///
/// Target languages are free-form, but ISO 639-1 (2-letter) and ISO 639-2
/// (3-letter) codes are resolved to their English names so that "fr" and
/// "French" name the same output column.
/// Convert an ISO 639-2/B (bibliographic) code to its ISO 639-2/T equivalent
fn part2b_to_part2t(code: &str) -> Option<&'static str> {
    match code {
        "fre" => Some("fra"),
        "ger" => Some("deu"),
        "dut" => Some("nld"),
        "gre" => Some("ell"),
        "chi" => Some("zho"),
        "cze" => Some("ces"),
        "ice" => Some("isl"),
        "alb" => Some("sqi"),
        "arm" => Some("hye"),
        "baq" => Some("eus"),
        "bur" => Some("mya"),
        "per" => Some("fas"),
        "geo" => Some("kat"),
        "may" => Some("msa"),
        "mac" => Some("mkd"),
        "rum" => Some("ron"),
        "slo" => Some("slk"),
        "wel" => Some("cym"),
        _ => None,
    }
}

/// Look up a normalized (trimmed, lowercased) code in the ISO 639 tables
fn lookup_code(code: &str) -> Option<Language> {
    match code.len() {
        2 => Language::from_639_1(code),
        3 => Language::from_639_3(code)
            .or_else(|| part2b_to_part2t(code).and_then(Language::from_639_3)),
        _ => None,
    }
}

/// Resolve a user-supplied language into the name used in prompts,
/// output columns and file names
///
/// ISO codes map to their English names; anything else passes through
/// unchanged (trimmed).
pub fn resolve_language_name(input: &str) -> String {
    let trimmed = input.trim();
    let lowered = trimmed.to_lowercase();

    match lookup_code(&lowered) {
        Some(language) => language.to_name().to_string(),
        None => trimmed.to_string(),
    }
}

/// Check whether the input is a recognized ISO 639 code
pub fn is_iso_code(input: &str) -> bool {
    lookup_code(&input.trim().to_lowercase()).is_some()
}
