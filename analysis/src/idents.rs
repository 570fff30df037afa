//! Identifier case conversion and constant-name generation.

use std::collections::HashSet;

/// Acronyms kept uppercase in generated constant names.
const COMMON_ACRONYMS: &[&str] = &[
    "ID", "URL", "API", "HTTP", "HTTPS", "DNS", "IP", "CPU", "RAM", "OS", "DB",
];

/// Upper bound on attempts when generating a unique constant name.
/// Collisions are rare in practice, so 100 is plenty.
const UNIQUE_NAME_MAX_ATTEMPTS: usize = 100;

fn is_separator(c: char) -> bool {
    matches!(c, '_' | '-' | '.' | ' ' | ':' | '/' | '\\')
}

/// Convert a string to PascalCase, splitting on common separators.
pub fn to_pascal_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for part in s.split(is_separator).filter(|p| !p.is_empty()) {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            result.extend(first.to_uppercase());
            result.push_str(&chars.as_str().to_lowercase());
        }
    }
    result
}

/// Convert a name to snake_case.
///
/// Handles acronym boundaries (`HTTPServer` -> `http_server`), digit
/// transitions (`userId123` -> `user_id_123`), and normalizes input that
/// already contains underscores by lowercasing it.
pub fn to_snake_case(s: &str) -> String {
    if s.contains('_') {
        return s.to_lowercase();
    }

    let runes: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + 4);

    for (i, &r) in runes.iter().enumerate() {
        if i > 0 {
            let prev = runes[i - 1];
            if r.is_uppercase() {
                if prev.is_lowercase() || prev.is_ascii_digit() {
                    result.push('_');
                } else if prev.is_uppercase()
                    && runes.get(i + 1).is_some_and(|n| n.is_lowercase())
                {
                    // Acronym boundary: last capital before a lowercase run
                    result.push('_');
                }
            } else if r.is_ascii_digit() && !prev.is_ascii_digit() {
                result.push('_');
            } else if r.is_lowercase() && prev.is_ascii_digit() {
                result.push('_');
            }
        }
        result.extend(r.to_lowercase());
    }

    result
}

fn is_common_acronym(word: &str) -> bool {
    COMMON_ACRONYMS.contains(&word)
}

/// Generate a constant name for a context key string.
///
/// `user_id` -> `userIdContextKey`, `api-key` -> `apiKeyContextKey`,
/// `2fa_code` -> `num2faCodeContextKey`. Acronyms stay uppercase except in
/// the leading word.
pub fn context_key_const_name(key: &str) -> String {
    if key.is_empty() {
        return "emptyContextKey".to_string();
    }

    let mut parts: Vec<String> = key
        .split(is_separator)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect();

    if parts.is_empty() {
        return "emptyContextKey".to_string();
    }

    if parts[0].starts_with(|c: char| c.is_ascii_digit()) {
        parts[0] = format!("num{}", parts[0]);
    }

    let mut name = String::new();
    for (i, part) in parts.iter().enumerate() {
        // Keep acronyms uppercase only when the key already spells them that
        // way; `user_id` stays `userIdContextKey`, `base_URL` keeps `URL`.
        if is_common_acronym(part) && i > 0 {
            name.push_str(part);
        } else if i == 0 {
            name.push_str(&part.to_lowercase());
        } else {
            let mut chars = part.chars();
            if let Some(first) = chars.next() {
                name.extend(first.to_uppercase());
                name.push_str(&chars.as_str().to_lowercase());
            }
        }
    }

    name.push_str("ContextKey");
    name
}

/// Return `base` if unused in `taken`, otherwise append `2`, `3`, ... up to a
/// bounded attempt count, falling back to a `_generated` suffix.
pub fn unique_const_name(base: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(base) {
        return base.to_string();
    }

    for i in 2..UNIQUE_NAME_MAX_ATTEMPTS {
        let candidate = format!("{base}{i}");
        if !taken.contains(&candidate) {
            return candidate;
        }
    }

    format!("{base}_generated")
}
