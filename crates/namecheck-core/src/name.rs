//! Name normalization and the deterministic local pre-check.

use std::fmt;

/// Trims a name and collapses internal whitespace runs to single spaces.
pub fn normalize_name(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Upper-cases the first character of each word and lower-cases the rest.
pub fn title_case(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// A rule of the local pre-check that a name violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrecheckFailure {
    InvalidCharacters,
    TooFewLetters,
    ConsecutivePunctuation,
    InvalidDotFormatting,
}

impl PrecheckFailure {
    pub fn reason(&self) -> &'static str {
        match self {
            Self::InvalidCharacters => "Invalid characters",
            Self::TooFewLetters => "Too few letters",
            Self::ConsecutivePunctuation => "Consecutive punctuation",
            Self::InvalidDotFormatting => "Invalid dot formatting",
        }
    }
}

impl fmt::Display for PrecheckFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason())
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Applies the local rules, in order, returning the first one violated.
///
/// Allowed characters are ASCII letters, whitespace, `-` and `.`. A name
/// needs at least three letters, may not contain `--` or `..`, and a dot
/// must not sit directly between two word characters (`m.ahmed`).
pub fn precheck(name: &str) -> Result<(), PrecheckFailure> {
    let allowed = |c: char| c.is_ascii_alphabetic() || c.is_whitespace() || c == '-' || c == '.';
    if !name.chars().all(allowed) {
        return Err(PrecheckFailure::InvalidCharacters);
    }

    if name.chars().filter(char::is_ascii_alphabetic).count() < 3 {
        return Err(PrecheckFailure::TooFewLetters);
    }

    if name.contains("--") || name.contains("..") {
        return Err(PrecheckFailure::ConsecutivePunctuation);
    }

    let chars: Vec<char> = name.chars().collect();
    let squeezed_dot = chars
        .windows(3)
        .any(|w| w[1] == '.' && is_word_char(w[0]) && is_word_char(w[2]));
    if squeezed_dot {
        return Err(PrecheckFailure::InvalidDotFormatting);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_whitespace() {
        assert_eq!(normalize_name("  Aisha \t  Khan \n"), "Aisha Khan");
        assert_eq!(normalize_name("   "), "");
    }

    #[test]
    fn title_case_per_word() {
        assert_eq!(title_case("mOHIUDDIN mohi"), "Mohiuddin Mohi");
        assert_eq!(title_case("p. k. robi"), "P. K. Robi");
    }

    #[test]
    fn precheck_accepts_realistic_shapes() {
        for name in ["Aisha Khan", "Mr. Hanif Uddin", "John-Doe", "M. A. H. Hashan"] {
            assert_eq!(precheck(name), Ok(()), "{name}");
        }
    }

    #[test]
    fn precheck_rules_in_order() {
        assert_eq!(precheck("Abdullah123"), Err(PrecheckFailure::InvalidCharacters));
        assert_eq!(precheck("Ku"), Err(PrecheckFailure::TooFewLetters));
        assert_eq!(precheck("Jahanara--Begum"), Err(PrecheckFailure::ConsecutivePunctuation));
        assert_eq!(precheck("Ravi..Kumar"), Err(PrecheckFailure::ConsecutivePunctuation));
        assert_eq!(precheck("m.ahmed"), Err(PrecheckFailure::InvalidDotFormatting));
    }

    #[test]
    fn digits_fail_before_letter_count() {
        assert_eq!(precheck("A1"), Err(PrecheckFailure::InvalidCharacters));
    }
}
