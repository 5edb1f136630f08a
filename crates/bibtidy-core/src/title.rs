//! Title capital-letter protection
//!
//! BibTeX styles lower-case titles unless letters are wrapped in braces. Every
//! capital letter is wrapped as `{X}` except the first letter of the title,
//! which styles capitalize anyway.

/// Protect capital letters in a title, leaving the first letter bare
///
/// Leading `{` and whitespace are skipped before looking for the first letter.
/// Capitals that already sit inside a brace group are left alone, which makes
/// the function idempotent. LaTeX control sequences (`\LaTeX`, `\"`) are copied
/// verbatim; a control word counts as the first letter if it comes first.
///
/// ```
/// use bibtidy_core::title::protect_title_capitals;
///
/// assert_eq!(protect_title_capitals("Fast DNA Sequencing"), "Fast {D}{N}{A} {S}equencing");
/// ```
pub fn protect_title_capitals(title: &str) -> String {
    if title.is_empty() {
        return String::new();
    }

    let mut protected = String::with_capacity(title.len() + 8);
    let mut depth = 0usize;
    let mut seen_letter = false;
    let mut chars = title.chars().peekable();

    // Leading grouping markers and whitespace
    while let Some(&c) = chars.peek() {
        if c == '{' {
            depth += 1;
        } else if !c.is_whitespace() {
            break;
        }
        protected.push(c);
        chars.next();
    }

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                protected.push(c);
                match chars.peek() {
                    Some(&next) if next.is_alphabetic() => {
                        while let Some(&letter) = chars.peek() {
                            if !letter.is_alphabetic() {
                                break;
                            }
                            protected.push(letter);
                            chars.next();
                        }
                        seen_letter = true;
                    }
                    Some(&next) => {
                        protected.push(next);
                        chars.next();
                    }
                    None => {}
                }
            }
            '{' => {
                depth += 1;
                protected.push(c);
            }
            '}' => {
                depth = depth.saturating_sub(1);
                protected.push(c);
            }
            c if c.is_uppercase() && seen_letter && depth == 0 => {
                protected.push('{');
                protected.push(c);
                protected.push('}');
            }
            c => {
                if c.is_alphabetic() {
                    seen_letter = true;
                }
                protected.push(c);
            }
        }
    }

    protected
}

/// Apply [`protect_title_capitals`] to an optional title
pub fn protect_optional_title(title: Option<&str>) -> Option<String> {
    title.map(protect_title_capitals)
}
