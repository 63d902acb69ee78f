/// String comparators (RFC 3028 §2.7.3).
///
/// `i;octet` compares bytes as-is; `i;ascii-casemap` folds ASCII letters
/// before comparing. Both are core and need no `require`.

pub trait Comparator: Send + Sync {
    fn equals(&self, value: &str, key: &str) -> bool;

    fn contains(&self, value: &str, key: &str) -> bool;

    /// Glob match: `*` matches any sequence, `?` any single character and
    /// `\` escapes the next character.
    fn matches(&self, value: &str, pattern: &str) -> bool;

    /// Extensions must be required as `comparator-<name>`.
    fn is_extension(&self) -> bool {
        false
    }
}

pub struct Octet;

impl Comparator for Octet {
    fn equals(&self, value: &str, key: &str) -> bool {
        value == key
    }

    fn contains(&self, value: &str, key: &str) -> bool {
        value.contains(key)
    }

    fn matches(&self, value: &str, pattern: &str) -> bool {
        glob(value, pattern, |a, b| a == b)
    }
}

pub struct AsciiCasemap;

impl Comparator for AsciiCasemap {
    fn equals(&self, value: &str, key: &str) -> bool {
        value.eq_ignore_ascii_case(key)
    }

    fn contains(&self, value: &str, key: &str) -> bool {
        value
            .to_ascii_lowercase()
            .contains(&key.to_ascii_lowercase())
    }

    fn matches(&self, value: &str, pattern: &str) -> bool {
        glob(value, pattern, |a, b| a.eq_ignore_ascii_case(&b))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Glob {
    Star,
    One,
    Literal(char),
}

fn compile_glob(pattern: &str) -> Vec<Glob> {
    let mut out = Vec::new();
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        out.push(match c {
            '*' => Glob::Star,
            '?' => Glob::One,
            '\\' => match chars.next() {
                Some(escaped) => Glob::Literal(escaped),
                None => Glob::Literal('\\'),
            },
            other => Glob::Literal(other),
        });
    }
    out
}

/// Iterative wildcard match with single-star backtracking.
fn glob(value: &str, pattern: &str, eq: impl Fn(char, char) -> bool) -> bool {
    let value: Vec<char> = value.chars().collect();
    let pattern = compile_glob(pattern);

    let (mut v, mut p) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while v < value.len() {
        match pattern.get(p) {
            Some(Glob::Star) => {
                backtrack = Some((p, v));
                p += 1;
            }
            Some(Glob::One) => {
                v += 1;
                p += 1;
            }
            Some(Glob::Literal(c)) if eq(*c, value[v]) => {
                v += 1;
                p += 1;
            }
            _ => match backtrack {
                // Let the last star swallow one more character
                Some((star, from)) => {
                    p = star + 1;
                    v = from + 1;
                    backtrack = Some((star, from + 1));
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|g| *g == Glob::Star)
}
