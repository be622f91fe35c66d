//! Glob-to-regex compilation with separator-aware wildcards.
//!
//! Naive glob matching lets `*` walk across directory boundaries, so an
//! exclude of `dirname/*css` would also swallow `dirname/subdir/bar.css`.
//! Every rule in this crate is compiled through [`glob_to_regex`], which
//! guarantees `*` and `?` never match `/`. Character classes `[...]` and
//! `[!...]` are supported with POSIX negation semantics.

/// Translate a glob pattern into an unanchored regex fragment.
///
/// `*` becomes `[^/]*`, `?` becomes `[^/]`, character classes are passed
/// through (with `!` negation mapped to `^`), everything else is escaped
/// literally. An unterminated `[` is treated as a literal bracket.
pub fn glob_to_regex(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut re = String::with_capacity(pattern.len() * 2);
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        i += 1;
        match c {
            '*' => re.push_str("[^/]*"),
            '?' => re.push_str("[^/]"),
            '[' => {
                // Scan for the closing bracket; '!' may negate, and a ']'
                // right after the (possibly negated) opening is literal.
                let mut j = i;
                if j < chars.len() && chars[j] == '!' {
                    j += 1;
                }
                if j < chars.len() && chars[j] == ']' {
                    j += 1;
                }
                while j < chars.len() && chars[j] != ']' {
                    j += 1;
                }
                if j >= chars.len() {
                    re.push_str(r"\[");
                } else {
                    let inner: String = chars[i..j].iter().collect();
                    re.push('[');
                    let body = match inner.strip_prefix('!') {
                        Some(rest) => {
                            re.push('^');
                            rest
                        }
                        None => inner.as_str(),
                    };
                    re.push_str(&escape_class_body(body));
                    re.push(']');
                    i = j + 1;
                }
            }
            _ => {
                let mut buf = [0u8; 4];
                re.push_str(&regex::escape(c.encode_utf8(&mut buf)));
            }
        }
    }
    re
}

/// Escape characters that are special inside a regex character class,
/// keeping `-` intact so ranges still work.
fn escape_class_body(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    for c in body.chars() {
        match c {
            '\\' | ']' | '^' | '[' | '&' | '~' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}
