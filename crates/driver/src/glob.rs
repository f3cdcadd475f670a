//! URL glob patterns as accepted by `Page::wait_for_url`
//!
//! `**` matches any run of characters, `*` any run without `/`, `?` a single
//! character. Everything else is literal.

use regex::Regex;

use crate::error::{DriverError, DriverResult};

pub fn to_regex(pattern: &str) -> DriverResult<Regex> {
    let mut out = String::with_capacity(pattern.len() * 2 + 2);
    out.push('^');

    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' if chars.peek() == Some(&'*') => {
                chars.next();
                out.push_str(".*");
            }
            '*' => out.push_str("[^/]*"),
            '?' => out.push('.'),
            other => out.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
        }
    }

    out.push('$');
    Regex::new(&out).map_err(|e| DriverError::Protocol(format!("bad url pattern {}: {}", pattern, e)))
}

pub fn matches(pattern: &str, url: &str) -> DriverResult<bool> {
    Ok(to_regex(pattern)?.is_match(url))
}
