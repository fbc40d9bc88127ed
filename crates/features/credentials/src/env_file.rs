//! Reading and rewriting plain `KEY=value` files.

use callkit_domain::constants::{ACCOUNT_SID_KEY, AUTH_TOKEN_KEY, CREDENTIALS_COMMENT};
use std::borrow::Cow;

/// Splits one line into key and value.
///
/// Blank lines and `#` comments yield `None`. An `export ` prefix is accepted, the key
/// and value are trimmed and matching single or double quotes are removed. Inside double
/// quotes `\"` and `\\` are unescaped. Unquoted values end at an inline ` #` comment.
pub(crate) fn parse_line(line: &str) -> Option<(&str, Cow<'_, str>)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let line = line.strip_prefix("export ").map_or(line, str::trim_start);
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key, unquote(value.trim())))
}

fn unquote(value: &str) -> Cow<'_, str> {
    if let Some(inner) = value.strip_prefix('"').and_then(|v| v.strip_suffix('"')) {
        return unescape(inner);
    }
    if let Some(inner) = value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')) {
        return Cow::Borrowed(inner);
    }
    Cow::Borrowed(value.split_once(" #").map_or(value, |(head, _)| head.trim_end()))
}

fn unescape(inner: &str) -> Cow<'_, str> {
    if !inner.contains('\\') {
        return Cow::Borrowed(inner);
    }
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(escaped @ ('"' | '\\')) => out.push(escaped),
            Some(other) => {
                out.push('\\');
                out.push(other);
            },
            None => out.push('\\'),
        }
    }
    Cow::Owned(out)
}

/// Double-quotes `value`, escaping `"` and `\` so [`parse_line`] reads it back verbatim.
fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if matches!(c, '"' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Last value assigned to `key`, if any.
pub(crate) fn lookup<'a>(contents: &'a str, key: &str) -> Option<Cow<'a, str>> {
    contents.lines().rev().filter_map(parse_line).find(|(k, _)| *k == key).map(|(_, v)| v)
}

fn is_credential_line(line: &str) -> bool {
    line.trim() == CREDENTIALS_COMMENT
        || parse_line(line).is_some_and(|(key, _)| key == ACCOUNT_SID_KEY || key == AUTH_TOKEN_KEY)
}

/// Produces the new file contents with the credential block replaced.
///
/// Unrelated lines keep their order, runs of blank lines collapse into one, and the
/// block (`# Twilio credentials` plus both keys) is appended after a single blank line.
/// Values are written double-quoted. Callers must reject line breaks beforehand.
/// Rendering the result again with the same values returns it unchanged.
pub(crate) fn render(existing: &str, account_sid: &str, auth_token: &str) -> String {
    let mut kept: Vec<&str> = Vec::new();
    for line in existing.lines().filter(|line| !is_credential_line(line)) {
        let blank = line.trim().is_empty();
        if blank && kept.last().is_none_or(|prev| prev.trim().is_empty()) {
            continue;
        }
        kept.push(if blank { "" } else { line });
    }
    while kept.last().is_some_and(|line| line.is_empty()) {
        kept.pop();
    }

    let mut out = String::with_capacity(existing.len() + 128);
    for line in &kept {
        out.push_str(line);
        out.push('\n');
    }
    if !kept.is_empty() {
        out.push('\n');
    }
    out.push_str(CREDENTIALS_COMMENT);
    out.push('\n');
    out.push_str(&format!("{ACCOUNT_SID_KEY}={}\n", quote(account_sid)));
    out.push_str(&format!("{AUTH_TOKEN_KEY}={}\n", quote(auth_token)));
    out
}
