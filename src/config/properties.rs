//! Key/value property file format
//!
//! Accepts the format the harness writes: `key=value`, `key:value` or
//! `key value`, `#`/`!` comment lines, and lines continued with a
//! trailing backslash. Backslash escapes are decoded (`\\`, `\t`, `\n`,
//! `\r`, `\f`, `\uXXXX`, and an escaped separator or space); any other
//! escaped character stands for itself. Later keys overwrite earlier ones.

use std::collections::HashMap;
use tracing::debug;

/// Parsed property set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    values: HashMap<String, String>,
}

impl Properties {
    /// Parse property text
    pub fn parse(text: &str) -> Self {
        let mut values = HashMap::new();
        let mut pending = String::new();
        let mut continued = false;

        for line in text.lines() {
            let line = line.trim_start();
            if !continued && (line.is_empty() || line.starts_with('#') || line.starts_with('!')) {
                continue;
            }

            // An odd run of trailing backslashes continues the line; an even
            // run is a sequence of escaped backslashes
            continued = trailing_backslashes(line) % 2 == 1;
            if continued {
                pending.push_str(&line[..line.len() - 1]);
                continue;
            }
            pending.push_str(line);

            if let Some((key, value)) = split_entry(&pending) {
                values.insert(key, value);
            }
            pending.clear();
        }

        if !pending.is_empty() {
            if let Some((key, value)) = split_entry(&pending) {
                values.insert(key, value);
            }
        }

        Self { values }
    }

    /// Build from already-flattened pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Get a value by key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no keys were found
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn trailing_backslashes(line: &str) -> usize {
    line.bytes().rev().take_while(|b| *b == b'\\').count()
}

/// One decoded character and whether it came from an escape
#[derive(Debug, Clone, Copy)]
struct Unit {
    ch: char,
    escaped: bool,
}

impl Unit {
    fn is_separator(&self) -> bool {
        !self.escaped && (self.ch == '=' || self.ch == ':' || self.ch.is_whitespace())
    }

    fn is_blank(&self) -> bool {
        !self.escaped && self.ch.is_whitespace()
    }
}

fn decode(entry: &str) -> Vec<Unit> {
    let mut units = Vec::with_capacity(entry.len());
    let mut chars = entry.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            units.push(Unit { ch: c, escaped: false });
            continue;
        }
        // A lone backslash at the very end is dropped
        let Some(next) = chars.next() else {
            break;
        };
        let ch = match next {
            't' => '\t',
            'n' => '\n',
            'r' => '\r',
            'f' => '\u{0c}',
            'u' => {
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(ch) if hex.len() == 4 => ch,
                    _ => {
                        debug!("Malformed \\u escape: \\u{}", hex);
                        char::REPLACEMENT_CHARACTER
                    }
                }
            }
            other => other,
        };
        units.push(Unit { ch, escaped: true });
    }

    units
}

fn split_entry(entry: &str) -> Option<(String, String)> {
    let units = decode(entry);
    let start = units.iter().position(|u| !u.is_blank())?;
    let units = &units[start..];

    let key_end = units.iter().position(Unit::is_separator).unwrap_or(units.len());
    let key: String = units[..key_end].iter().map(|u| u.ch).collect();

    // Separator may be surrounded by whitespace: "key = value"
    let mut rest = &units[key_end..];
    while rest.first().is_some_and(Unit::is_blank) {
        rest = &rest[1..];
    }
    if rest.first().is_some_and(|u| !u.escaped && (u.ch == '=' || u.ch == ':')) {
        rest = &rest[1..];
    }
    while rest.first().is_some_and(Unit::is_blank) {
        rest = &rest[1..];
    }
    while rest.last().is_some_and(Unit::is_blank) {
        rest = &rest[..rest.len() - 1];
    }

    Some((key, rest.iter().map(|u| u.ch).collect()))
}
