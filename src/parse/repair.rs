// src/parse/repair.rs

use crate::table::FIELD_COUNT;

/// What happened to one line of the raw file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// At most [`FIELD_COUNT`] fields from the quoted split; kept as-is.
    Accepted(Vec<String>),
    /// Too wide at first, but the space-before-pipe re-split fits.
    Repaired(Vec<String>),
    /// Still too wide after re-splitting. Holds the rejoined line.
    Invalid(String),
}

/// Decide the fate of one line given its quoted-CSV split.
///
/// Lines that are too wide are rejoined with `|` and split again with
/// [`split_unspaced_pipes`]. The heuristic relies on the source data writing
/// a literal pipe inside a value as `" |"`; it is kept exactly as-is because
/// the existing invalid-line corpus depends on that tie-break.
pub fn classify(fields: Vec<String>) -> LineOutcome {
    if fields.len() <= FIELD_COUNT {
        return LineOutcome::Accepted(fields);
    }

    let line = fields.join("|");
    let resplit = split_unspaced_pipes(&line);
    if resplit.len() > FIELD_COUNT {
        LineOutcome::Invalid(line)
    } else {
        LineOutcome::Repaired(resplit.into_iter().map(str::to_owned).collect())
    }
}

/// Split on `|` only where it is not preceded by a space, i.e. the
/// `(?<! )\|` pattern. The `regex` crate has no look-behind, so this walks
/// the bytes directly; both `|` and ` ` are ASCII so every cut is on a char
/// boundary.
pub fn split_unspaced_pipes(line: &str) -> Vec<&str> {
    let bytes = line.as_bytes();
    let mut parts = Vec::new();
    let mut start = 0;
    for (i, &b) in bytes.iter().enumerate() {
        if b == b'|' && (i == 0 || bytes[i - 1] != b' ') {
            parts.push(&line[start..i]);
            start = i + 1;
        }
    }
    parts.push(&line[start..]);
    parts
}
