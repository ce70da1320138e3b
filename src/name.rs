//! Hierarchical name parsing: splitting an `hname` token (e.g. `tab.a[2]`)
//! into a leading name and a sequence of navigation segments.

use crate::error::FhiclError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSeg {
    /// `.name` — navigate into a Table by key.
    Field(String),
    /// `[i]` — navigate into a Seq by zero-based index.
    Index(usize),
}

/// A parsed hierarchical name: the leading plain name and zero or more
/// trailing navigation segments. A bare `Name` (no segments) is a valid
/// `Hname` with an empty tail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hname {
    pub lead: String,
    pub tail: Vec<PathSeg>,
}

impl Hname {
    pub fn is_plain_name(&self) -> bool {
        self.tail.is_empty()
    }
}

/// `checkKey`: first character must be alphabetic or `_`; digits are
/// rejected.
pub fn check_key(name: &str) -> Result<(), FhiclError> {
    match name.chars().next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => Ok(()),
        Some(c) if c.is_ascii_digit() => Err(FhiclError::invalid_token(
            format!("name '{name}' cannot start with a digit"),
            None,
        )),
        _ => Err(FhiclError::invalid_token(
            format!("invalid name '{name}'"),
            None,
        )),
    }
}

/// Split a raw hname-shaped string (`tab.a[2].b`) into lead + tail.
/// Used both for reference targets and for hname override keys — both use
/// the identical "split on first indexing character" rule from the spec.
pub fn split_hname(raw: &str) -> Result<Hname, FhiclError> {
    let first_idx = raw.find(['.', '[']);
    let (lead, rest) = match first_idx {
        Some(i) => (&raw[..i], &raw[i..]),
        None => (raw, ""),
    };
    check_key(lead)?;
    let tail = parse_tail(rest)?;
    Ok(Hname { lead: lead.to_string(), tail })
}

fn parse_tail(mut rest: &str) -> Result<Vec<PathSeg>, FhiclError> {
    let mut segs = Vec::new();
    while !rest.is_empty() {
        if let Some(stripped) = rest.strip_prefix('.') {
            let end = stripped
                .find(['.', '['])
                .unwrap_or(stripped.len());
            let (name, remainder) = stripped.split_at(end);
            if name.is_empty() {
                return Err(FhiclError::invalid_token(
                    "empty field segment in hierarchical name",
                    None,
                ));
            }
            check_key(name)?;
            segs.push(PathSeg::Field(name.to_string()));
            rest = remainder;
        } else if let Some(stripped) = rest.strip_prefix('[') {
            let close = stripped.find(']').ok_or_else(|| {
                FhiclError::invalid_token("unterminated '[' in hierarchical name", None)
            })?;
            let digits = &stripped[..close];
            let idx: usize = digits.parse().map_err(|_| {
                FhiclError::invalid_token(
                    format!("expected a non-negative index, found '{digits}'"),
                    None,
                )
            })?;
            segs.push(PathSeg::Index(idx));
            rest = &stripped[close + 1..];
        } else {
            return Err(FhiclError::invalid_token(
                format!("malformed hierarchical name remainder '{rest}'"),
                None,
            ));
        }
    }
    Ok(segs)
}
