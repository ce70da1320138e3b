//! Pre-prolog statement ordering check, and prolog/body text splitting.
//!
//! Runs on the post-include text. `BEGIN_PROLOG`/`END_PROLOG` are treated
//! as word tokens that may appear anywhere (including mid-line, as in
//! `a: 1 BEGIN_PROLOG ...`), not just at column 0 — that asymmetry with
//! `#include`'s column-0 rule is intentional: prologs are a grammar-level
//! framing construct, includes are a preprocessor-level text substitution.

use crate::error::{FhiclError, FhiclResult};

const BEGIN: &str = "BEGIN_PROLOG";
const END: &str = "END_PROLOG";

/// Fails with `IllegalStatement` if any non-comment, non-blank content
/// precedes the first `BEGIN_PROLOG` in the document.
pub fn check_order(text: &str) -> FhiclResult<()> {
    let Some(begin_pos) = find_word(text, BEGIN) else {
        log::debug!("order guard: no BEGIN_PROLOG found, nothing to check");
        return Ok(());
    };
    let prefix = &text[..begin_pos];
    for (i, raw_line) in prefix.split('\n').enumerate() {
        let stripped = strip_line_comment(raw_line);
        if !stripped.trim().is_empty() {
            log::debug!("order guard: illegal statement on line {}", i + 1);
            return Err(FhiclError::illegal_statement(i + 1, raw_line.trim()));
        }
    }
    Ok(())
}

/// Splits `text` into `(prolog_text, body_text)`. Multiple `BEGIN_PROLOG
/// ... END_PROLOG` blocks are concatenated in source order; everything
/// outside any block (in source order) forms the body.
pub fn split_prolog(text: &str) -> (String, String) {
    let mut prolog = String::new();
    let mut body = String::new();
    let mut rest = text;
    loop {
        match find_word(rest, BEGIN) {
            None => {
                body.push_str(rest);
                break;
            }
            Some(b) => {
                body.push_str(&rest[..b]);
                let after_begin = &rest[b + BEGIN.len()..];
                match find_word(after_begin, END) {
                    None => {
                        prolog.push_str(after_begin);
                        prolog.push(' ');
                        break;
                    }
                    Some(e) => {
                        prolog.push_str(&after_begin[..e]);
                        prolog.push(' ');
                        rest = &after_begin[e + END.len()..];
                    }
                }
            }
        }
    }
    (prolog, body)
}

fn strip_line_comment(line: &str) -> &str {
    let hash = line.find('#');
    let slashslash = line.find("//");
    match (hash, slashslash) {
        (Some(h), Some(s)) => &line[..h.min(s)],
        (Some(h), None) => &line[..h],
        (None, Some(s)) => &line[..s],
        (None, None) => line,
    }
}

fn find_word(text: &str, word: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut start = 0;
    while let Some(rel) = text.get(start..).and_then(|s| s.find(word)) {
        let pos = start + rel;
        let before_ok = pos == 0 || !is_ident_byte(bytes[pos - 1]);
        let after = pos + word.len();
        let after_ok = after >= bytes.len() || !is_ident_byte(bytes[after]);
        if before_ok && after_ok {
            return Some(pos);
        }
        start = pos + word.len();
    }
    None
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}
