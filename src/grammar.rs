//! Recursive-descent parser for FHiCL document bodies.
//!
//! Structural choices (`value = atom | seq | table`, `number = sci |
//! complex | hex | simple | infinity`) are ordered choices resolved by a
//! one- or two-character lookahead; once a production commits to a shape
//! from that lookahead, a later mismatch inside it is a hard failure, not a
//! backtrack into a sibling alternative. This mirrors the committed-choice
//! discipline of this crate's Earley-grammar ancestor, just applied by hand
//! instead of through a chart.
//!
//! Only document *bodies* reach this parser: `#include` has already been
//! expanded and `BEGIN_PROLOG`/`END_PROLOG` framing already stripped by the
//! preprocessor and order guard. Grammar here never sees either.

use crate::ast::{RawAssoc, RawKey, RawValue};
use crate::cursor::Cursor;
use crate::error::{FhiclError, FhiclResult};
use crate::name::{check_key, Hname, PathSeg};
use crate::numeric;
use crate::value::{Number, RefKind, Value};

const IDENT_START: fn(char) -> bool = |c| c.is_ascii_alphabetic() || c == '_';
const IDENT_CONT: fn(char) -> bool = |c| c.is_ascii_alphanumeric() || c == '_';

pub fn parse_document(text: &str) -> FhiclResult<Vec<RawAssoc>> {
    let mut cur = Cursor::new(text);
    skip_trivia(&mut cur);
    let items = parse_assoc_list(&mut cur, None)?;
    skip_trivia(&mut cur);
    if !cur.at_eof() {
        return Err(FhiclError::parse_failure(
            format!("unexpected trailing input: {:?}", preview(&cur)),
            Some(cur.position()),
        ));
    }
    Ok(items)
}

fn preview(cur: &Cursor) -> String {
    cur.remaining().chars().take(30).collect()
}

/// Skip whitespace and `#`/`//` line comments. Comments are insignificant
/// wherever they appear in a document body (unlike the preprocessor's
/// column-0-only `#include` rule).
fn skip_trivia(cur: &mut Cursor) {
    loop {
        match cur.peek() {
            Some(c) if c.is_whitespace() => {
                cur.advance();
            }
            Some('#') => skip_to_eol(cur),
            Some('/') if cur.peek_at(1) == Some('/') => skip_to_eol(cur),
            _ => break,
        }
    }
}

fn skip_to_eol(cur: &mut Cursor) {
    while let Some(c) = cur.peek() {
        if c == '\n' {
            break;
        }
        cur.advance();
    }
}

/// `assoc_list = assoc*`, terminated by `closing` (e.g. `'}'`) or EOF.
fn parse_assoc_list(cur: &mut Cursor, closing: Option<char>) -> FhiclResult<Vec<RawAssoc>> {
    let mut items = Vec::new();
    loop {
        skip_trivia(cur);
        match cur.peek() {
            None => break,
            Some(c) if Some(c) == closing => break,
            _ => items.push(parse_association(cur)?),
        }
    }
    Ok(items)
}

/// `assoc = id ws* ':' ws* value`
fn parse_association(cur: &mut Cursor) -> FhiclResult<RawAssoc> {
    let key = parse_key(cur)?;
    skip_trivia(cur);
    if !cur.eat_literal(":") {
        return Err(FhiclError::invalid_association(
            format!("expected ':' after key '{}'", key.text()),
            Some(cur.position()),
        ));
    }
    skip_trivia(cur);
    if cur.at_eof() {
        return Err(FhiclError::invalid_association(
            format!("key '{}' has no value", key.text()),
            Some(cur.position()),
        ));
    }
    let value = parse_value(cur)?;
    Ok(RawAssoc { key, value })
}

/// `id = name tail?` — a plain name, optionally immediately (no
/// intervening whitespace) followed by hierarchical navigation segments.
fn parse_key(cur: &mut Cursor) -> FhiclResult<RawKey> {
    let start = cur.pos();
    let name = scan_ident(cur)?;
    check_key(&name)?;
    if matches!(cur.peek(), Some('.') | Some('[')) {
        let tail = parse_hname_tail(cur)?;
        let raw = slice_since(cur, start);
        Ok(RawKey::Hname(Hname { lead: name, tail }, raw))
    } else {
        Ok(RawKey::Name(name))
    }
}

fn slice_since(cur: &Cursor, start: usize) -> String {
    cur.source().chars().skip(start).take(cur.pos() - start).collect()
}

fn scan_ident(cur: &mut Cursor) -> FhiclResult<String> {
    match cur.peek() {
        Some(c) if IDENT_START(c) => {}
        _ => {
            return Err(FhiclError::invalid_token(
                format!("expected a name, found {:?}", preview(cur)),
                Some(cur.position()),
            ))
        }
    }
    let mut s = String::new();
    while let Some(c) = cur.peek() {
        if IDENT_CONT(c) {
            log::trace!("grammar: consuming identifier char '{c}' at {}", cur.position());
            s.push(c);
            cur.advance();
        } else {
            break;
        }
    }
    Ok(s)
}

/// `tail = ('.' name | '[' digits ']')*`, immediately adjacent (no
/// whitespace) to the preceding segment.
fn parse_hname_tail(cur: &mut Cursor) -> FhiclResult<Vec<PathSeg>> {
    let mut segs = Vec::new();
    loop {
        match cur.peek() {
            Some('.') => {
                cur.advance();
                let name = scan_ident(cur)?;
                check_key(&name)?;
                segs.push(PathSeg::Field(name));
            }
            Some('[') => {
                cur.advance();
                let mut digits = String::new();
                while let Some(c) = cur.peek() {
                    if c.is_ascii_digit() {
                        digits.push(c);
                        cur.advance();
                    } else {
                        break;
                    }
                }
                if digits.is_empty() || !cur.eat_literal("]") {
                    return Err(FhiclError::invalid_token(
                        "malformed '[' index in hierarchical name",
                        Some(cur.position()),
                    ));
                }
                let idx: usize = digits.parse().map_err(|_| {
                    FhiclError::invalid_token(format!("index '{digits}' out of range"), Some(cur.position()))
                })?;
                segs.push(PathSeg::Index(idx));
            }
            _ => break,
        }
    }
    Ok(segs)
}

/// `value = atom | seq | table` — chosen by the first significant
/// character; a failure once a shape is chosen does not fall through to a
/// sibling alternative.
fn parse_value(cur: &mut Cursor) -> FhiclResult<RawValue> {
    skip_trivia(cur);
    match cur.peek() {
        Some('{') => {
            log::debug!("grammar: value production chose table at {}", cur.position());
            parse_table(cur)
        }
        Some('[') => {
            log::debug!("grammar: value production chose sequence at {}", cur.position());
            parse_seq(cur)
        }
        _ => {
            log::debug!("grammar: value production chose atom at {}", cur.position());
            parse_atom(cur).map(RawValue::Atom)
        }
    }
}

fn parse_table(cur: &mut Cursor) -> FhiclResult<RawValue> {
    cur.advance(); // '{'
    let items = parse_assoc_list(cur, Some('}'))?;
    skip_trivia(cur);
    if !cur.eat_literal("}") {
        return Err(FhiclError::parse_failure("unterminated table, expected '}'", Some(cur.position())));
    }
    Ok(RawValue::Table(items))
}

fn parse_seq(cur: &mut Cursor) -> FhiclResult<RawValue> {
    cur.advance(); // '['
    let mut items = Vec::new();
    loop {
        skip_trivia(cur);
        if cur.peek() == Some(']') {
            break;
        }
        items.push(parse_value(cur)?);
        skip_trivia(cur);
        match cur.peek() {
            Some(',') => {
                cur.advance();
            }
            Some(']') => break,
            _ => return Err(FhiclError::parse_failure("expected ',' or ']' in sequence", Some(cur.position()))),
        }
    }
    if !cur.eat_literal("]") {
        return Err(FhiclError::parse_failure("unterminated sequence, expected ']'", Some(cur.position())));
    }
    Ok(RawValue::Seq(items))
}

/// `atom = ref | number | string | nil | bool`
fn parse_atom(cur: &mut Cursor) -> FhiclResult<Value> {
    skip_trivia(cur);
    if cur.peek() == Some('@') {
        return parse_ref(cur);
    }
    if let Some(v) = try_number(cur) {
        return Ok(v);
    }
    match cur.peek() {
        Some('"') => parse_quoted(cur, '"'),
        Some('\'') => parse_quoted(cur, '\''),
        Some(c) if IDENT_START(c) => parse_unquoted(cur),
        _ => Err(FhiclError::parse_failure(
            format!("unexpected character in value position: {:?}", preview(cur)),
            Some(cur.position()),
        )),
    }
}

fn parse_ref(cur: &mut Cursor) -> FhiclResult<Value> {
    let kind = if cur.eat_literal("@local::") {
        RefKind::Local
    } else if cur.eat_literal("@db::") {
        RefKind::Db
    } else {
        return Err(FhiclError::invalid_token("expected '@local::' or '@db::'", Some(cur.position())));
    };
    let start = cur.pos();
    let _ = scan_ident(cur)?;
    let _ = parse_hname_tail(cur)?;
    let target = slice_since(cur, start);
    Ok(Value::Ref(kind, target))
}

fn parse_quoted(cur: &mut Cursor, quote: char) -> FhiclResult<Value> {
    cur.advance(); // opening quote
    let mut s = String::new();
    loop {
        match cur.advance() {
            None => return Err(FhiclError::invalid_token("unterminated quoted string", Some(cur.position()))),
            Some('\\') if cur.peek() == Some(quote) => {
                s.push(quote);
                cur.advance();
            }
            Some(c) if c == quote => break,
            Some(c) => s.push(c),
        }
    }
    Ok(Value::Str(s))
}

/// After matching an unquoted identifier in value position, validate the
/// remainder of the line (trailing comments stripped first): a non-empty
/// remainder that contains none of `:`, `.`, `[` is pure garbage with no
/// recognizable follow-on syntax (e.g. `foo bar`), and is rejected here. A
/// remainder that does contain one of those characters reads as a
/// legitimate next association/hname/index (e.g. `foo b: 2`) and is left
/// for the enclosing `assoc_list` loop to parse on its next iteration —
/// genuinely malformed leftovers (e.g. `foo:bar`, which isn't a valid key)
/// still fail there, just with that loop's own error instead of this one.
fn parse_unquoted(cur: &mut Cursor) -> FhiclResult<Value> {
    let word = scan_ident(cur)?;
    match word.as_str() {
        "nil" => return Ok(Value::Nil),
        "True" => return Ok(Value::Bool(true)),
        "False" => return Ok(Value::Bool(false)),
        _ => {}
    }
    let mut rest: String = cur.remaining();
    if let Some(i) = rest.find('\n') {
        rest.truncate(i);
    }
    if let Some(i) = rest.find('#') {
        rest.truncate(i);
    }
    if let Some(i) = rest.find("//") {
        rest.truncate(i);
    }
    let trimmed = rest.trim();
    if !trimmed.is_empty() && !trimmed.contains([':', '.', '[']) {
        return Err(FhiclError::invalid_token(
            format!("malformed unquoted value '{word} {trimmed}'"),
            Some(cur.position()),
        ));
    }
    Ok(Value::Str(word))
}

/// `number = sci | complex | hex | simple | infinity`, tried in that
/// order. Returns `None` (consuming nothing) if the current position
/// cannot start any numeric form at all, so the caller can fall through to
/// string/nil/bool.
fn try_number(cur: &mut Cursor) -> Option<Value> {
    if let Some(v) = try_sci(cur) {
        return Some(v);
    }
    if let Some(v) = try_complex(cur) {
        return Some(v);
    }
    if let Some(v) = try_hex(cur) {
        return Some(v);
    }
    if let Some(v) = try_simple(cur) {
        return Some(v);
    }
    try_infinity(cur)
}

/// `sci = sign? digits '.' digits ('e'|'E') sign? digits`
fn try_sci(cur: &mut Cursor) -> Option<Value> {
    let snapshot = cur.pos();
    let sign = eat_sign(cur);
    let int_part = eat_digits(cur);
    if int_part.is_empty() || !cur.eat_literal(".") {
        cur.set_pos(snapshot);
        return None;
    }
    let frac_part = eat_digits(cur);
    if frac_part.is_empty() {
        cur.set_pos(snapshot);
        return None;
    }
    match cur.peek() {
        Some('e') | Some('E') => {
            cur.advance();
        }
        _ => {
            cur.set_pos(snapshot);
            return None;
        }
    }
    let exp_sign = eat_sign(cur);
    let exp_digits = eat_digits(cur);
    if exp_digits.is_empty() {
        cur.set_pos(snapshot);
        return None;
    }
    let text = numeric::canonicalize_sci(sign, &int_part, &frac_part, exp_sign, &exp_digits);
    Some(Value::Sci(text))
}

/// `complex = "(" simple "," simple ")"`
fn try_complex(cur: &mut Cursor) -> Option<Value> {
    if cur.peek() != Some('(') {
        return None;
    }
    let snapshot = cur.pos();
    cur.advance();
    skip_trivia(cur);
    let re = match try_simple_number(cur) {
        Some(n) => n,
        None => {
            cur.set_pos(snapshot);
            return None;
        }
    };
    skip_trivia(cur);
    if !cur.eat_literal(",") {
        cur.set_pos(snapshot);
        return None;
    }
    skip_trivia(cur);
    let im = match try_simple_number(cur) {
        Some(n) => n,
        None => {
            cur.set_pos(snapshot);
            return None;
        }
    };
    skip_trivia(cur);
    if !cur.eat_literal(")") {
        cur.set_pos(snapshot);
        return None;
    }
    Some(Value::Complex(re, im))
}

/// `hex = ('0x'|'0X') hexdigit+`
fn try_hex(cur: &mut Cursor) -> Option<Value> {
    let snapshot = cur.pos();
    if !(cur.eat_literal("0x") || cur.eat_literal("0X")) {
        return None;
    }
    let mut digits = String::new();
    while let Some(c) = cur.peek() {
        if c.is_ascii_hexdigit() {
            digits.push(c);
            cur.advance();
        } else {
            break;
        }
    }
    if digits.is_empty() {
        cur.set_pos(snapshot);
        return None;
    }
    Some(Value::Hex(slice_since(cur, snapshot)))
}

/// `simple = float | integer`
fn try_simple(cur: &mut Cursor) -> Option<Value> {
    try_simple_number(cur).map(|n| match n {
        Number::Int(i) => Value::Int(i),
        Number::Float(f) => Value::Float(f),
    })
}

fn try_simple_number(cur: &mut Cursor) -> Option<Number> {
    let snapshot = cur.pos();
    let sign = eat_sign(cur);
    let int_part = eat_digits(cur);
    if int_part.is_empty() {
        cur.set_pos(snapshot);
        return None;
    }
    if cur.peek() == Some('.') && cur.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
        cur.advance();
        let frac_part = eat_digits(cur);
        Some(numeric::simple_number(sign, &int_part, Some(&frac_part)))
    } else {
        Some(numeric::simple_number(sign, &int_part, None))
    }
}

/// `infinity = sign? 'Infinity'`
fn try_infinity(cur: &mut Cursor) -> Option<Value> {
    let snapshot = cur.pos();
    let sign = eat_sign(cur);
    if cur.eat_literal("Infinity") {
        Some(Value::Infinity(numeric::infinity_sign(sign)))
    } else {
        cur.set_pos(snapshot);
        None
    }
}

fn eat_sign(cur: &mut Cursor) -> Option<char> {
    match cur.peek() {
        Some(c @ ('+' | '-')) => {
            cur.advance();
            Some(c)
        }
        _ => None,
    }
}

fn eat_digits(cur: &mut Cursor) -> String {
    let mut s = String::new();
    while let Some(c) = cur.peek() {
        if c.is_ascii_digit() {
            s.push(c);
            cur.advance();
        } else {
            break;
        }
    }
    s
}
