//! Reference resolution (RHS `@local::`/`@db::`) and hname override
//! application (LHS `tab.a: ...`). Both run inline from the tree builder,
//! once per association, against the in-progress document scope `D` and
//! the immutable prolog scope `P`.
//!
//! `@db::` is treated as a plain alias for `@local::`: this crate's data
//! model keeps `RefKind` only so the original token is visible in error
//! messages and round-trips through `Display`; resolution does not
//! distinguish the two.

use smol_str::SmolStr;

use crate::debug::DebugLevel;
use crate::error::{FhiclError, FhiclResult};
use crate::name::{split_hname, Hname, PathSeg};
use crate::pipeline_trace;
use crate::value::{Table, Value};

/// §4.5.1 — resolve a `@local::`/`@db::` reference target against `D` then
/// `P`.
pub fn resolve_ref(target: &str, d: &Table, p: &Table) -> FhiclResult<Value> {
    log::debug!("resolver: looking up '{target}'");
    let hname = split_hname(target)?;
    let lead: SmolStr = SmolStr::new(&hname.lead);
    let base = d
        .get(&lead)
        .or_else(|| p.get(&lead))
        .ok_or_else(|| FhiclError::unknown_reference(hname.lead.clone()))?;
    navigate_read(base, &hname.tail, target)
}

fn navigate_read(start: &Value, segs: &[PathSeg], full_target: &str) -> FhiclResult<Value> {
    let mut cur = start;
    for seg in segs {
        cur = match (seg, cur) {
            (PathSeg::Field(n), Value::Table(t)) => {
                t.get(n.as_str()).ok_or_else(|| FhiclError::unknown_reference(full_target))?
            }
            (PathSeg::Index(i), Value::Seq(s)) => {
                s.get(*i).ok_or_else(|| FhiclError::unknown_reference(full_target))?
            }
            _ => return Err(FhiclError::unknown_reference(full_target)),
        };
    }
    Ok(cur.clone())
}

/// §4.5.2/§4.5.3 — apply an hname-keyed override in place. The hname's
/// raw text is never bound in `d`; there is nothing to "schedule for
/// deletion" because nothing is ever inserted under it, which sidesteps
/// the process-global deletion-list bug the legacy implementation carried
/// (see §9 / DESIGN.md).
///
/// If the leading name exists in neither `D` nor `P`, the override is
/// silently dropped (documented, not an error). If it exists only in `P`,
/// the prolog entry is cloned into `D` first (prolog is never mutated in
/// place) and the override applies to the clone.
pub fn apply_hname_override(hname: &Hname, value: Value, d: &mut Table, p: &Table) {
    let lead: SmolStr = SmolStr::new(&hname.lead);
    if !d.contains_key(&lead) {
        match p.get(&lead) {
            Some(from_prolog) => {
                d.insert(lead.clone(), from_prolog.clone());
            }
            None => {
                pipeline_trace!(
                    DebugLevel::Basic,
                    "hname override '{}' dropped: '{}' not found in D or P",
                    hname.lead,
                    hname.lead
                );
                return;
            }
        }
    }
    let container = d.get_mut(&lead).expect("just confirmed present");
    if write_at(container, &hname.tail, value).is_none() {
        pipeline_trace!(
            DebugLevel::Basic,
            "hname override into '{}' dropped: navigation path not found",
            hname.lead
        );
    }
}

/// Writes `value` at the location `segs` navigates to inside `container`.
/// Table segments auto-create the final key if absent; Seq segments
/// replace in range or append at/after the end. Returns `None` (silent
/// drop, never a hard error) if an intermediate segment's container type
/// or index doesn't match what's there.
fn write_at(container: &mut Value, segs: &[PathSeg], value: Value) -> Option<()> {
    let (seg, rest) = segs.split_first()?;
    if rest.is_empty() {
        return match seg {
            PathSeg::Field(n) => {
                let table = container.as_table_mut()?;
                table.insert(SmolStr::new(n), value);
                Some(())
            }
            PathSeg::Index(i) => {
                let seq = container.as_seq_mut()?;
                if *i < seq.len() {
                    seq[*i] = value;
                } else {
                    seq.push(value);
                }
                Some(())
            }
        };
    }
    match seg {
        PathSeg::Field(n) => {
            let table = container.as_table_mut()?;
            let next = table.get_mut(n.as_str())?;
            write_at(next, rest, value)
        }
        PathSeg::Index(i) => {
            let seq = container.as_seq_mut()?;
            let next = seq.get_mut(*i)?;
            write_at(next, rest, value)
        }
    }
}
