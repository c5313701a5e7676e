//! Branch-target label numbering (§4.C).
//!
//! Labels are numbered `L1`, `L2`, ... in order of first appearance among
//! the branch instructions that target them — by instruction stream order,
//! not by target address — so a backward branch can land on a lower-numbered
//! label than a forward one appearing later in the same function.

use std::collections::HashMap;

use crate::decoder::RawInsn;
use crate::ir::Label;

/// Maps every address targeted by a near conditional/unconditional jump or
/// call to the [`Label`] it should resolve to, numbered by first
/// appearance. Targets outside `[firstIP, lastIP+lastLen)` — a branch past
/// the decoded window, truncated by `max_bytes` or by the function's final
/// `ret` — are never registered here, so `builder::build_function` leaves
/// them as raw addresses (§6 `emit_labels`) instead of emitting a `Goto`
/// against a label `Stmt::Label` never defines.
pub(crate) fn assign_labels(instructions: &[RawInsn]) -> HashMap<u64, Label> {
    let mut labels: HashMap<u64, Label> = HashMap::new();
    let mut next_id = 1u32;

    let Some(first) = instructions.first() else {
        return labels;
    };
    let last = instructions.last().expect("non-empty since first is Some");
    let window = first.ip..(last.ip + last.length as u64);

    for insn in instructions {
        if !(insn.is_conditional_jump() || insn.is_unconditional_jump() || insn.is_call()) {
            continue;
        }
        let Some(target) = insn.near_branch_target() else {
            continue;
        };
        if !window.contains(&target) {
            continue;
        }
        labels.entry(target).or_insert_with(|| {
            let label = Label::new(next_id);
            next_id += 1;
            label
        });
    }

    labels
}
