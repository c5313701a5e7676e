//! Condition synthesis (§4.D): turns a `jcc`/`setcc`/`cmovcc` mnemonic into
//! an `Expr` using only locally-scoped scratch state, in priority order:
//! special zero-register branches, a preceding bit test, a preceding
//! compare/test, then a flag-reference fallback. No backtracking past the
//! single most recent `cmp`/`test`/`bt` — this is a forward-only pass.

use super::Scratch;
use crate::ir::*;

fn mnemonic_suffix(mnemonic: &str) -> &str {
    mnemonic
        .strip_prefix("set")
        .or_else(|| mnemonic.strip_prefix("cmov"))
        .or_else(|| mnemonic.strip_prefix('j'))
        .unwrap_or(mnemonic)
}

pub(crate) fn synthesize_condition(mnemonic: &str, scratch: &Scratch) -> Expr {
    let suffix = mnemonic_suffix(mnemonic);

    if let Some(special) = special_branch_condition(suffix) {
        return special;
    }
    if let Some(bt) = bit_test_condition(suffix, scratch) {
        return bt;
    }
    if let Some(cmp) = compare_condition(suffix, scratch) {
        return cmp;
    }
    flag_fallback(suffix)
}

fn special_branch_condition(suffix: &str) -> Option<Expr> {
    let reg_name = match suffix {
        "cxz" => "cx",
        "ecxz" => "ecx",
        "rcxz" => "rcx",
        _ => return None,
    };
    Some(eq(Expr::Reg(reg_name.to_string()), u_const(0, 64)))
}

fn bit_test_condition(suffix: &str, scratch: &Scratch) -> Option<Expr> {
    let (value, bit) = scratch.last_bt.clone()?;
    let tested = ne(and(shr(value, bit), u_const(1, 64)), u_const(0, 64));
    match suffix {
        "b" | "c" | "nae" => Some(tested),
        "nb" | "nc" | "ae" => Some(lnot(tested)),
        _ => None,
    }
}

fn compare_condition(suffix: &str, scratch: &Scratch) -> Option<Expr> {
    let (lhs, rhs, is_test) = scratch.last_cmp.clone()?;
    if is_test {
        return match suffix {
            "z" | "e" => Some(eq(and(lhs, rhs), u_const(0, 64))),
            "nz" | "ne" => Some(ne(and(lhs, rhs), u_const(0, 64))),
            _ => None,
        };
    }
    let made = match suffix {
        "z" | "e" => eq(lhs, rhs),
        "nz" | "ne" => ne(lhs, rhs),
        "l" | "nge" => slt(lhs, rhs),
        "ge" | "nl" => sge(lhs, rhs),
        "le" | "ng" => sle(lhs, rhs),
        "g" | "nle" => sgt(lhs, rhs),
        "b" | "nae" | "c" => ult(lhs, rhs),
        "ae" | "nb" | "nc" => uge(lhs, rhs),
        "be" | "na" => ule(lhs, rhs),
        "a" | "nbe" => ugt(lhs, rhs),
        _ => return None,
    };
    Some(made)
}

/// No compare/test/bit-test was in scope: fall back to flag algebra over
/// the pseudo-registers `ZF`/`SF`/`OF`/`CF`/`PF` (§4.D), the same flags the
/// real condition code tests. A suffix this function doesn't recognize
/// (there shouldn't be one — this covers every `Jcc`/`SETcc`/`CMOVcc`
/// condition code) falls back to an opaque intrinsic rather than guessing.
fn flag_fallback(suffix: &str) -> Expr {
    let flag = |name: &str, set: bool| eq(Expr::Reg(name.to_string()), u_const(set as u64, 64));
    match suffix {
        "o" => flag("OF", true),
        "no" => flag("OF", false),
        "b" | "c" | "nae" => flag("CF", true),
        "nb" | "nc" | "ae" => flag("CF", false),
        "z" | "e" => flag("ZF", true),
        "nz" | "ne" => flag("ZF", false),
        "be" | "na" => or(flag("CF", true), flag("ZF", true)),
        "a" | "nbe" => and(flag("CF", false), flag("ZF", false)),
        "s" => flag("SF", true),
        "ns" => flag("SF", false),
        "p" | "pe" => flag("PF", true),
        "np" | "po" => flag("PF", false),
        "l" | "nge" => ne(Expr::Reg("SF".to_string()), Expr::Reg("OF".to_string())),
        "ge" | "nl" => eq(Expr::Reg("SF".to_string()), Expr::Reg("OF".to_string())),
        "le" | "ng" => or(flag("ZF", true), ne(Expr::Reg("SF".to_string()), Expr::Reg("OF".to_string()))),
        "g" | "nle" => and(flag("ZF", false), eq(Expr::Reg("SF".to_string()), Expr::Reg("OF".to_string()))),
        _ => Expr::Intrinsic("condition_code".to_string(), vec![Expr::Reg(suffix.to_ascii_uppercase())]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compare_condition_maps_signed_suffixes() {
        let mut scratch = Scratch::default();
        scratch.last_cmp = Some((reg("p1"), reg("p2"), false));
        assert_eq!(synthesize_condition("jle", &scratch), sle(reg("p1"), reg("p2")));
        assert_eq!(synthesize_condition("setg", &scratch), sgt(reg("p1"), reg("p2")));
    }

    #[test]
    fn bit_test_condition_takes_priority_over_stale_compare() {
        let mut scratch = Scratch::default();
        scratch.last_cmp = Some((reg("p1"), reg("p2"), false));
        scratch.last_bt = Some((reg("flags"), u32(3)));
        let cond = synthesize_condition("jb", &scratch);
        assert_eq!(
            cond,
            ne(and(shr(reg("flags"), u32(3)), u_const(1, 64)), u_const(0, 64))
        );
    }

    #[test]
    fn overflow_suffix_with_no_scratch_falls_back_to_the_overflow_flag() {
        let scratch = Scratch::default();
        assert_eq!(
            synthesize_condition("jo", &scratch),
            eq(Expr::Reg("OF".to_string()), u_const(1, 64))
        );
    }

    #[test]
    fn jle_with_no_scratch_falls_back_to_zf_or_sf_ne_of() {
        let scratch = Scratch::default();
        assert_eq!(
            synthesize_condition("jle", &scratch),
            or(
                eq(Expr::Reg("ZF".to_string()), u_const(1, 64)),
                ne(Expr::Reg("SF".to_string()), Expr::Reg("OF".to_string()))
            )
        );
    }

    #[test]
    fn truly_unrecognized_suffix_falls_back_to_the_opaque_intrinsic() {
        let scratch = Scratch::default();
        assert_eq!(
            synthesize_condition("jzzz", &scratch),
            Expr::Intrinsic("condition_code".to_string(), vec![Expr::Reg("ZZZ".to_string())])
        );
    }
}
