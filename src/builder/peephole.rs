//! Peephole coalescing over the finished statement list (§4.D): a run of
//! ≥32 bytes of 128-bit zero stores (the `xorps reg,reg` / `movups`
//! zero-fill idiom, see `builder::translate::xmm`) becomes a `memset` call,
//! and a run of ≥32 bytes of matched 128-bit load/store pairs becomes a
//! `memcpy` call. Each instruction still contributes its own `Stmt::Asm`
//! comment line ahead of its semantic statement(s), so a "run" here means a
//! run of the matching `Store`/`Assign` statements with only comment/label
//! noise between them, not strict list adjacency.

use std::collections::BTreeMap;

use crate::ir::*;

/// Applies both coalescing rules to `stmts` in one left-to-right pass.
pub(crate) fn coalesce(stmts: Vec<Stmt>) -> Vec<Stmt> {
    let stmts = coalesce_memcpy_pairs(stmts);
    coalesce_memset_runs(stmts)
}

fn is_noise(stmt: &Stmt) -> bool {
    matches!(stmt, Stmt::Asm(_) | Stmt::Label(_) | Stmt::Comment(_))
}

/// First index at or after `from` that isn't comment/label noise.
fn next_non_noise(stmts: &[Stmt], from: usize) -> Option<usize> {
    (from..stmts.len()).find(|&i| !is_noise(&stmts[i]))
}

fn is_zero_store(stmt: &Stmt) -> Option<(&Expr, &Type, Segment)> {
    match stmt {
        Stmt::Store(addr, value, ty, seg) => match value.as_ref() {
            Expr::UConst(0, _) | Expr::Const(0, _) => Some((addr, ty, *seg)),
            _ => None,
        },
        _ => None,
    }
}

/// An address of the shape `base + k` for a constant `k`, split into
/// `(base, k)`; a bare address is `(addr, 0)`.
fn split_constant_offset(addr: &Expr) -> (Expr, i64) {
    if let Expr::BinOp(BinOp::Add, lhs, rhs) = addr {
        match rhs.as_ref() {
            Expr::UConst(v, _) => return (lhs.as_ref().clone(), *v as i64),
            Expr::Const(v, _) => return (lhs.as_ref().clone(), *v),
            _ => {}
        }
    }
    (addr.clone(), 0)
}

fn offset_expr(base: &Expr, off: i64) -> Expr {
    if off == 0 {
        base.clone()
    } else if off > 0 {
        add(base.clone(), u_const(off as u64, 64))
    } else {
        add(base.clone(), i_const(off, 64))
    }
}

/// Replaces every consumed index with nothing, except the last index of
/// each coalesced run, which is replaced by its synthesized call — while
/// every untouched statement (including the noise between runs) passes
/// through unchanged.
fn apply_replacements(stmts: Vec<Stmt>, consumed: Vec<bool>, mut insert_after: BTreeMap<usize, Stmt>) -> Vec<Stmt> {
    let mut out = Vec::with_capacity(stmts.len());
    for (idx, stmt) in stmts.into_iter().enumerate() {
        if consumed[idx] {
            if let Some(replacement) = insert_after.remove(&idx) {
                out.push(replacement);
            }
            continue;
        }
        out.push(stmt);
    }
    out
}

const XMM_BITS: u32 = 128;
const XMM_BYTES: i64 = 16;
const MIN_RUN_BYTES: u64 = 32;

/// Matches a `movups`/`movaps`/`movdqu` zero-store run of 128-bit stores
/// only (§4.D "Peephole: zero-store run → memset"); narrower stores have no
/// corresponding compiler idiom in the spec and are left untouched.
fn coalesce_memset_runs(stmts: Vec<Stmt>) -> Vec<Stmt> {
    let n = stmts.len();
    let mut consumed = vec![false; n];
    let mut insert_after: BTreeMap<usize, Stmt> = BTreeMap::new();

    let mut i = 0;
    while i < n {
        if !consumed[i] && !is_noise(&stmts[i]) {
            if let Some((addr, ty, seg)) = is_zero_store(&stmts[i]) {
                if ty.bits() == XMM_BITS {
                    let (base, start_off) = split_constant_offset(addr);
                    let mut run = vec![i];
                    let mut cursor = i;
                    while let Some(next) = next_non_noise(&stmts, cursor + 1) {
                        let Some((next_addr, next_ty, next_seg)) = is_zero_store(&stmts[next]) else {
                            break;
                        };
                        if next_seg != seg || next_ty.bits() != XMM_BITS {
                            break;
                        }
                        let (next_base, next_off) = split_constant_offset(next_addr);
                        if next_base != base || next_off != start_off + (run.len() as i64) * XMM_BYTES {
                            break;
                        }
                        run.push(next);
                        cursor = next;
                    }
                    let total_bytes = run.len() as u64 * XMM_BYTES as u64;
                    if total_bytes >= MIN_RUN_BYTES {
                        for &idx in &run {
                            consumed[idx] = true;
                        }
                        let last = *run.last().unwrap();
                        insert_after.insert(
                            last,
                            call_stmt(memset_call(
                                Expr::AddrOf(Box::new(offset_expr(&base, start_off))),
                                u_const(0, 8),
                                u_const(total_bytes, 64),
                            )),
                        );
                        i = last + 1;
                        continue;
                    }
                }
            }
        }
        i += 1;
    }

    apply_replacements(stmts, consumed, insert_after)
}

/// Matches the `Assign(lhs, Load(src)); Store(dst, lhs)` shape a 128-bit
/// `movups`/`movaps`/`movdqu` load-then-store pair translates to, starting
/// at the index of the `Assign`. Returns the matching `Store`'s index plus
/// both addresses split into `(base, offset)`.
fn match_copy_pair(stmts: &[Stmt], assign_idx: usize) -> Option<(usize, Expr, i64, Expr, i64, Type)> {
    let Stmt::Assign(lhs, rhs) = &stmts[assign_idx] else {
        return None;
    };
    let Expr::Load(src_addr, load_ty, _load_seg) = rhs.as_ref() else {
        return None;
    };
    if !matches!(lhs.as_ref(), Expr::Local(_) | Expr::Reg(_)) {
        return None;
    }
    let store_idx = next_non_noise(stmts, assign_idx + 1)?;
    let Stmt::Store(dst_addr, value, ty, _seg) = &stmts[store_idx] else {
        return None;
    };
    if value.as_ref() != lhs.as_ref() || ty != load_ty {
        return None;
    }
    let (dst_base, dst_off) = split_constant_offset(dst_addr);
    let (src_base, src_off) = split_constant_offset(src_addr);
    Some((store_idx, dst_base, dst_off, src_base, src_off, ty.clone()))
}

/// Matches a run of ≥2 consecutive 128-bit load/store pairs (§4.D
/// "Peephole: paired loads/stores → memcpy"), each pair's addresses
/// advancing by 16 bytes over the last.
fn coalesce_memcpy_pairs(stmts: Vec<Stmt>) -> Vec<Stmt> {
    let n = stmts.len();
    let mut consumed = vec![false; n];
    let mut insert_after: BTreeMap<usize, Stmt> = BTreeMap::new();

    let mut i = 0;
    while i < n {
        if !consumed[i] && !is_noise(&stmts[i]) {
            if let Some((store_idx0, dst_base, dst_off0, src_base, src_off0, ty)) = match_copy_pair(&stmts, i) {
                if ty.bits() == XMM_BITS {
                    let mut pairs = vec![(i, store_idx0)];
                    let mut cursor = store_idx0;
                    while let Some(next_assign) = next_non_noise(&stmts, cursor + 1) {
                        let Some((next_store, next_dst_base, next_dst_off, next_src_base, next_src_off, next_ty)) =
                            match_copy_pair(&stmts, next_assign)
                        else {
                            break;
                        };
                        if next_ty != ty || next_dst_base != dst_base || next_src_base != src_base {
                            break;
                        }
                        let expected = (pairs.len() as i64) * XMM_BYTES;
                        if next_dst_off != dst_off0 + expected || next_src_off != src_off0 + expected {
                            break;
                        }
                        pairs.push((next_assign, next_store));
                        cursor = next_store;
                    }
                    let total_bytes = pairs.len() as u64 * XMM_BYTES as u64;
                    if total_bytes >= MIN_RUN_BYTES {
                        for &(a, s) in &pairs {
                            consumed[a] = true;
                            consumed[s] = true;
                        }
                        let last_store = pairs.last().unwrap().1;
                        insert_after.insert(
                            last_store,
                            call_stmt(memcpy_call(
                                Expr::AddrOf(Box::new(offset_expr(&dst_base, dst_off0))),
                                Expr::AddrOf(Box::new(offset_expr(&src_base, src_off0))),
                                u_const(total_bytes, 64),
                            )),
                        );
                        i = last_store + 1;
                        continue;
                    }
                }
            }
        }
        i += 1;
    }

    apply_replacements(stmts, consumed, insert_after)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zero_store_xmm(base_name: &str, offset: i64) -> Stmt {
        let addr = offset_expr(&local(base_name), offset);
        store(addr, u_const(0, 128), Type::Vector { bits: 128 }, Segment::None)
    }

    #[test]
    fn coalesces_a_32_byte_zero_xmm_store_run_into_memset() {
        let stmts = vec![
            Stmt::Asm("movups [buf], xmm0".to_string()),
            zero_store_xmm("buf", 0),
            Stmt::Asm("movups [buf+0x10], xmm0".to_string()),
            zero_store_xmm("buf", 16),
        ];
        let out = coalesce(stmts);
        assert_eq!(out.len(), 3);
        match out.last().unwrap() {
            Stmt::CallStmt(call) => match call.as_ref() {
                Expr::Call(CallTarget::Symbol(name), args) => {
                    assert_eq!(name, "memset");
                    assert_eq!(args[2], u_const(32, 64));
                }
                _ => panic!("expected a memset call"),
            },
            _ => panic!("expected a call statement"),
        }
    }

    #[test]
    fn leaves_a_single_16_byte_zero_xmm_store_untouched() {
        let stmts = vec![zero_store_xmm("buf", 0)];
        let out = coalesce(stmts.clone());
        assert_eq!(out, stmts);
    }

    #[test]
    fn narrower_zero_store_runs_never_coalesce() {
        let addr = |off: i64| offset_expr(&local("buf"), off);
        let stmts = vec![
            store(addr(0), u_const(0, 32), Type::u(32), Segment::None),
            store(addr(4), u_const(0, 32), Type::u(32), Segment::None),
            store(addr(8), u_const(0, 32), Type::u(32), Segment::None),
            store(addr(12), u_const(0, 32), Type::u(32), Segment::None),
        ];
        let out = coalesce(stmts.clone());
        assert_eq!(out, stmts);
    }

    #[test]
    fn coalesces_two_16_byte_copy_pairs_into_memcpy() {
        let pair = |dst_off: i64, src_off: i64| {
            vec![
                Stmt::Asm("movups xmm0, [src]".to_string()),
                assign(reg("xmm0"), load(offset_expr(&local("src"), src_off), Type::Vector { bits: 128 }, Segment::None)),
                Stmt::Asm("movups [dst], xmm0".to_string()),
                store(offset_expr(&local("dst"), dst_off), reg("xmm0"), Type::Vector { bits: 128 }, Segment::None),
            ]
        };
        let mut stmts = pair(0, 0);
        stmts.extend(pair(16, 16));
        let out = coalesce(stmts);
        assert_eq!(out.len(), 5);
        match out.last().unwrap() {
            Stmt::CallStmt(call) => match call.as_ref() {
                Expr::Call(CallTarget::Symbol(name), args) => {
                    assert_eq!(name, "memcpy");
                    assert_eq!(args[2], u_const(32, 64));
                }
                _ => panic!("expected a memcpy call"),
            },
            _ => panic!("expected a call statement"),
        }
    }

    #[test]
    fn a_single_copy_pair_is_below_the_memcpy_threshold() {
        let stmts = vec![
            assign(reg("xmm0"), load(local("src"), Type::Vector { bits: 128 }, Segment::None)),
            store(local("dst"), reg("xmm0"), Type::Vector { bits: 128 }, Segment::None),
        ];
        let out = coalesce(stmts.clone());
        assert_eq!(out, stmts);
    }
}
