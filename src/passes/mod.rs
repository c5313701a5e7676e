//! The ordered rewrite-pass pipeline (§4.E): nine named passes run in a
//! fixed order over a built `FunctionIR`, each producing new nodes rather
//! than mutating in place — the same "read the old tree, build a new one"
//! shape `cicasm`'s own AST-to-bytecode walk uses, just run repeatedly
//! instead of once.

use std::collections::BTreeMap;

use crate::ir::*;
use crate::options::Options;

/// Runs every pass in the fixed order the spec numbers them in. Determinism
/// (§3) requires this order never change and never depend on anything but
/// `function`'s own contents and `options`.
pub(crate) fn default_pipeline(mut function: FunctionIR, options: &Options) -> FunctionIR {
    function = register_alias_seed(function);
    function = frame_object_clustering_and_rsp_alias(function);
    function = drop_redundant_bit_test_pseudo(function);
    function = map_named_return_constants(function, options);
    function = map_named_ret_assign_constants(function, options);
    function = simplify_redundant_assign(function);
    function = simplify_arithmetic_identities(function);
    function = simplify_boolean_ternary(function);
    function = simplify_logical_nots(function);
    function
}

/// Bottom-up rewrite: recurse into children first, rebuild the node, then
/// let `f` simplify the rebuilt node. Every pass below that needs to touch
/// expressions goes through this rather than hand-rolling its own recursion.
fn rewrite_expr(e: &Expr, f: &mut impl FnMut(Expr) -> Expr) -> Expr {
    let rebuilt = match e {
        Expr::AddrOf(inner) => Expr::AddrOf(Box::new(rewrite_expr(inner, f))),
        Expr::Load(addr, ty, seg) => Expr::Load(Box::new(rewrite_expr(addr, f)), ty.clone(), *seg),
        Expr::BinOp(op, l, r) => Expr::BinOp(*op, Box::new(rewrite_expr(l, f)), Box::new(rewrite_expr(r, f))),
        Expr::UnOp(op, inner) => Expr::UnOp(*op, Box::new(rewrite_expr(inner, f))),
        Expr::Compare(op, l, r) => Expr::Compare(*op, Box::new(rewrite_expr(l, f)), Box::new(rewrite_expr(r, f))),
        Expr::Ternary(c, t, fls) => Expr::Ternary(
            Box::new(rewrite_expr(c, f)),
            Box::new(rewrite_expr(t, f)),
            Box::new(rewrite_expr(fls, f)),
        ),
        Expr::Cast(inner, ty, kind) => Expr::Cast(Box::new(rewrite_expr(inner, f)), ty.clone(), *kind),
        Expr::Call(target, args) => {
            let target = match target {
                CallTarget::Symbol(s) => CallTarget::Symbol(s.clone()),
                CallTarget::Indirect(inner) => CallTarget::Indirect(Box::new(rewrite_expr(inner, f))),
            };
            Expr::Call(target, args.iter().map(|a| rewrite_expr(a, f)).collect())
        }
        Expr::Intrinsic(name, args) => Expr::Intrinsic(name.clone(), args.iter().map(|a| rewrite_expr(a, f)).collect()),
        other => other.clone(),
    };
    f(rebuilt)
}

fn map_function_exprs(mut function: FunctionIR, f: &mut impl FnMut(Expr) -> Expr) -> FunctionIR {
    let stmts = std::mem::take(&mut function.block_mut().statements);
    let rewritten = stmts
        .into_iter()
        .map(|stmt| match stmt {
            Stmt::Assign(lhs, rhs) => Stmt::Assign(Box::new(rewrite_expr(&lhs, f)), Box::new(rewrite_expr(&rhs, f))),
            Stmt::Store(addr, value, ty, seg) => {
                Stmt::Store(Box::new(rewrite_expr(&addr, f)), Box::new(rewrite_expr(&value, f)), ty, seg)
            }
            Stmt::CallStmt(call) => Stmt::CallStmt(Box::new(rewrite_expr(&call, f))),
            Stmt::IfGoto(cond, label) => Stmt::IfGoto(Box::new(rewrite_expr(&cond, f)), label),
            Stmt::Return(Some(v)) => Stmt::Return(Some(Box::new(rewrite_expr(&v, f)))),
            other => other,
        })
        .collect();
    function.block_mut().statements = rewritten;
    function
}

/// Pass 1: seeds the entry-point stable-name register-alias map (§4.D,
/// §8 Testable Property 4). Every width of `rcx`/`rdx`/`r8`/`r9` becomes
/// the parameter it was seeded from; every width of `rax` becomes the
/// stable `ret` register; `xmm0..xmm3` become `fp1..fp4`. These names are
/// never renamed by any later pass.
fn register_alias_seed(function: FunctionIR) -> FunctionIR {
    let param_groups: [(&str, u32, &[&str]); 4] = [
        ("p1", 0, &["rcx", "ecx", "cx", "cl", "ch"]),
        ("p2", 1, &["rdx", "edx", "dx", "dl", "dh"]),
        ("p3", 2, &["r8", "r8d", "r8w", "r8b"]),
        ("p4", 3, &["r9", "r9d", "r9w", "r9b"]),
    ];
    let mut param_map: BTreeMap<&str, (String, u32)> = BTreeMap::new();
    for (pname, idx, regs) in param_groups {
        for reg_name in regs {
            param_map.insert(reg_name, (pname.to_string(), idx));
        }
    }

    let ret_regs: [&str; 5] = ["rax", "eax", "ax", "al", "ah"];

    let fp_groups: [(&str, &str); 4] = [
        ("fp1", "xmm0"),
        ("fp2", "xmm1"),
        ("fp3", "xmm2"),
        ("fp4", "xmm3"),
    ];
    let mut fp_map: BTreeMap<&str, &str> = BTreeMap::new();
    for (alias, reg_name) in fp_groups {
        fp_map.insert(reg_name, alias);
    }

    map_function_exprs(function, &mut |e| match &e {
        Expr::Reg(name) => {
            if let Some((pname, idx)) = param_map.get(name.as_str()) {
                Expr::Param(pname.clone(), *idx)
            } else if ret_regs.contains(&name.as_str()) {
                Expr::Reg("ret".to_string())
            } else if let Some(alias) = fp_map.get(name.as_str()) {
                Expr::Reg(alias.to_string())
            } else {
                e
            }
        }
        _ => e,
    })
}

/// Pass 2: clusters `rsp`-relative frame regions the peephole pass
/// synthesized as `memset((void*)(rsp[ + K]), 0, N)` calls (§4.D — the
/// builder itself only ever materializes `rbp`-relative locals via
/// `address::FrameState`; a leaf frame with no `rbp` gets its zero-fill
/// runs coalesced against bare `rsp`, see `peephole::coalesce_memset_runs`).
/// Each distinct `K` becomes one `Local("frame_0x{K:X}") : Pointer(U8)`
/// with initializer `Cast(rsp + K, Pointer(U8), Reinterpret)`; every other
/// `AddrOf(rsp[ + C])` — the shape the builder/peephole always use for "the
/// address of a memory region", the same convention `address::FrameState`
/// uses for `rbp` locals — falling inside `[K, K + N)` is rewritten to
/// reference that local. A bare, unwrapped `rsp`/`rsp + C` (a stack-pointer
/// adjustment, a push/pop) is never touched — only the `AddrOf` form is, so
/// this can't misfire against the prologue's own `sub rsp, N`.
fn frame_object_clustering_and_rsp_alias(mut function: FunctionIR) -> FunctionIR {
    let mut clusters: BTreeMap<i64, u64> = BTreeMap::new();
    for stmt in &function.block().statements {
        if let Some((k, size)) = rsp_memset_cluster(stmt) {
            let slot = clusters.entry(k).or_insert(0);
            *slot = (*slot).max(size);
        }
    }
    if clusters.is_empty() {
        return function;
    }

    let names: BTreeMap<i64, String> = clusters.keys().map(|&k| (k, format!("frame_0x{k:X}"))).collect();

    for (&k, name) in &names {
        if function.locals.iter().any(|l| l.name == *name) {
            continue;
        }
        let rsp_plus_k = if k == 0 { reg("rsp") } else { add(reg("rsp"), u_const(k as u64, 64)) };
        function.locals.push(LocalVar {
            name: name.clone(),
            ty: Type::pointer(Type::u(8)),
            initializer: Some(Expr::Cast(Box::new(rsp_plus_k), Type::pointer(Type::u(8)), CastKind::Reinterpret)),
        });
    }

    map_function_exprs(function, &mut |e| match &e {
        Expr::AddrOf(inner) => rewrite_rsp_frame_addr(inner, &clusters, &names).unwrap_or(e),
        _ => e,
    })
}

/// Recognizes `memset((void*)(rsp[ + K]), val, N)` and returns `(K, N)`.
fn rsp_memset_cluster(stmt: &Stmt) -> Option<(i64, u64)> {
    let Stmt::CallStmt(call) = stmt else { return None };
    let Expr::Call(CallTarget::Symbol(name), args) = call.as_ref() else {
        return None;
    };
    if name != "memset" || args.len() != 3 {
        return None;
    }
    let Expr::AddrOf(addr) = &args[0] else { return None };
    let k = split_rsp_offset(addr)?;
    let size = match &args[2] {
        Expr::UConst(v, _) => *v,
        Expr::Const(v, _) if *v >= 0 => *v as u64,
        _ => return None,
    };
    Some((k, size))
}

/// Splits `rsp` or `rsp + C` into its constant offset `C` (`0` for bare
/// `rsp`); any other shape returns `None`.
fn split_rsp_offset(addr: &Expr) -> Option<i64> {
    match addr {
        Expr::Reg(name) if name == "rsp" => Some(0),
        Expr::BinOp(BinOp::Add, lhs, rhs) if matches!(lhs.as_ref(), Expr::Reg(name) if name == "rsp") => {
            match rhs.as_ref() {
                Expr::UConst(v, _) => Some(*v as i64),
                Expr::Const(v, _) => Some(*v),
                _ => None,
            }
        }
        _ => None,
    }
}

fn rewrite_rsp_frame_addr(addr: &Expr, clusters: &BTreeMap<i64, u64>, names: &BTreeMap<i64, String>) -> Option<Expr> {
    let c = split_rsp_offset(addr)?;
    let (&k, _) = clusters.range(..=c).next_back()?;
    let size = clusters[&k];
    if c < k || c >= k + size as i64 {
        return None;
    }
    let name = &names[&k];
    if c == k {
        Some(Expr::Local(name.clone()))
    } else {
        Some(add(Expr::Local(name.clone()), i_const(c - k, 64)))
    }
}

/// Pass 3: the builder's `bt` translator never emits a statement (§4.D
/// `bitwise::translate_bt` returns `vec![]`), so this only needs to catch a
/// stray `Pseudo("bt ...")` a future translator path might leave behind.
fn drop_redundant_bit_test_pseudo(mut function: FunctionIR) -> FunctionIR {
    function
        .block_mut()
        .statements
        .retain(|s| !matches!(s, Stmt::Pseudo(text) if text.starts_with("bt ")));
    function
}

fn try_map_constant(value: &Expr, options: &Options) -> Option<Expr> {
    let raw = match value {
        Expr::UConst(v, _) => *v,
        Expr::Const(v, _) => *v as u64,
        _ => return None,
    };
    let name = options
        .constant_provider
        .try_format_value(&options.return_enum_type_full_name, raw)?;
    let bits = match value {
        Expr::UConst(_, b) | Expr::Const(_, b) => *b,
        _ => 32,
    };
    Some(Expr::SymConst(raw, bits, name))
}

/// Pass 4: a literal `return <const>` becomes `return <NAMED_CONSTANT>`
/// when the constant provider recognizes it (§4.G).
fn map_named_return_constants(mut function: FunctionIR, options: &Options) -> FunctionIR {
    for stmt in &mut function.block_mut().statements {
        if let Stmt::Return(Some(value)) = stmt {
            if let Some(named) = try_map_constant(value, options) {
                *value = Box::new(named);
            }
        }
    }
    function
}

/// Pass 5: same mapping, but for `ret` assignments that feed a return
/// rather than the `return` statement itself (the common
/// `mov eax, imm; ...; ret` shape). By the time this pass runs, pass 1
/// has already aliased every width of `rax` to `ret`.
fn map_named_ret_assign_constants(mut function: FunctionIR, options: &Options) -> FunctionIR {
    for stmt in &mut function.block_mut().statements {
        if let Stmt::Assign(lhs, rhs) = stmt {
            let is_return_reg = matches!(lhs.as_ref(), Expr::Reg(name) if name == "ret");
            if is_return_reg {
                if let Some(named) = try_map_constant(rhs, options) {
                    *rhs = Box::new(named);
                }
            }
        }
    }
    function
}

/// Pass 6: drops `Assign(x, x)` — a `mov reg, reg` onto itself, or a cast
/// chain that folded back to its own source.
fn simplify_redundant_assign(mut function: FunctionIR) -> FunctionIR {
    function
        .block_mut()
        .statements
        .retain(|s| !matches!(s, Stmt::Assign(lhs, rhs) if lhs == rhs));
    function
}

/// Pass 7: algebraic identities — `x ^ x -> 0`, `x - x -> 0`, `x & x -> x`,
/// `x | x -> x`, `x + 0 -> x`, `x * 1 -> x`, `x << 0 -> x` and friends, plus
/// constant folding when both operands are integer literals.
fn simplify_arithmetic_identities(function: FunctionIR) -> FunctionIR {
    map_function_exprs(function, &mut |e| match &e {
        Expr::BinOp(op, l, r) => {
            let bits = Expr::fold_width(expr_bits(l), expr_bits(r));
            if let Some(folded) = fold_constant_binop(*op, l, r, bits) {
                return folded;
            }
            match op {
                BinOp::Xor | BinOp::Sub if l == r => u_const(0, bits),
                BinOp::And | BinOp::Or if l == r => (**l).clone(),
                BinOp::Add | BinOp::Or | BinOp::Xor if is_zero(r) => (**l).clone(),
                BinOp::Add | BinOp::Or | BinOp::Xor if is_zero(l) => (**r).clone(),
                BinOp::Sub | BinOp::Shl | BinOp::Shr | BinOp::Sar if is_zero(r) => (**l).clone(),
                BinOp::Mul | BinOp::UDiv | BinOp::SDiv if is_one(r) => (**l).clone(),
                BinOp::Mul if is_one(l) => (**r).clone(),
                BinOp::Mul | BinOp::And if is_zero(r) || is_zero(l) => u_const(0, bits),
                BinOp::And if is_all_ones(r) => (**l).clone(),
                BinOp::And if is_all_ones(l) => (**r).clone(),
                BinOp::Or if is_all_ones(r) || is_all_ones(l) => all_ones_const(bits),
                _ => e,
            }
        }
        _ => e,
    })
}

fn expr_bits(e: &Expr) -> u32 {
    match e {
        Expr::Const(_, b) | Expr::UConst(_, b) | Expr::SymConst(_, b, _) => *b,
        _ => 0,
    }
}

fn is_zero(e: &Expr) -> bool {
    matches!(e, Expr::Const(0, _) | Expr::UConst(0, _))
}

fn is_one(e: &Expr) -> bool {
    matches!(e, Expr::Const(1, _) | Expr::UConst(1, _))
}

/// `-1` is width-relative (§4.E pass 7): a `UConst` matches all-ones when
/// its value is `(1 << bits) - 1` (or `u64::MAX` at 64 bits); a signed
/// `Const` matches only the literal `-1`.
fn is_all_ones(e: &Expr) -> bool {
    match e {
        Expr::Const(-1, _) => true,
        Expr::UConst(v, bits) => *v == all_ones_mask(*bits),
        _ => false,
    }
}

fn all_ones_const(bits: u32) -> Expr {
    Expr::Const(-1, bits)
}

fn all_ones_mask(bits: u32) -> u64 {
    if bits == 0 || bits >= 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

fn truncate_unsigned(v: u64, bits: u32) -> u64 {
    v & all_ones_mask(bits)
}

fn truncate_signed(v: i64, bits: u32) -> i64 {
    if bits == 0 || bits >= 64 {
        v
    } else {
        let shift = 64 - bits;
        (((v as u64) << shift) as i64) >> shift
    }
}

/// Constant folding for `Add/Sub/Mul/And/Or/Xor/Shl/Shr/Sar` (and the
/// division/remainder ops, for free) when both operands are the same kind
/// of integer literal (§4.E pass 7).
fn fold_constant_binop(op: BinOp, l: &Expr, r: &Expr, bits: u32) -> Option<Expr> {
    match (l, r) {
        (Expr::Const(a, _), Expr::Const(b, _)) => fold_signed(op, *a, *b).map(|v| Expr::Const(truncate_signed(v, bits), bits)),
        (Expr::UConst(a, _), Expr::UConst(b, _)) => fold_unsigned(op, *a, *b).map(|v| Expr::UConst(truncate_unsigned(v, bits), bits)),
        _ => None,
    }
}

fn fold_signed(op: BinOp, a: i64, b: i64) -> Option<i64> {
    Some(match op {
        BinOp::Add => a.wrapping_add(b),
        BinOp::Sub => a.wrapping_sub(b),
        BinOp::Mul => a.wrapping_mul(b),
        BinOp::SDiv if b != 0 => a.wrapping_div(b),
        BinOp::SRem if b != 0 => a.wrapping_rem(b),
        BinOp::And => a & b,
        BinOp::Or => a | b,
        BinOp::Xor => a ^ b,
        BinOp::Shl => a.wrapping_shl(b as u32),
        BinOp::Shr => ((a as u64).wrapping_shr(b as u32)) as i64,
        BinOp::Sar => a.wrapping_shr(b as u32),
        _ => return None,
    })
}

fn fold_unsigned(op: BinOp, a: u64, b: u64) -> Option<u64> {
    Some(match op {
        BinOp::Add => a.wrapping_add(b),
        BinOp::Sub => a.wrapping_sub(b),
        BinOp::Mul => a.wrapping_mul(b),
        BinOp::UDiv if b != 0 => a.wrapping_div(b),
        BinOp::URem if b != 0 => a.wrapping_rem(b),
        BinOp::And => a & b,
        BinOp::Or => a | b,
        BinOp::Xor => a ^ b,
        BinOp::Shl => a.wrapping_shl(b as u32),
        BinOp::Shr => a.wrapping_shr(b as u32),
        BinOp::Sar => ((a as i64).wrapping_shr(b as u32)) as u64,
        _ => return None,
    })
}

/// Pass 8: `cond ? a : a -> a`, but only when both the condition and the
/// (structurally identical) arm are side-effect free — see the decided
/// Open Question in `DESIGN.md` on why `Load` counts as side-effecting
/// here.
fn simplify_boolean_ternary(function: FunctionIR) -> FunctionIR {
    map_function_exprs(function, &mut |e| match &e {
        Expr::Ternary(cond, t, f) if t == f && !cond.has_side_effect() && !t.has_side_effect() => (**t).clone(),
        _ => e,
    })
}

/// Pass 9: `!!x -> x`, and `!(l cmp r) -> l (invert cmp) r`.
fn simplify_logical_nots(function: FunctionIR) -> FunctionIR {
    map_function_exprs(function, &mut |e| match e {
        Expr::UnOp(UnOp::LNot, inner) => match *inner {
            Expr::UnOp(UnOp::LNot, innermost) => *innermost,
            Expr::Compare(op, l, r) => Expr::Compare(op.invert(), l, r),
            other => Expr::UnOp(UnOp::LNot, Box::new(other)),
        },
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::MockConstantProvider;

    fn function_with(stmts: Vec<Stmt>) -> FunctionIR {
        let mut f = FunctionIR::new("f", 0, 0);
        f.block_mut().statements = stmts;
        f
    }

    #[test]
    fn self_xor_folds_to_zero() {
        let f = function_with(vec![assign(reg("eax"), xor(reg("eax"), reg("eax")))]);
        let f = simplify_arithmetic_identities(f);
        assert_eq!(f.block().statements, vec![assign(reg("eax"), u_const(0, 32))]);
    }

    #[test]
    fn constant_operands_fold_through_the_default_pipeline() {
        let f = function_with(vec![assign(reg("rax"), add(i_const(2, 32), i_const(3, 32)))]);
        let f = default_pipeline(f, &Options::default());
        assert_eq!(f.block().statements, vec![assign(reg("ret"), Expr::Const(5, 32))]);
    }

    #[test]
    fn and_with_all_ones_simplifies_to_the_other_operand() {
        let f = function_with(vec![assign(reg("eax"), and(reg("p1"), u_const(0xFFFF_FFFF, 32)))]);
        let f = simplify_arithmetic_identities(f);
        assert_eq!(f.block().statements, vec![assign(reg("eax"), reg("p1"))]);
    }

    #[test]
    fn rsp_based_memset_materializes_a_named_frame_local() {
        let f = function_with(vec![call_stmt(memset_call(
            Expr::AddrOf(Box::new(add(reg("rsp"), u_const(0x20, 64)))),
            u_const(0, 8),
            u_const(32, 64),
        ))]);
        let f = frame_object_clustering_and_rsp_alias(f);
        assert_eq!(f.locals.len(), 1);
        assert_eq!(f.locals[0].name, "frame_0x20");
        assert_eq!(f.locals[0].ty, Type::pointer(Type::u(8)));
        assert_eq!(
            f.locals[0].initializer,
            Some(Expr::Cast(
                Box::new(add(reg("rsp"), u_const(0x20, 64))),
                Type::pointer(Type::u(8)),
                CastKind::Reinterpret
            ))
        );
        assert_eq!(
            f.block().statements,
            vec![call_stmt(memset_call(Expr::Local("frame_0x20".to_string()), u_const(0, 8), u_const(32, 64)))]
        );
    }

    #[test]
    fn a_second_memset_inside_the_same_cluster_reuses_the_local() {
        let f = function_with(vec![
            call_stmt(memset_call(
                Expr::AddrOf(Box::new(add(reg("rsp"), u_const(0x20, 64)))),
                u_const(0, 8),
                u_const(32, 64),
            )),
            call_stmt(memcpy_call(
                Expr::AddrOf(Box::new(add(reg("rsp"), u_const(0x28, 64)))),
                reg("p1"),
                u_const(8, 64),
            )),
        ]);
        let f = frame_object_clustering_and_rsp_alias(f);
        assert_eq!(f.locals.len(), 1);
        assert_eq!(
            f.block().statements[1],
            call_stmt(memcpy_call(add(Expr::Local("frame_0x20".to_string()), i_const(8, 64)), reg("p1"), u_const(8, 64)))
        );
    }

    #[test]
    fn no_rsp_memset_leaves_the_function_untouched() {
        let f = function_with(vec![assign(reg("rsp"), sub(reg("rsp"), u_const(0x20, 64)))]);
        let f = frame_object_clustering_and_rsp_alias(f);
        assert!(f.locals.is_empty());
        assert_eq!(f.block().statements, vec![assign(reg("rsp"), sub(reg("rsp"), u_const(0x20, 64)))]);
    }

    #[test]
    fn redundant_self_assign_is_dropped() {
        let f = function_with(vec![assign(reg("eax"), reg("eax")), Stmt::Return(None)]);
        let f = simplify_redundant_assign(f);
        assert_eq!(f.block().statements, vec![Stmt::Return(None)]);
    }

    #[test]
    fn equal_ternary_arms_fold_when_side_effect_free() {
        let f = function_with(vec![assign(reg("eax"), ternary(eq(reg("a"), reg("b")), reg("x"), reg("x")))]);
        let f = simplify_boolean_ternary(f);
        assert_eq!(f.block().statements, vec![assign(reg("eax"), reg("x"))]);
    }

    #[test]
    fn double_negation_and_compare_inversion_both_simplify() {
        let f = function_with(vec![
            assign(reg("a"), lnot(lnot(reg("c")))),
            assign(reg("b"), lnot(eq(reg("p1"), reg("p2")))),
        ]);
        let f = simplify_logical_nots(f);
        assert_eq!(
            f.block().statements,
            vec![assign(reg("a"), reg("c")), assign(reg("b"), ne(reg("p1"), reg("p2")))]
        );
    }

    #[test]
    fn named_return_constant_is_resolved_through_the_collaborator() {
        let mut provider = MockConstantProvider::new();
        provider.add("Windows.Win32.Foundation.NTSTATUS", 0xC0000005, "STATUS_ACCESS_VIOLATION");
        let options = Options {
            constant_provider: std::sync::Arc::new(provider),
            ..Options::default()
        };
        let f = function_with(vec![Stmt::Return(Some(Box::new(u_const(0xC0000005, 32))))]);
        let f = map_named_return_constants(f, &options);
        assert_eq!(
            f.block().statements,
            vec![Stmt::Return(Some(Box::new(Expr::SymConst(
                0xC0000005,
                32,
                "STATUS_ACCESS_VIOLATION".to_string()
            ))))]
        );
    }
}
