//! Small constructor helpers for `Expr`/`Stmt` (§4.A). These add no
//! behavior beyond construction — the builder and passes use them instead
//! of spelling out `Expr::BinOp(BinOp::Add, Box::new(...), Box::new(...))`
//! at every call site.

use super::{BinOp, CallTarget, CompareOp, Expr, Segment, Stmt, Type, UnOp};

pub fn u_const(value: u64, bits: u32) -> Expr {
    Expr::UConst(value, bits)
}

pub fn i_const(value: i64, bits: u32) -> Expr {
    Expr::Const(value, bits)
}

pub fn u8(value: u64) -> Expr {
    u_const(value, 8)
}

pub fn u16(value: u64) -> Expr {
    u_const(value, 16)
}

pub fn u32(value: u64) -> Expr {
    u_const(value, 32)
}

pub fn u64_(value: u64) -> Expr {
    u_const(value, 64)
}

pub fn i8(value: i64) -> Expr {
    i_const(value, 8)
}

pub fn i16(value: i64) -> Expr {
    i_const(value, 16)
}

pub fn i32(value: i64) -> Expr {
    i_const(value, 32)
}

pub fn i64_(value: i64) -> Expr {
    i_const(value, 64)
}

pub fn reg(name: impl Into<String>) -> Expr {
    Expr::Reg(name.into())
}

pub fn local(name: impl Into<String>) -> Expr {
    Expr::Local(name.into())
}

pub fn addr_of(e: Expr) -> Expr {
    Expr::AddrOf(Box::new(e))
}

pub fn load(addr: Expr, ty: Type, seg: Segment) -> Expr {
    Expr::Load(Box::new(addr), ty, seg)
}

macro_rules! binop_helper {
    ($name:ident, $op:expr) => {
        pub fn $name(lhs: Expr, rhs: Expr) -> Expr {
            Expr::BinOp($op, Box::new(lhs), Box::new(rhs))
        }
    };
}

binop_helper!(add, BinOp::Add);
binop_helper!(sub, BinOp::Sub);
binop_helper!(mul, BinOp::Mul);
binop_helper!(udiv, BinOp::UDiv);
binop_helper!(sdiv, BinOp::SDiv);
binop_helper!(urem, BinOp::URem);
binop_helper!(srem, BinOp::SRem);
binop_helper!(and, BinOp::And);
binop_helper!(or, BinOp::Or);
binop_helper!(xor, BinOp::Xor);
binop_helper!(shl, BinOp::Shl);
binop_helper!(shr, BinOp::Shr);
binop_helper!(sar, BinOp::Sar);

macro_rules! compare_helper {
    ($name:ident, $op:expr) => {
        pub fn $name(lhs: Expr, rhs: Expr) -> Expr {
            Expr::Compare($op, Box::new(lhs), Box::new(rhs))
        }
    };
}

compare_helper!(eq, CompareOp::Eq);
compare_helper!(ne, CompareOp::Ne);
compare_helper!(slt, CompareOp::Slt);
compare_helper!(sle, CompareOp::Sle);
compare_helper!(sgt, CompareOp::Sgt);
compare_helper!(sge, CompareOp::Sge);
compare_helper!(ult, CompareOp::Ult);
compare_helper!(ule, CompareOp::Ule);
compare_helper!(ugt, CompareOp::Ugt);
compare_helper!(uge, CompareOp::Uge);

pub fn neg(e: Expr) -> Expr {
    Expr::UnOp(UnOp::Neg, Box::new(e))
}

pub fn not(e: Expr) -> Expr {
    Expr::UnOp(UnOp::Not, Box::new(e))
}

pub fn lnot(e: Expr) -> Expr {
    Expr::UnOp(UnOp::LNot, Box::new(e))
}

pub fn ternary(cond: Expr, if_true: Expr, if_false: Expr) -> Expr {
    Expr::Ternary(Box::new(cond), Box::new(if_true), Box::new(if_false))
}

/// A direct call by symbol name, e.g. `call_named("memset", args)`.
pub fn call_named(name: impl Into<String>, args: Vec<Expr>) -> Expr {
    Expr::Call(CallTarget::Symbol(name.into()), args)
}

/// An indirect call through an address expression.
pub fn call_indirect(target: Expr, args: Vec<Expr>) -> Expr {
    Expr::Call(CallTarget::Indirect(Box::new(target)), args)
}

pub fn intrinsic(name: impl Into<String>, args: Vec<Expr>) -> Expr {
    Expr::Intrinsic(name.into(), args)
}

pub fn assign(lhs: Expr, rhs: Expr) -> Stmt {
    Stmt::Assign(Box::new(lhs), Box::new(rhs))
}

pub fn store(addr: Expr, value: Expr, ty: Type, seg: Segment) -> Stmt {
    Stmt::Store(Box::new(addr), Box::new(value), ty, seg)
}

pub fn call_stmt(call: Expr) -> Stmt {
    Stmt::CallStmt(Box::new(call))
}

pub fn memset_call(dst: Expr, value: Expr, size: Expr) -> Expr {
    call_named("memset", vec![dst, value, size])
}

pub fn memcpy_call(dst: Expr, src: Expr, size: Expr) -> Expr {
    call_named("memcpy", vec![dst, src, size])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helpers_build_expected_shapes() {
        assert_eq!(add(reg("p1"), u32(0)), Expr::BinOp(BinOp::Add, Box::new(reg("p1")), Box::new(u32(0))));
        assert_eq!(eq(reg("p1"), reg("p2")), Expr::Compare(CompareOp::Eq, Box::new(reg("p1")), Box::new(reg("p2"))));
        assert_eq!(lnot(reg("c")), Expr::UnOp(UnOp::LNot, Box::new(reg("c"))));
    }
}
