//! The typed intermediate representation (§3, §4.A).
//!
//! Every node here is a plain, structurally-equal value type. Rewrite passes
//! (`crate::passes`) never mutate a node in place; they build a new one and
//! let the caller replace the old reference, the same way `cicasm`'s AST
//! (`ast.rs`) is a plain recursive `enum` consumed by read-only passes.

mod builders;

pub use builders::*;

/// A type in the pseudocode's tiny type system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Void,
    Int { bits: u32, signed: bool },
    Float { bits: u32 },
    Pointer(Box<Type>),
    Vector { bits: u32 },
    Unknown { note: Option<String> },
}

impl Type {
    pub fn u(bits: u32) -> Type {
        Type::Int { bits, signed: false }
    }

    pub fn i(bits: u32) -> Type {
        Type::Int { bits, signed: true }
    }

    pub fn pointer(elem: Type) -> Type {
        Type::Pointer(Box::new(elem))
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Type::Int { .. })
    }

    /// Bit width of this type, where that concept applies (`Void` and
    /// `Unknown` report 64, matching the printer's fallback rendering).
    pub fn bits(&self) -> u32 {
        match self {
            Type::Void => 0,
            Type::Int { bits, .. } => *bits,
            Type::Float { bits } => *bits,
            Type::Pointer(_) => 64,
            Type::Vector { bits } => *bits,
            Type::Unknown { .. } => 64,
        }
    }
}

/// Binary operators (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    UDiv,
    SDiv,
    URem,
    SRem,
    And,
    Or,
    Xor,
    Shl,
    Shr,
    Sar,
}

/// Unary operators (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg,
    Not,
    LNot,
}

/// Ordered comparison operators (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Slt,
    Sle,
    Sgt,
    Sge,
    Ult,
    Ule,
    Ugt,
    Uge,
}

impl CompareOp {
    /// The operator that negates this one under boolean complement
    /// (`LNot(Compare(op, ...)) -> Compare(invert(op), ...)`, §4.E pass 9).
    pub fn invert(self) -> CompareOp {
        use CompareOp::*;
        match self {
            Eq => Ne,
            Ne => Eq,
            Slt => Sge,
            Sge => Slt,
            Sle => Sgt,
            Sgt => Sle,
            Ult => Uge,
            Uge => Ult,
            Ule => Ugt,
            Ugt => Ule,
        }
    }

    /// Whether this is a signed-ordered comparison (used by the printer's
    /// `/* signed */`/`/* unsigned */` annotation).
    pub fn signedness(self) -> Option<bool> {
        use CompareOp::*;
        match self {
            Eq | Ne => None,
            Slt | Sle | Sgt | Sge => Some(true),
            Ult | Ule | Ugt | Uge => Some(false),
        }
    }
}

/// Cast kinds (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastKind {
    ZeroExtend,
    SignExtend,
    Trunc,
    Bitcast,
    Reinterpret,
}

/// x86 segment override, relevant only for `FS`/`GS` (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    None,
    Fs,
    Gs,
}

/// A referentially-identified jump target (§3). Two `Label`s are equal iff
/// their `id`s match; `name` is display-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub name: String,
    pub id: u32,
}

impl Label {
    pub fn new(id: u32) -> Label {
        Label {
            name: format!("L{id}"),
            id,
        }
    }
}

/// A call target: either a known symbol name, or an address to call through.
#[derive(Debug, Clone, PartialEq)]
pub enum CallTarget {
    Symbol(String),
    Indirect(Box<Expr>),
}

/// An immutable expression node (§3).
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Const(i64, u32),
    UConst(u64, u32),
    SymConst(u64, u32, String),
    Reg(String),
    Param(String, u32),
    Local(String),
    SegmentBase(Segment),
    AddrOf(Box<Expr>),
    Load(Box<Expr>, Type, Segment),
    BinOp(BinOp, Box<Expr>, Box<Expr>),
    UnOp(UnOp, Box<Expr>),
    Compare(CompareOp, Box<Expr>, Box<Expr>),
    Ternary(Box<Expr>, Box<Expr>, Box<Expr>),
    Cast(Box<Expr>, Type, CastKind),
    Call(CallTarget, Vec<Expr>),
    Intrinsic(String, Vec<Expr>),
    LabelRef(Label),
}

impl Expr {
    /// Whether evaluating this expression could have an observable side
    /// effect. Used by pass 8 (`SimplifyBooleanTernary`): a `Ternary` whose
    /// condition is not side-effect-free is never folded even when both
    /// arms are equal. Per the decided Open Question (DESIGN.md), `Load` is
    /// treated as side-effecting (the conservative reading), not just `Call`.
    pub fn has_side_effect(&self) -> bool {
        match self {
            Expr::Call(..) | Expr::Load(..) => true,
            Expr::Const(..)
            | Expr::UConst(..)
            | Expr::SymConst(..)
            | Expr::Reg(..)
            | Expr::Param(..)
            | Expr::Local(..)
            | Expr::SegmentBase(..)
            | Expr::LabelRef(..) => false,
            Expr::AddrOf(e) => e.has_side_effect(),
            Expr::BinOp(_, l, r) => l.has_side_effect() || r.has_side_effect(),
            Expr::UnOp(_, e) => e.has_side_effect(),
            Expr::Compare(_, l, r) => l.has_side_effect() || r.has_side_effect(),
            Expr::Ternary(c, t, f) => {
                c.has_side_effect() || t.has_side_effect() || f.has_side_effect()
            }
            Expr::Cast(e, _, _) => e.has_side_effect(),
            Expr::Intrinsic(_, args) => args.iter().any(Expr::has_side_effect),
        }
    }

    /// Best-effort operand width for a constant-folded result: the wider of
    /// the two input widths, defaulting to 32 when neither is known (§3
    /// invariants).
    pub fn fold_width(a: u32, b: u32) -> u32 {
        if a == 0 && b == 0 {
            32
        } else {
            a.max(b)
        }
    }
}

/// A statement in the function's single linear block (§3).
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Assign(Box<Expr>, Box<Expr>),
    Store(Box<Expr>, Box<Expr>, Type, Segment),
    CallStmt(Box<Expr>),
    IfGoto(Box<Expr>, Label),
    Goto(Label),
    Label(Label),
    Return(Option<Box<Expr>>),
    Asm(String),
    Pseudo(String),
    Comment(String),
    Nop,
}

/// A function parameter, `{name, type, index}` (§3).
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub ty: Type,
    pub index: u32,
}

/// A local variable, `{name, type, initializer?}` (§3).
#[derive(Debug, Clone, PartialEq)]
pub struct LocalVar {
    pub name: String,
    pub ty: Type,
    pub initializer: Option<Expr>,
}

/// The linear-IR invariant: a function body is exactly one `BasicBlock`
/// whose statements may themselves contain `Label`/`Goto`/`IfGoto` (§3).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BasicBlock {
    pub statements: Vec<Stmt>,
}

impl BasicBlock {
    pub fn new() -> BasicBlock {
        BasicBlock::default()
    }

    pub fn push(&mut self, stmt: Stmt) {
        self.statements.push(stmt);
    }
}

/// A placeholder for the structured (`if`/`while`/`for`) tree the
/// pretty-printer can render; the core never constructs one (§1, §4.F).
#[derive(Debug, Clone, PartialEq)]
pub enum StructuredNode {
    Block(Vec<StructuredNode>),
    Stmt(Stmt),
    If {
        cond: Expr,
        then_branch: Vec<StructuredNode>,
        else_branch: Vec<StructuredNode>,
    },
    While {
        cond: Expr,
        body: Vec<StructuredNode>,
    },
    DoWhile {
        body: Vec<StructuredNode>,
        cond: Expr,
    },
    For {
        init: Option<Box<StructuredNode>>,
        cond: Option<Expr>,
        step: Option<Box<StructuredNode>>,
        body: Vec<StructuredNode>,
    },
    Switch {
        scrutinee: Expr,
        cases: Vec<(Option<i64>, Vec<StructuredNode>)>,
    },
}

/// The complete decompiled function (§3).
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionIR {
    pub name: String,
    pub image_base: u64,
    pub entry_address: u64,
    pub return_type: Type,
    pub parameters: Vec<Parameter>,
    pub locals: Vec<LocalVar>,
    pub blocks: Vec<BasicBlock>,
    pub tags: std::collections::BTreeMap<String, String>,
    pub structured_body: Option<Vec<StructuredNode>>,
}

impl FunctionIR {
    pub fn new(name: impl Into<String>, image_base: u64, entry_address: u64) -> FunctionIR {
        FunctionIR {
            name: name.into(),
            image_base,
            entry_address,
            return_type: Type::u(64),
            parameters: Self::stable_integer_parameters(),
            locals: Vec::new(),
            blocks: vec![BasicBlock::new()],
            tags: std::collections::BTreeMap::new(),
            structured_body: None,
        }
    }

    /// The four stable `p1..p4` parameter slots every function is seeded
    /// with, corresponding to the MS x64 integer argument registers
    /// (RCX, RDX, R8, R9). These names never get renamed by later passes;
    /// callers that know a function takes fewer arguments trim the unused
    /// trailing ones themselves.
    fn stable_integer_parameters() -> Vec<Parameter> {
        (0..4u32)
            .map(|i| Parameter {
                name: format!("p{}", i + 1),
                ty: Type::u(64),
                index: i,
            })
            .collect()
    }

    /// The single linear block, mutably. Panics only if `blocks` was
    /// illegally emptied, which no code path in this crate does.
    pub fn block_mut(&mut self) -> &mut BasicBlock {
        self.blocks
            .first_mut()
            .expect("FunctionIR::blocks always has exactly one block")
    }

    pub fn block(&self) -> &BasicBlock {
        self.blocks
            .first()
            .expect("FunctionIR::blocks always has exactly one block")
    }

    pub fn find_local(&self, name: &str) -> Option<&LocalVar> {
        self.locals.iter().find(|l| l.name == name)
    }

    /// Checks the §3 label-resolution invariant: every `Goto`/`IfGoto`
    /// target and `LabelRef` resolves to a `Label` statement in this
    /// function. Used by the builder/pass pipeline boundary to fail fast
    /// (`DecompileError::InvariantViolation`) rather than hand the printer a
    /// malformed tree.
    pub fn validate_labels(&self) -> Result<(), String> {
        use std::collections::HashSet;

        let mut defined: HashSet<u32> = HashSet::new();
        for stmt in &self.block().statements {
            if let Stmt::Label(l) = stmt {
                defined.insert(l.id);
            }
        }

        fn check_expr(e: &Expr, defined: &HashSet<u32>) -> Result<(), String> {
            match e {
                Expr::LabelRef(l) if !defined.contains(&l.id) => {
                    Err(format!("LabelRef to undefined label {}", l.name))
                }
                Expr::AddrOf(x) | Expr::UnOp(_, x) | Expr::Cast(x, _, _) => check_expr(x, defined),
                Expr::Load(a, _, _) => check_expr(a, defined),
                Expr::BinOp(_, l, r) | Expr::Compare(_, l, r) => {
                    check_expr(l, defined)?;
                    check_expr(r, defined)
                }
                Expr::Ternary(c, t, f) => {
                    check_expr(c, defined)?;
                    check_expr(t, defined)?;
                    check_expr(f, defined)
                }
                Expr::Call(target, args) => {
                    if let CallTarget::Indirect(inner) = target {
                        check_expr(inner, defined)?;
                    }
                    for a in args {
                        check_expr(a, defined)?;
                    }
                    Ok(())
                }
                Expr::Intrinsic(_, args) => {
                    for a in args {
                        check_expr(a, defined)?;
                    }
                    Ok(())
                }
                _ => Ok(()),
            }
        }

        for stmt in &self.block().statements {
            match stmt {
                Stmt::Goto(l) | Stmt::IfGoto(_, l) if !defined.contains(&l.id) => {
                    return Err(format!("branch to undefined label {}", l.name));
                }
                Stmt::IfGoto(cond, _) => check_expr(cond, &defined)?,
                Stmt::Assign(lhs, rhs) => {
                    check_expr(lhs, &defined)?;
                    check_expr(rhs, &defined)?;
                }
                Stmt::Store(addr, val, _, _) => {
                    check_expr(addr, &defined)?;
                    check_expr(val, &defined)?;
                }
                Stmt::CallStmt(call) => check_expr(call, &defined)?,
                Stmt::Return(Some(v)) => check_expr(v, &defined)?,
                _ => {}
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compare_invert_round_trips() {
        use CompareOp::*;
        for op in [Eq, Ne, Slt, Sle, Sgt, Sge, Ult, Ule, Ugt, Uge] {
            assert_eq!(op.invert().invert(), op);
        }
    }

    #[test]
    fn label_equality_is_by_id_not_name() {
        let a = Label {
            name: "anything".into(),
            id: 3,
        };
        let b = Label::new(3);
        assert_eq!(a.id, b.id);
        assert_ne!(a.name, b.name);
    }

    #[test]
    fn validate_labels_catches_dangling_goto() {
        let mut f = FunctionIR::new("f", 0, 0);
        f.block_mut().push(Stmt::Goto(Label::new(1)));
        assert!(f.validate_labels().is_err());
    }

    #[test]
    fn validate_labels_accepts_resolved_goto() {
        let mut f = FunctionIR::new("f", 0, 0);
        f.block_mut().push(Stmt::Goto(Label::new(1)));
        f.block_mut().push(Stmt::Label(Label::new(1)));
        assert!(f.validate_labels().is_ok());
    }

    #[test]
    fn call_has_side_effect_but_plain_values_do_not() {
        let call = Expr::Call(CallTarget::Symbol("f".into()), vec![]);
        assert!(call.has_side_effect());
        assert!(!Expr::Reg("p1".into()).has_side_effect());
    }
}
