//! Operator-precedence-correct expression rendering (§4.F). Every node
//! carries its own precedence tier; a child is parenthesized only when its
//! tier is looser than the slot it's being rendered into, so the printer
//! never emits redundant parens around a bare register or constant.

use crate::ir::*;
use crate::options::Options;

use super::types::{format_signed, format_unsigned, type_name};

const PREC_PRIMARY: u32 = 100;
const PREC_UNARY: u32 = 90;
const PREC_MUL: u32 = 80;
const PREC_ADD: u32 = 70;
const PREC_SHIFT: u32 = 60;
const PREC_RELATIONAL: u32 = 50;
const PREC_EQUALITY: u32 = 45;
const PREC_AND: u32 = 40;
const PREC_XOR: u32 = 35;
const PREC_OR: u32 = 30;
const PREC_TERNARY: u32 = 10;

fn binop_symbol(op: BinOp) -> (&'static str, u32) {
    use BinOp::*;
    match op {
        Add => ("+", PREC_ADD),
        Sub => ("-", PREC_ADD),
        Mul => ("*", PREC_MUL),
        UDiv | SDiv => ("/", PREC_MUL),
        URem | SRem => ("%", PREC_MUL),
        And => ("&", PREC_AND),
        Or => ("|", PREC_OR),
        Xor => ("^", PREC_XOR),
        Shl => ("<<", PREC_SHIFT),
        Shr | Sar => (">>", PREC_SHIFT),
    }
}

fn compare_symbol(op: CompareOp) -> (&'static str, u32) {
    use CompareOp::*;
    match op {
        Eq => ("==", PREC_EQUALITY),
        Ne => ("!=", PREC_EQUALITY),
        Slt | Ult => ("<", PREC_RELATIONAL),
        Sle | Ule => ("<=", PREC_RELATIONAL),
        Sgt | Ugt => (">", PREC_RELATIONAL),
        Sge | Uge => (">=", PREC_RELATIONAL),
    }
}

/// Renders `e` standalone (as a full statement operand, the loosest slot).
pub(crate) fn render(e: &Expr, options: &Options) -> String {
    render_into(e, 0, options)
}

fn parenthesize_if_needed(text: String, own_prec: u32, min_prec: u32) -> String {
    if own_prec < min_prec {
        format!("({text})")
    } else {
        text
    }
}

fn render_into(e: &Expr, min_prec: u32, options: &Options) -> String {
    let (text, prec) = render_node(e, options);
    parenthesize_if_needed(text, prec, min_prec)
}

fn render_node(e: &Expr, options: &Options) -> (String, u32) {
    match e {
        Expr::Const(v, _) => (format_signed(*v), PREC_PRIMARY),
        Expr::UConst(v, _) => (format_unsigned(*v), PREC_PRIMARY),
        Expr::SymConst(_, _, name) => (name.clone(), PREC_PRIMARY),
        Expr::Reg(name) => (name.clone(), PREC_PRIMARY),
        Expr::Param(name, _) => (name.clone(), PREC_PRIMARY),
        Expr::Local(name) => (name.clone(), PREC_PRIMARY),
        Expr::SegmentBase(seg) => (segment_base_name(*seg), PREC_PRIMARY),
        Expr::LabelRef(label) => (label.name.clone(), PREC_PRIMARY),
        Expr::AddrOf(inner) => (format!("&{}", render_into(inner, PREC_UNARY, options)), PREC_UNARY),
        Expr::Load(addr, ty, seg) => (render_load(addr, ty, *seg, options), PREC_UNARY),
        Expr::UnOp(op, inner) => (render_unop(*op, inner, options), PREC_UNARY),
        Expr::Cast(inner, ty, _) => (
            format!("({})({})", type_name(ty, options), render_into(inner, PREC_UNARY, options)),
            PREC_UNARY,
        ),
        Expr::BinOp(op, l, r) => {
            let (sym, prec) = binop_symbol(*op);
            (
                format!("{} {sym} {}", render_into(l, prec, options), render_into(r, prec + 1, options)),
                prec,
            )
        }
        Expr::Compare(op, l, r) => {
            let (sym, prec) = compare_symbol(*op);
            let text = format!("{} {sym} {}", render_into(l, prec, options), render_into(r, prec + 1, options));
            if options.comment_signedness_on_cmp {
                if let Some(signed) = op.signedness() {
                    return (format!("{text} /* {} */", if signed { "signed" } else { "unsigned" }), prec);
                }
            }
            (text, prec)
        }
        Expr::Ternary(c, t, f) => (
            format!(
                "{} ? {} : {}",
                render_into(c, PREC_TERNARY + 1, options),
                render_into(t, PREC_TERNARY + 1, options),
                render_into(f, PREC_TERNARY, options)
            ),
            PREC_TERNARY,
        ),
        Expr::Call(target, args) => (render_call(target, args, options), PREC_PRIMARY),
        Expr::Intrinsic(name, args) => (
            format!("{name}({})", args.iter().map(|a| render(a, options)).collect::<Vec<_>>().join(", ")),
            PREC_PRIMARY,
        ),
    }
}

fn render_unop(op: UnOp, inner: &Expr, options: &Options) -> String {
    let sym = match op {
        UnOp::Neg => "-",
        UnOp::Not => "~",
        UnOp::LNot => "!",
    };
    format!("{sym}{}", render_into(inner, PREC_UNARY, options))
}

fn render_load(addr: &Expr, ty: &Type, seg: Segment, options: &Options) -> String {
    format!("*({}*)({}{})", type_name(ty, options), segment_prefix(seg), render(addr, options))
}

fn segment_prefix(seg: Segment) -> &'static str {
    match seg {
        Segment::None => "",
        Segment::Fs => "fs:",
        Segment::Gs => "gs:",
    }
}

fn segment_base_name(seg: Segment) -> String {
    match seg {
        Segment::None => "null_base".to_string(),
        Segment::Fs => "fs_base".to_string(),
        Segment::Gs => "gs_base".to_string(),
    }
}

fn render_call(target: &CallTarget, args: &[Expr], options: &Options) -> String {
    let rendered_args = args.iter().map(|a| render(a, options)).collect::<Vec<_>>().join(", ");
    match target {
        CallTarget::Symbol(name) => format!("{name}({rendered_args})"),
        CallTarget::Indirect(inner) => format!("(*{})({rendered_args})", render_into(inner, PREC_UNARY, options)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mul_binds_tighter_than_add_so_no_parens_are_needed() {
        let e = add(reg("a"), mul(reg("b"), reg("c")));
        assert_eq!(render(&e, &Options::default()), "a + b * c");
    }

    #[test]
    fn add_inside_mul_needs_parens() {
        let e = mul(add(reg("a"), reg("b")), reg("c"));
        assert_eq!(render(&e, &Options::default()), "(a + b) * c");
    }

    #[test]
    fn ternary_is_lowest_precedence() {
        let e = ternary(eq(reg("a"), reg("b")), add(reg("c"), reg("d")), reg("e"));
        assert_eq!(render(&e, &Options::default()), "a == b ? c + d : e");
    }

    #[test]
    fn compare_signedness_comment_is_opt_in() {
        let mut options = Options::default();
        options.comment_signedness_on_cmp = true;
        let e = slt(reg("a"), reg("b"));
        assert_eq!(render(&e, &options), "a < b /* signed */");
    }
}
