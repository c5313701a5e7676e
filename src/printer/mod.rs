//! The C-like pretty-printer (§4.F): renders a `FunctionIR` to a single
//! `String`. Runs over the flat statement list directly — there is no
//! structured-control-flow reconstruction here (`StructuredNode` exists for
//! a future front end, not this core; see SPEC_FULL Non-goals).

mod expr;
mod types;

use crate::ir::*;
use crate::options::Options;

use types::type_name;

pub(crate) fn render(function: &FunctionIR, options: &Options) -> String {
    let mut out = String::new();

    if options.emit_header_comment {
        out.push_str(
            "// Decompiled output: approximate C reconstruction, not guaranteed exact.\n\
             // Calling convention: Microsoft x64 (RCX, RDX, R8, R9 integer args; XMM0-3 float args).\n\
             // Parameter aliases: p1=rcx, p2=rdx, p3=r8, p4=r9; return value aliases rax as `ret`.\n\
             // Volatile registers may be clobbered by any call; do not rely on their values across calls.\n",
        );
    }

    out.push_str(&render_signature(function, options));
    out.push_str(" {\n");

    if let Some(frame_comment) = render_frame_comment(function) {
        out.push_str(&options.indent);
        out.push_str(&frame_comment);
        out.push('\n');
    }

    for local in &function.locals {
        out.push_str(&options.indent);
        out.push_str(&format!("{} {};\n", type_name(&local.ty, options), local.name));
        if let Some(init) = &local.initializer {
            out.push_str(&options.indent);
            out.push_str(&format!("{} = {};\n", local.name, expr::render(init, options)));
        }
    }
    if !function.locals.is_empty() {
        out.push('\n');
    }

    for stmt in &function.block().statements {
        render_stmt(stmt, options, &mut out);
    }

    out.push_str("}\n");
    out
}

/// Builds the frame-size comment derived from the decoder's tags (§4.F step
/// 3): an `rbp`-based frame reports its local-variable size, a leaf frame's
/// own `sub rsp, N` reports its raw stack allocation, and a function with
/// neither gets no comment at all.
fn render_frame_comment(function: &FunctionIR) -> Option<String> {
    let local_size = function.tags.get("local_size")?;
    let bytes = u64::from_str_radix(local_size.trim_start_matches("0x"), 16).ok()?;
    if function.tags.get("uses_frame_pointer").map(String::as_str) == Some("true") {
        Some(format!("// stack frame: {bytes} bytes of locals (rbp-based)"))
    } else {
        Some(format!("// stack allocation: sub rsp, {bytes} (no rbp)"))
    }
}

fn render_signature(function: &FunctionIR, options: &Options) -> String {
    let params = function
        .parameters
        .iter()
        .map(|p| format!("{} {}", type_name(&p.ty, options), p.name))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{} {}({params})", type_name(&function.return_type, options), function.name)
}

fn render_stmt(stmt: &Stmt, options: &Options, out: &mut String) {
    match stmt {
        Stmt::Label(label) => {
            if options.emit_block_labels {
                out.push_str(&format!("{}:\n", label.name));
            }
        }
        Stmt::Asm(text) => {
            out.push_str(&options.indent);
            out.push_str(&format!("// {text}\n"));
        }
        Stmt::Assign(lhs, rhs) => {
            out.push_str(&options.indent);
            if matches!(rhs.as_ref(), Expr::Call(..)) {
                let trailer = if matches!(lhs.as_ref(), Expr::Reg(name) if name == "ret") { " // RAX" } else { "" };
                out.push_str(&format!(
                    "/* call */ {} = {};{trailer}\n",
                    expr::render(lhs, options),
                    expr::render(rhs, options)
                ));
            } else {
                out.push_str(&format!("{} = {};\n", expr::render(lhs, options), expr::render(rhs, options)));
            }
        }
        Stmt::Store(addr, value, ty, seg) => {
            out.push_str(&options.indent);
            let prefix = match seg {
                Segment::None => "",
                Segment::Fs => "fs:",
                Segment::Gs => "gs:",
            };
            let target = format!("*({}*)({prefix}{})", type_name(ty, options), expr::render(addr, options));
            out.push_str(&format!("{target} = {};\n", expr::render(value, options)));
        }
        Stmt::CallStmt(call) => {
            out.push_str(&options.indent);
            out.push_str(&format!("{};\n", expr::render(call, options)));
        }
        Stmt::IfGoto(cond, label) => {
            out.push_str(&options.indent);
            let target = if options.emit_labels { label.name.clone() } else { format!("0x{:X}", label.id) };
            out.push_str(&format!("if ({}) goto {target};\n", expr::render(cond, options)));
        }
        Stmt::Goto(label) => {
            out.push_str(&options.indent);
            let target = if options.emit_labels { label.name.clone() } else { format!("0x{:X}", label.id) };
            out.push_str(&format!("goto {target};\n"));
        }
        Stmt::Return(value) => {
            out.push_str(&options.indent);
            match value {
                Some(v) => out.push_str(&format!("return {};\n", expr::render(v, options))),
                None => out.push_str("return;\n"),
            }
        }
        Stmt::Pseudo(text) => {
            out.push_str(&options.indent);
            out.push_str(&format!("__pseudo({text});\n"));
        }
        Stmt::Comment(text) => {
            out.push_str(&options.indent);
            out.push_str(&format!("// {text}\n"));
        }
        Stmt::Nop => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_a_trivial_function_signature_and_return() {
        let mut function = FunctionIR::new("target_fn", 0x1400_0000_0, 0x10);
        function.block_mut().push(Stmt::Return(Some(Box::new(u_const(0, 32)))));
        let options = Options {
            emit_header_comment: false,
            ..Options::default()
        };
        let text = render(&function, &options);
        assert!(text.starts_with("uint64_t target_fn(uint64_t p1, uint64_t p2, uint64_t p3, uint64_t p4) {\n"));
        assert!(text.contains("return 0;\n"));
        assert!(text.ends_with("}\n"));
    }

    #[test]
    fn header_comment_is_the_fixed_four_line_calling_convention_note() {
        let function = FunctionIR::new("f", 0, 0);
        let options = Options::default();
        let text = render(&function, &options);
        assert_eq!(text.lines().take(4).count(), 4);
        assert!(text.contains("Microsoft x64"));
        assert!(text.contains("p1=rcx, p2=rdx, p3=r8, p4=r9"));
    }

    #[test]
    fn rbp_based_frame_with_locals_prints_a_stack_frame_comment() {
        let mut function = FunctionIR::new("f", 0, 0);
        function.tags.insert("uses_frame_pointer".to_string(), "true".to_string());
        function.tags.insert("local_size".to_string(), "0x20".to_string());
        let options = Options {
            emit_header_comment: false,
            ..Options::default()
        };
        let text = render(&function, &options);
        assert!(text.contains("// stack frame: 32 bytes of locals (rbp-based)\n"));
    }

    #[test]
    fn leaf_frame_allocation_prints_a_sub_rsp_comment() {
        let mut function = FunctionIR::new("f", 0, 0);
        function.tags.insert("local_size".to_string(), "0x28".to_string());
        let options = Options {
            emit_header_comment: false,
            ..Options::default()
        };
        let text = render(&function, &options);
        assert!(text.contains("// stack allocation: sub rsp, 40 (no rbp)\n"));
    }

    #[test]
    fn labels_and_gotos_render_by_name() {
        let mut function = FunctionIR::new("f", 0, 0);
        let label = Label::new(1);
        function.block_mut().push(Stmt::Goto(label.clone()));
        function.block_mut().push(Stmt::Label(label));
        let options = Options {
            emit_header_comment: false,
            ..Options::default()
        };
        let text = render(&function, &options);
        assert!(text.contains("goto L1;\n"));
        assert!(text.contains("L1:\n"));
    }
}
