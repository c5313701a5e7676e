//! `push`/`pop`/`leave` (§4.D).
//!
//! Outside the prologue/epilogue (suppressed upstream in `builder::mod`),
//! these exist only to save/restore a callee-saved register around a call
//! and carry no meaning the pseudocode's register-name model can express
//! without inventing a stack-slot local with no source-level counterpart.
//! They're rendered as a labelled pseudo-statement instead of a guess.

use crate::decoder::RawInsn;
use crate::ir::*;

use super::super::address::operand_lvalue;
use super::super::BuildCtx;

pub(crate) fn translate(insn: &RawInsn, ctx: &mut BuildCtx) -> Vec<Stmt> {
    if insn.mnemonic == "leave" {
        return vec![Stmt::Pseudo("leave".to_string())];
    }
    let operand = operand_lvalue(insn, 0, &mut ctx.frame);
    vec![Stmt::Pseudo(format!("{} {operand:?}", insn.mnemonic))]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::decode_function;
    use crate::options::Options;
    use std::collections::HashMap;

    #[test]
    fn push_outside_prologue_is_a_pseudo_statement() {
        // push rbx
        let bytes = [0x53];
        let decoded = decode_function(&bytes, 0, None).unwrap();
        let labels = HashMap::new();
        let options = Options::default();
        let mut ctx = BuildCtx {
            scratch: crate::builder::Scratch::default(),
            frame: crate::builder::address::FrameState::default(),
            labels: &labels,
            options: &options,
        };
        let stmts = translate(&decoded.instructions[0], &mut ctx);
        assert!(matches!(&stmts[0], Stmt::Pseudo(s) if s.starts_with("push")));
    }
}
