//! The instruction-family fallback (§4.D, §7): any mnemonic none of the
//! other translators claim becomes a labelled `Pseudo` statement rather
//! than a hard error, matching `DecompileError`'s documented recovery
//! policy for unrecognized instructions.

use crate::ir::Stmt;

pub(crate) fn translate_fallback(mnemonic: &str) -> Vec<Stmt> {
    vec![Stmt::Pseudo(mnemonic.to_string())]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrecognized_mnemonic_becomes_pseudo() {
        assert_eq!(translate_fallback("cpuid"), vec![Stmt::Pseudo("cpuid".to_string())]);
    }
}
