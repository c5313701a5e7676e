//! The entire configuration surface of the core (§6). There is no on-disk
//! config file — the core performs no I/O — so `Options` doubles as both the
//! API surface and the "config" in the ambient sense.

use std::sync::Arc;

use crate::collab::{
    ntstatus_full_name, ConstantNameProvider, ImportNameResolver, NoopConstantProvider,
    NoopImportResolver,
};

/// Knobs for [`crate::to_pseudo_code`], covering both decoding/IR-building
/// behavior and pretty-printer formatting. Kept as a single flat struct of
/// knobs rather than split across multiple parameters, matching this
/// lineage's single `Opts` struct in its CLI binary.
#[derive(Clone)]
pub struct Options {
    /// Virtual address of the first byte of `bytes`.
    pub base_address: u64,
    /// Name emitted in the pretty-printed signature.
    pub function_name: String,
    /// Emit `Lk:` labels and refer to them in branches; otherwise print raw
    /// target addresses.
    pub emit_labels: bool,
    /// Suppress semantic emission for recognized prologue/epilogue
    /// instructions (the assembly comment still appears).
    pub detect_prologue: bool,
    /// Emit `__pseudo(compare L, R)` / `__pseudo(test L, R)` lines.
    pub comment_compare: bool,
    /// Cap on bytes fed to the decoder.
    pub max_bytes: Option<usize>,
    /// Resolves indirect call targets to import names.
    pub resolve_import_name: Arc<dyn ImportNameResolver>,
    /// Resolves raw constants to enum member names.
    pub constant_provider: Arc<dyn ConstantNameProvider>,
    /// Enum used by the return-constant passes.
    pub return_enum_type_full_name: String,

    // --- pretty-printer knobs (§4.F) ---
    pub emit_header_comment: bool,
    pub emit_block_labels: bool,
    pub comment_signedness_on_cmp: bool,
    pub use_std_int_names: bool,
    pub indent: String,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            base_address: 0,
            function_name: "sub".to_string(),
            emit_labels: true,
            detect_prologue: true,
            comment_compare: false,
            max_bytes: None,
            resolve_import_name: Arc::new(NoopImportResolver),
            constant_provider: Arc::new(NoopConstantProvider),
            return_enum_type_full_name: ntstatus_full_name(),
            emit_header_comment: true,
            emit_block_labels: true,
            comment_signedness_on_cmp: false,
            use_std_int_names: true,
            indent: "    ".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_use_ntstatus_and_noop_collaborators() {
        let opts = Options::default();
        assert_eq!(opts.return_enum_type_full_name, ntstatus_full_name());
        assert_eq!(opts.resolve_import_name.resolve(0x1000), None);
        assert_eq!(
            opts.constant_provider
                .try_format_value(&ntstatus_full_name(), 0),
            None
        );
    }
}
