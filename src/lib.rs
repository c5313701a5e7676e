//! Turns a flat buffer of x86-64 machine code into readable C-like
//! pseudocode (§1 OVERVIEW). The only entry point is [`to_pseudo_code`];
//! everything else in this crate exists to support it.
//!
//! The pipeline is five stages, each its own module:
//! decode ([`decoder`]) -> label analysis ([`analyzer`]) -> IR construction
//! ([`builder`]) -> rewrite passes ([`passes`]) -> pretty-printing
//! ([`printer`]). None of it performs I/O; callers hand it bytes and get a
//! `String` back, or a [`errors::DecompileError`] on hard failure.

pub mod collab;
pub mod errors;
pub mod ir;
pub mod options;

mod analyzer;
mod builder;
mod decoder;
mod passes;
mod printer;

use errors::DecompileError;
use options::Options;

/// Decompiles `bytes` (the bytes of a single function, loaded at
/// `options.base_address`) into C-like pseudocode.
///
/// Returns [`DecompileError`] only for the two conditions documented on
/// that type; every other irregularity (an unrecognized mnemonic, a
/// function with no `ret` in range) degrades to a best-effort rendering
/// rather than an error.
pub fn to_pseudo_code(bytes: &[u8], options: &Options) -> Result<String, DecompileError> {
    tracing::debug!(
        bytes = bytes.len(),
        base = %format_args!("0x{:X}", options.base_address),
        name = %options.function_name,
        "decompiling function"
    );

    let decoded = decoder::decode_function(bytes, options.base_address, options.max_bytes)?;
    let labels = analyzer::assign_labels(&decoded.instructions);
    let function = builder::build_function(&decoded, &labels, options)?;
    let function = passes::default_pipeline(function, options);
    function.validate_labels().map_err(DecompileError::invariant)?;

    Ok(printer::render(&function, options))
}
