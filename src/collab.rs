//! External collaborator interfaces (§4.G).
//!
//! The core never resolves import names or enum constants itself — it asks
//! a collaborator. Production callers plug in a PE-aware resolver and a
//! constant-name database; tests plug in the `Mock*` implementations below,
//! mirroring the `FileReader`/`AsmFileReader`/`MockFileReader` split this
//! crate's build pipeline uses for reading source files.

use std::collections::HashMap;

/// Resolves the absolute address of an indirect call to a symbolic import
/// name (e.g. `"kernelbase!CreateFileW"`), if known.
pub trait ImportNameResolver: Send + Sync {
    fn resolve(&self, absolute_address: u64) -> Option<String>;
}

/// Formats a raw integer value as a named constant of some enum, if the
/// constant-name database recognizes it (e.g. NTSTATUS codes).
pub trait ConstantNameProvider: Send + Sync {
    fn try_format_value(&self, enum_full_name: &str, value: u64) -> Option<String>;
}

/// A resolver that never resolves anything. The default for [`crate::Options`].
pub struct NoopImportResolver;

impl ImportNameResolver for NoopImportResolver {
    fn resolve(&self, _absolute_address: u64) -> Option<String> {
        None
    }
}

/// A constant provider that never recognizes anything. The default for
/// [`crate::Options`].
pub struct NoopConstantProvider;

impl ConstantNameProvider for NoopConstantProvider {
    fn try_format_value(&self, _enum_full_name: &str, _value: u64) -> Option<String> {
        None
    }
}

/// A resolver backed by a fixed address -> name table, for tests.
#[derive(Default)]
pub struct MockImportResolver {
    names: HashMap<u64, String>,
}

impl MockImportResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, absolute_address: u64, name: impl Into<String>) -> &mut Self {
        self.names.insert(absolute_address, name.into());
        self
    }
}

impl ImportNameResolver for MockImportResolver {
    fn resolve(&self, absolute_address: u64) -> Option<String> {
        self.names.get(&absolute_address).cloned()
    }
}

/// A constant provider backed by a fixed `(enum_full_name, value) -> name`
/// table, for tests.
#[derive(Default)]
pub struct MockConstantProvider {
    values: HashMap<(String, u64), String>,
}

impl MockConstantProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, enum_full_name: impl Into<String>, value: u64, name: impl Into<String>) -> &mut Self {
        self.values.insert((enum_full_name.into(), value), name.into());
        self
    }
}

impl ConstantNameProvider for MockConstantProvider {
    fn try_format_value(&self, enum_full_name: &str, value: u64) -> Option<String> {
        self.values.get(&(enum_full_name.to_string(), value)).cloned()
    }
}

/// The default `return_enum_type_full_name`: the Windows NTSTATUS enum.
pub fn ntstatus_full_name() -> String {
    "Windows.Win32.Foundation.NTSTATUS".to_string()
}
