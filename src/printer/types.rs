//! Type and constant rendering (§4.F): the `use_std_int_names` switch and
//! the printer's decimal-vs-hex rule for integer literals.

use crate::ir::Type;
use crate::options::Options;

pub(crate) fn type_name(ty: &Type, options: &Options) -> String {
    match ty {
        Type::Void => "void".to_string(),
        Type::Int { bits, signed } => int_name(*bits, *signed, options),
        Type::Float { bits: 32 } => "float".to_string(),
        Type::Float { bits: 64 } => "double".to_string(),
        Type::Float { bits } => format!("float{bits}_t"),
        Type::Pointer(inner) => format!("{}*", type_name(inner, options)),
        Type::Vector { bits } => format!("__m{bits}"),
        Type::Unknown { note: Some(note) } => format!("/* unknown: {note} */ void*"),
        Type::Unknown { note: None } => "void*".to_string(),
    }
}

fn int_name(bits: u32, signed: bool, options: &Options) -> String {
    if options.use_std_int_names {
        let width = match bits {
            0 | 8 => 8,
            16 => 16,
            32 => 32,
            _ => 64,
        };
        format!("{}int{width}_t", if signed { "" } else { "u" })
    } else {
        match (bits, signed) {
            (8, true) => "signed char".to_string(),
            (8, false) => "unsigned char".to_string(),
            (16, true) => "short".to_string(),
            (16, false) => "unsigned short".to_string(),
            (32, true) => "int".to_string(),
            (32, false) => "unsigned int".to_string(),
            (_, true) => "long long".to_string(),
            (_, false) => "unsigned long long".to_string(),
        }
    }
}

/// Small magnitudes print in decimal; everything else (including every
/// negative value) prints in hex, matching what a reader scanning a
/// decompiler's output expects for addresses/flags/masks.
pub(crate) fn format_unsigned(value: u64) -> String {
    if value < 10 {
        value.to_string()
    } else {
        format!("0x{value:X}")
    }
}

pub(crate) fn format_signed(value: i64) -> String {
    if (0..10).contains(&value) {
        value.to_string()
    } else if value < 0 {
        format!("-0x{:X}", value.unsigned_abs())
    } else {
        format!("0x{value:X}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn std_int_names_match_width() {
        let options = Options::default();
        assert_eq!(type_name(&Type::u(32), &options), "uint32_t");
        assert_eq!(type_name(&Type::i(8), &options), "int8_t");
    }

    #[test]
    fn small_values_print_decimal_large_values_print_hex() {
        assert_eq!(format_unsigned(4), "4");
        assert_eq!(format_unsigned(0x1000), "0x1000");
        assert_eq!(format_signed(-1), "-0x1");
    }
}
