//! Frame labels and module identity.
//!
//! A frame label is `module!symbol` once symbols are resolved. When they are
//! not, the address stands in for the symbol (`module!0x1f20`) and `?` for
//! the module (`?!0x7ffe1f20`), so every frame has a label.

use crate::utils::config::{KERNEL_MODULE_NAMES, KERNEL_MODULE_SUFFIX, UNKNOWN_MODULE};

/// Build the canonical label of a frame
///
/// **Public** - used when decoding resolved frames from sample files
///
/// # Arguments
/// * `module` - Module name, if known
/// * `symbol` - Function name, if resolved
/// * `address` - Code address of the frame
pub fn frame_label(module: Option<&str>, symbol: Option<&str>, address: u64) -> String {
    let module = module.unwrap_or(UNKNOWN_MODULE);
    match symbol {
        Some(symbol) => format!("{}!{}", module, symbol),
        None => format!("{}!0x{:x}", module, address),
    }
}

/// Module part of a label (everything before the first `!`)
///
/// Labels without a `!` are their own module.
pub fn module_of(label: &str) -> &str {
    label.split_once('!').map_or(label, |(module, _)| module)
}

/// True for kernel drivers (`*.sys`) and the core kernel modules
///
/// **Public** - default exclusion predicate of the folded export
pub fn is_kernel_module(module: &str) -> bool {
    let suffix_len = KERNEL_MODULE_SUFFIX.len();
    let is_driver = module.len() >= suffix_len
        && module.is_char_boundary(module.len() - suffix_len)
        && module[module.len() - suffix_len..].eq_ignore_ascii_case(KERNEL_MODULE_SUFFIX);

    is_driver
        || KERNEL_MODULE_NAMES
            .iter()
            .any(|name| module.eq_ignore_ascii_case(name))
}

/// Exclusion predicate that keeps every frame
pub fn keep_all(_module: &str) -> bool {
    false
}
