//! Host platform facts used by conditional compiler flags.

/// Returns the boolean flags describing the host platform.
///
/// `WIN` is set on Windows. The pointer width in bits is published as a flag
/// named by its decimal value (`"64"` on 64-bit hosts), so a conditional
/// element such as `@!WIN&64: -m64` can test it.
pub fn host_flags() -> Vec<(String, bool)> {
    vec![
        ("WIN".to_string(), cfg!(windows)),
        (usize::BITS.to_string(), true),
    ]
}

/// Returns the on-disk name of the linked program.
///
/// On Windows `.exe` is appended unless the configured name already has it.
pub fn program_filename(name: &str, windows: bool) -> String {
    if windows && !name.ends_with(".exe") {
        format!("{name}.exe")
    } else {
        name.to_string()
    }
}
