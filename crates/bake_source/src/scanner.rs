//! Scanning of source text for quoted `#include` directives.

/// A quoted include found in a file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IncludeDirective {
    /// The name between the quotes, exactly as written.
    pub name: String,
    /// The 1-based line of the directive.
    pub line: u32,
}

/// Finds every `#include "..."` directive in `text`.
///
/// `#` and `include` may be separated by whitespace. Angle-bracket includes,
/// and directives whose quote is never closed, are ignored. Conditional
/// compilation is not evaluated: every directive counts.
pub fn scan_includes(text: &str) -> Vec<IncludeDirective> {
    text.lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let name = quoted_include(line)?;
            Some(IncludeDirective {
                name: name.to_string(),
                line: u32::try_from(index + 1).ok()?,
            })
        })
        .collect()
}

fn quoted_include(line: &str) -> Option<&str> {
    let rest = line.trim().strip_prefix('#')?;
    let rest = rest.trim_start().strip_prefix("include")?;
    let rest = rest.trim_start().strip_prefix('"')?;
    let end = rest.find('"')?;
    Some(&rest[..end])
}

/// Locates the quoted name on a directive line for underlining.
///
/// Returns the character index of the opening quote and the width of the
/// quoted text including both quotes.
pub fn locate_quoted(line: &str) -> Option<(usize, usize)> {
    let open = line.find('"')?;
    let after = &line[open + 1..];
    let close = after.find('"')?;
    let start = line[..open].chars().count();
    let width = after[..close].chars().count() + 2;
    Some((start, width))
}
