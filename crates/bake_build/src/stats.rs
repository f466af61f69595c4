//! The compilation statistics table.
//!
//! ```text
//! filename    ; $? ; E ; W ;     T
//! obj/main.o  ;  0 ; 0 ; 2 ; 1.204
//! app         ;  0 ; 0 ; 0 ; 0.090
//! ```

use std::path::Path;

use bake_compile::CompilationResult;

const SEPARATOR: &str = " ; ";

/// Formats `results` as the statistics table, slowest first.
///
/// Output paths are shown relative to `root` when they lie under it.
pub fn format_stats(root: &Path, results: &[CompilationResult]) -> String {
    let mut sorted: Vec<&CompilationResult> = results.iter().collect();
    sorted.sort_by(|a, b| b.elapsed.cmp(&a.elapsed));

    let header = ["filename", "$?", "E", "W", "T"].map(str::to_string);
    let mut rows = vec![header];
    rows.extend(sorted.into_iter().map(|r| {
        [
            display_output(root, &r.output),
            r.exit_code.to_string(),
            r.errors.to_string(),
            r.warnings.to_string(),
            format!("{:.3}", r.elapsed.as_secs_f64()),
        ]
    }));

    let mut widths = [0usize; 5];
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for row in &rows {
        let cells: Vec<String> = row
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(column, (cell, width))| {
                if column == 0 {
                    format!("{cell:<width$}")
                } else {
                    format!("{cell:>width$}")
                }
            })
            .collect();
        out.push_str(cells.join(SEPARATOR).trim_end());
        out.push('\n');
    }
    out
}

fn display_output(root: &Path, output: &Path) -> String {
    let relative = output.strip_prefix(root).unwrap_or(output);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
