//! Human-readable index dump used by the `stat` command.

use crate::index::Index;
use regex::Regex;

const NANOS_PER_SECOND: f64 = 1_000_000_000.0;

/// Render every line of the functions whose file matches `file_filter`
///
/// ```text
///   func main.(Server).handle (/src/server.go):
///     line   42:   0.12s flat   1.30s cum L=5 G=4
/// ```
pub fn render_index_lines(index: &Index, file_filter: Option<&Regex>) -> String {
    let mut out = String::new();
    let mut current_func: Option<String> = None;

    index.inspect(|record| {
        if let Some(filter) = file_filter {
            if !filter.is_match(record.func.file_name) {
                return;
            }
        }

        let func_name = record.func.key.to_string();
        if current_func.as_deref() != Some(func_name.as_str()) {
            out.push_str(&format!("  func {} ({}):\n", func_name, record.func.file_name));
            current_func = Some(func_name);
        }

        let stats = &record.stats;
        out.push_str(&format!(
            "    line {:4}: {:6.2}s flat {:6.2}s cum L={} G={}\n",
            stats.line,
            stats.flat_value as f64 / NANOS_PER_SECOND,
            stats.value as f64 / NANOS_PER_SECOND,
            stats.local_level,
            stats.global_level
        ));
    });

    out
}

/// One-line size summary, e.g. `index size approx: 0.01 MB (10240 bytes)`
pub fn format_memory_usage(bytes: usize) -> String {
    format!(
        "index size approx: {:.2} MB ({} bytes)",
        bytes as f64 / 1_000_000.0,
        bytes
    )
}
