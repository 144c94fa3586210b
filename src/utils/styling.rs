//! Terminal styling utilities for warnings and report values

use console::{style, Emoji};

pub static WARNING: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");

/// Print a warning message to stderr
pub fn print_warning(message: &str) {
    eprintln!(
        "    {}{} {}",
        WARNING,
        style("Warning:").yellow().bold(),
        style(message).yellow()
    );
}

/// Format a WoE or IV value for display, spelling out infinities
pub fn format_value(value: f64, precision: usize) -> String {
    if value == f64::INFINITY {
        "+inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-inf".to_string()
    } else if value.is_nan() {
        "NaN".to_string()
    } else {
        format!("{:.*}", precision, value)
    }
}
