//! Terminal rendering of command results.

use serde::Serialize;

// ANSI color codes
pub const GREEN: &str = "\x1b[32m";
pub const RED: &str = "\x1b[31m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";
pub const RESET: &str = "\x1b[0m";

/// Render rows as a left-aligned table with a bold header.
pub fn render_table<const N: usize>(headers: [&str; N], rows: &[[&str; N]]) -> String {
    let mut widths = headers.map(|h| h.chars().count());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    out.push_str(BOLD);
    out.push_str(&format_row(&headers, &widths));
    out.push_str(RESET);
    out.push('\n');

    let rule: usize = widths.iter().sum::<usize>() + 2 * N.saturating_sub(1);
    out.push_str(&format!("{DIM}{}{RESET}\n", "━".repeat(rule)));

    for row in rows {
        out.push_str(&format_row(row, &widths));
        out.push('\n');
    }
    out
}

fn format_row(cells: &[&str], widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    padded.join("  ").trim_end().to_string()
}

pub fn print_table<const N: usize>(headers: [&str; N], rows: &[[&str; N]]) {
    print!("{}", render_table(headers, rows));
    println!("{DIM}{} device(s){RESET}", rows.len());
}

pub fn print_list(items: &[String]) {
    for item in items {
        println!("{item}");
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Pretty-print a raw JSON body, falling back to the text as received.
pub fn print_raw(body: &str) {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => match serde_json::to_string_pretty(&value) {
            Ok(pretty) => println!("{pretty}"),
            Err(_) => println!("{body}"),
        },
        Err(_) => println!("{body}"),
    }
}

/// One-line outcome of a mutating call.
pub fn print_outcome(action: &str, status: Option<&str>) {
    match status {
        Some(status) if status.eq_ignore_ascii_case("success") => {
            println!("{GREEN}✓{RESET} {action}");
        }
        Some(status) => println!("{YELLOW}{action}:{RESET} {status}"),
        None => println!("{GREEN}✓{RESET} {action}"),
    }
}

pub fn print_error(error: &anyhow::Error) {
    eprintln!("{RED}{BOLD}Error:{RESET} {error}");
    for cause in error.chain().skip(1) {
        eprintln!("  {DIM}caused by:{RESET} {cause}");
    }
}

pub fn heading(title: &str) {
    println!("{BOLD}{CYAN}{title}{RESET}");
}
