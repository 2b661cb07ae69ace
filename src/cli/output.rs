/// Terminal output helpers shared by the commands
use colored::*;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color as TableColor, ContentArrangement, Table};

pub fn section_header(title: &str) {
    println!("\n{}", title.bold().cyan());
    println!("{}", "─".repeat(title.chars().count()).dimmed());
}

pub fn success(message: &str) {
    eprintln!("{} {}", "✓".green(), message);
}

pub fn warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message);
}

/// Tree structure item
pub fn tree_item(is_last: bool, label: &str, value: Option<&str>) {
    let prefix = if is_last { "└─" } else { "├─" };
    if let Some(val) = value {
        println!("{} {}: {}", prefix.dimmed(), label, val);
    } else {
        println!("{} {}", prefix.dimmed(), label);
    }
}

pub fn create_standard_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .add_attribute(Attribute::Bold)
        .fg(TableColor::Cyan)
}

/// Colour a conservation percentage by band
pub fn conservation_colored(value: f64) -> ColoredString {
    let text = format!("{:.1}%", value);
    if value >= 90.0 {
        text.green()
    } else if value >= 60.0 {
        text.yellow()
    } else {
        text.red()
    }
}
