//! Terminal summaries of WoE tables and associations

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};

use crate::pipeline::{AssociatedPair, WoeCategory, WoeTable, MISSING_LABEL};
use crate::utils::format_value;

/// Cramér's V above which an association is highlighted
const STRONG_ASSOCIATION: f64 = 0.5;

fn woe_row(label: &str, c: &WoeCategory) -> Vec<Cell> {
    let woe_cell = Cell::new(format_value(c.woe, 4));
    let woe_cell = if c.woe.is_finite() {
        woe_cell
    } else {
        woe_cell.fg(Color::Red).add_attribute(Attribute::Bold)
    };

    vec![
        Cell::new(label),
        Cell::new(c.count),
        Cell::new(c.events),
        Cell::new(format!("{:.1}%", c.event_rate * 100.0)),
        Cell::new(format!("{:.1}%", c.population_pct)),
        woe_cell,
        Cell::new(format_value(c.iv_contribution, 4)),
    ]
}

/// Render a WoE table as a terminal table
pub fn render_woe_table(table: &WoeTable) -> String {
    let mut out = Table::new();
    out.load_preset(UTF8_FULL_CONDENSED);
    out.set_header(vec![
        Cell::new(&table.variable).add_attribute(Attribute::Bold),
        Cell::new("Count").add_attribute(Attribute::Bold),
        Cell::new("Events").add_attribute(Attribute::Bold),
        Cell::new("Event Rate").add_attribute(Attribute::Bold),
        Cell::new("Population").add_attribute(Attribute::Bold),
        Cell::new(&table.woe_name).add_attribute(Attribute::Bold),
        Cell::new("IV").add_attribute(Attribute::Bold),
    ]);

    for c in &table.categories {
        out.add_row(woe_row(&c.category, c));
    }
    if let Some(missing) = &table.missing_bin {
        out.add_row(woe_row(MISSING_LABEL, missing));
    }

    out.add_row(vec![
        Cell::new("Total").add_attribute(Attribute::Bold),
        Cell::new(table.total_records()),
        Cell::new(table.total_events),
        Cell::new(format!("{:.1}%", table.default_rate * 100.0)),
        Cell::new("100.0%"),
        Cell::new(format_value(table.total_woe, 4)),
        Cell::new(format_value(table.iv, 4))
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
    ]);

    out.to_string()
}

/// Render associated pairs as a terminal table
pub fn render_associations(pairs: &[AssociatedPair]) -> String {
    let mut out = Table::new();
    out.load_preset(UTF8_FULL_CONDENSED);
    out.set_header(vec![
        Cell::new("Feature 1").add_attribute(Attribute::Bold),
        Cell::new("Feature 2").add_attribute(Attribute::Bold),
        Cell::new("Cramér's V").add_attribute(Attribute::Bold),
    ]);

    for pair in pairs {
        let color = if pair.cramers_v > STRONG_ASSOCIATION {
            Color::Red
        } else {
            Color::Yellow
        };
        out.add_row(vec![
            Cell::new(&pair.feature1),
            Cell::new(&pair.feature2),
            Cell::new(format!("{:.4}", pair.cramers_v)).fg(color),
        ]);
    }

    out.to_string()
}
