//! Edge styling and display formatting.

pub const HEAVY_EDGE_COLOR: &str = "red";
pub const EDGE_COLOR: &str = "#303336";
pub const NEW_EDGE_COLOR: &str = "#4287f5";
pub const TRANSACTION_EDGE_COLOR: &str = "#00BFFF";

/// Stroke width for an edge summarizing `transaction_count` transactions.
pub fn edge_width(transaction_count: u64) -> f64 {
    (transaction_count.clamp(1, 5) * 2) as f64
}

pub fn is_heavy(width: f64) -> bool {
    width >= 5.0
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeStyle {
    pub width: f64,
    pub color: &'static str,
    /// Glow radius in pixels; zero when not highlighted.
    pub glow: f64,
}

/// Style of an edge, given its highlight progress (if lit) and whether the
/// highlight came from the pushed transaction itself.
pub fn edge_style(transaction_count: u64, progress: Option<f64>, emphasized: bool) -> EdgeStyle {
    let width = edge_width(transaction_count);
    match progress {
        Some(p) => EdgeStyle {
            width: width + (1.0 - p),
            color: if emphasized { TRANSACTION_EDGE_COLOR } else { NEW_EDGE_COLOR },
            glow: 8.0 - p * 8.0,
        },
        None => EdgeStyle {
            width,
            color: if is_heavy(width) { HEAVY_EDGE_COLOR } else { EDGE_COLOR },
            glow: 0.0,
        },
    }
}

/// Whole-dollar amount with thousands separators, e.g. `$12,345`.
pub fn format_currency(amount: f64) -> String {
    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("{}${}", sign, grouped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_caps_at_five_transactions() {
        assert_eq!(edge_width(1), 2.0);
        assert_eq!(edge_width(2), 4.0);
        assert_eq!(edge_width(5), 10.0);
        assert_eq!(edge_width(40), 10.0);
    }

    #[test]
    fn resting_edges_turn_red_when_heavy() {
        assert_eq!(edge_style(2, None, false).color, EDGE_COLOR);
        assert_eq!(edge_style(3, None, false).color, HEAVY_EDGE_COLOR);
    }

    #[test]
    fn highlighted_edges_fade() {
        let fresh = edge_style(1, Some(0.0), true);
        assert_eq!(fresh.color, TRANSACTION_EDGE_COLOR);
        assert_eq!(fresh.width, 3.0);
        assert_eq!(fresh.glow, 8.0);

        let late = edge_style(1, Some(0.75), false);
        assert_eq!(late.color, NEW_EDGE_COLOR);
        assert_eq!(late.glow, 2.0);
    }

    #[test]
    fn currency() {
        assert_eq!(format_currency(0.0), "$0");
        assert_eq!(format_currency(999.4), "$999");
        assert_eq!(format_currency(1234.5), "$1,235");
        assert_eq!(format_currency(1_000_000.0), "$1,000,000");
        assert_eq!(format_currency(-2500.0), "-$2,500");
    }
}
