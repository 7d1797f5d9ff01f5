#[cfg(feature = "chart")]
use rust_decimal::{prelude::ToPrimitive, RoundingStrategy};
use rust_decimal::Decimal;

/// Something that can draw `(label, amount)` pairs.
pub trait ChartRenderer {
    fn render(&self, title: &str, series: &[(String, Decimal)]) -> String;
}

/// Name of the cargo feature that provides a renderer.
pub const FEATURE: &str = "chart";

/// The renderer compiled into this binary, if any.
#[cfg(feature = "chart")]
pub fn renderer() -> Option<Box<dyn ChartRenderer>> {
    Some(Box::new(BarChart::default()))
}

#[cfg(not(feature = "chart"))]
pub fn renderer() -> Option<Box<dyn ChartRenderer>> {
    None
}

/// Horizontal text bars scaled to the largest absolute amount.
#[cfg(feature = "chart")]
pub struct BarChart {
    width: usize,
}

#[cfg(feature = "chart")]
impl Default for BarChart {
    fn default() -> Self {
        Self { width: 40 }
    }
}

#[cfg(feature = "chart")]
impl ChartRenderer for BarChart {
    fn render(&self, title: &str, series: &[(String, Decimal)]) -> String {
        let label_width = series.iter().map(|(label, _)| label.chars().count()).max().unwrap_or(0);
        let largest = series
            .iter()
            .map(|(_, amount)| amount.abs())
            .max()
            .unwrap_or(Decimal::ZERO);

        let mut out = format!("{title}\n");
        for (label, amount) in series {
            let length = if largest.is_zero() {
                0
            } else {
                (amount.abs() / largest * Decimal::from(self.width))
                    .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                    .to_usize()
                    .unwrap_or(self.width)
            };
            let glyph = if amount.is_sign_negative() { "-" } else { "#" };

            out.push_str(&format!(
                "{label:<label_width$} | {bar:<width$} {amount:.2}\n",
                bar = glyph.repeat(length),
                amount = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
                width = self.width,
            ));
        }

        out
    }
}
