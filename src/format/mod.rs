//! Output formatting for lookup results (JSON, table, markdown).

use crate::config::OutputFormat;
use crate::mws::{Dimensions, LookupOutcome, Measure, ProductSummary};

/// Formats lookup results for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats any lookup outcome. Non-product outcomes print their message.
    pub fn format_outcome(&self, outcome: &LookupOutcome) -> String {
        match outcome {
            LookupOutcome::Found(product) => self.format_product(product),
            other => other.message().unwrap_or_default().to_string(),
        }
    }

    /// Formats a single product.
    pub fn format_product(&self, product: &ProductSummary) -> String {
        match self.format {
            OutputFormat::Json => self.json(product),
            OutputFormat::Table => self.table(product),
            OutputFormat::Markdown => self.markdown(product),
        }
    }

    fn json(&self, product: &ProductSummary) -> String {
        serde_json::to_string_pretty(product).unwrap_or_else(|_| "{}".to_string())
    }

    fn table(&self, product: &ProductSummary) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Title:    {}", product.title.as_deref().unwrap_or("N/A")));
        lines.push(format!("Item:     {}", dimensions_line(&product.item_dimensions)));
        lines.push(format!("Package:  {}", dimensions_line(&product.package_dimensions)));
        lines.push(format!("Image:    {}", product.image));

        lines.join("\n")
    }

    fn markdown(&self, product: &ProductSummary) -> String {
        let mut lines = Vec::new();

        lines.push(format!("## {}", product.title.as_deref().unwrap_or("Untitled product")));
        lines.push(String::new());
        lines.push("| | Height | Length | Width | Weight |".to_string());
        lines.push("|---|---|---|---|---|".to_string());
        lines.push(markdown_row("Item", &product.item_dimensions));
        lines.push(markdown_row("Package", &product.package_dimensions));
        lines.push(String::new());
        lines.push(format!("![image]({})", product.image));

        lines.join("\n")
    }
}

fn cell(measure: &Option<Measure>) -> String {
    measure.as_ref().map_or_else(|| "-".to_string(), Measure::to_string)
}

fn dimensions_line(d: &Dimensions) -> String {
    if d.is_empty() {
        return "N/A".to_string();
    }
    format!(
        "H {} x L {} x W {}, {}",
        cell(&d.height),
        cell(&d.length),
        cell(&d.width),
        cell(&d.weight)
    )
}

fn markdown_row(label: &str, d: &Dimensions) -> String {
    format!(
        "| {} | {} | {} | {} | {} |",
        label,
        cell(&d.height),
        cell(&d.length),
        cell(&d.width),
        cell(&d.weight)
    )
}
