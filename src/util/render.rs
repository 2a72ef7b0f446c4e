use crate::model::agency::Agency;
use crate::model::client::Client;
use crate::model::quote::Quote;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Render error: {0}")]
    Render(String),
}

/// Renders the customer-facing quote document. Pure from the core's point
/// of view: quote + client + agency in, bytes out.
pub trait QuoteRenderer: Send + Sync {
    fn render(
        &self,
        quote: &Quote,
        client: &Client,
        agency: &Agency,
    ) -> Result<Vec<u8>, RenderError>;
}

/// Self-contained HTML document, suitable for mailing as an attachment or
/// handing to a print pipeline.
pub struct HtmlQuoteRenderer;

impl HtmlQuoteRenderer {
    pub fn new() -> Self {
        HtmlQuoteRenderer
    }
}

impl Default for HtmlQuoteRenderer {
    fn default() -> Self {
        HtmlQuoteRenderer::new()
    }
}

fn esc(value: &str) -> String {
    html_escape::encode_text(value).into_owned()
}

impl QuoteRenderer for HtmlQuoteRenderer {
    fn render(
        &self,
        quote: &Quote,
        client: &Client,
        agency: &Agency,
    ) -> Result<Vec<u8>, RenderError> {
        let mut rows = String::new();
        for item in &quote.items {
            rows.push_str(&format!(
                "<tr><td>{name}</td><td>{description}</td><td style=\"text-align:right\">{quantity}</td><td style=\"text-align:right\">{unit_price}</td><td style=\"text-align:right\">{total}</td></tr>\n",
                name = esc(&item.name),
                description = esc(item.description.as_deref().unwrap_or("")),
                quantity = item.quantity,
                unit_price = item.unit_price,
                total = item.total,
            ));
        }

        let document = format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
    <style>
        body {{ font-family: Arial, sans-serif; color: #333; max-width: 720px; margin: 0 auto; padding: 24px; }}
        table {{ width: 100%; border-collapse: collapse; }}
        th, td {{ border-bottom: 1px solid #dee2e6; padding: 8px; text-align: left; }}
        .totals td {{ border: none; padding: 4px 8px; }}
    </style>
</head>
<body>
    <h1>{agency_name}</h1>
    <h2>{title}</h2>
    <p>Prepared for: <strong>{client_name}</strong></p>
    <p>Valid until: {valid_until}</p>
    {description}
    <table>
        <thead>
            <tr><th>Item</th><th>Description</th><th style="text-align:right">Qty</th><th style="text-align:right">Unit price</th><th style="text-align:right">Total</th></tr>
        </thead>
        <tbody>
{rows}        </tbody>
    </table>
    <table class="totals" style="width: auto; margin-left: auto; margin-top: 16px;">
        <tr><td>Subtotal</td><td style="text-align:right">{subtotal}</td></tr>
        <tr><td>VAT (18%)</td><td style="text-align:right">{vat}</td></tr>
        <tr><td><strong>Total</strong></td><td style="text-align:right"><strong>{total}</strong></td></tr>
    </table>
    {notes}
</body>
</html>"#,
            title = esc(&quote.title),
            agency_name = esc(&agency.name),
            client_name = esc(&client.name),
            valid_until = esc(&quote.valid_until),
            description = quote
                .description
                .as_deref()
                .map(|d| format!("<p>{}</p>", esc(d)))
                .unwrap_or_default(),
            rows = rows,
            subtotal = quote.subtotal_amount,
            vat = quote.vat_amount,
            total = quote.total_amount,
            notes = quote
                .notes
                .as_deref()
                .map(|n| format!("<p style=\"margin-top: 24px;\">{}</p>", esc(n)))
                .unwrap_or_default(),
        );

        Ok(document.into_bytes())
    }
}
