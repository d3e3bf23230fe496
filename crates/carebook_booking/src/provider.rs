// --- File: crates/carebook_booking/src/provider.rs ---
//! Provider detail view: header fields, the "about" text and the payment stub.

use carebook_slots::Appointment;
use serde::{Deserialize, Serialize};

/// Currency symbol used on the payment button.
pub const CURRENCY_SYMBOL: &str = "₹";
const PARAGRAPH_BLOCK: &str = "paragraph";

/// A bookable provider with its existing appointments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderDetail {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub open_time: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub about: AboutContent,
    #[serde(default)]
    pub appointments: Vec<Appointment>,
}

/// Rich-text "about" field. Either plain text or a list of blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AboutContent {
    Text(String),
    Blocks(Vec<AboutBlock>),
}

impl Default for AboutContent {
    fn default() -> Self {
        AboutContent::Blocks(Vec::new())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AboutBlock {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub children: Vec<AboutChild>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AboutChild {
    #[serde(default)]
    pub text: String,
}

impl AboutBlock {
    pub fn paragraph(texts: &[&str]) -> Self {
        Self {
            kind: PARAGRAPH_BLOCK.to_string(),
            children: texts
                .iter()
                .map(|text| AboutChild {
                    text: (*text).to_string(),
                })
                .collect(),
        }
    }
}

/// Renders the about field as paragraphs.
///
/// Only `paragraph` blocks are rendered; the texts of their children are
/// joined with a single space. Blank paragraphs are dropped.
pub fn render_about(about: &AboutContent) -> Vec<String> {
    let paragraphs: Vec<String> = match about {
        AboutContent::Text(text) => vec![text.trim().to_string()],
        AboutContent::Blocks(blocks) => blocks
            .iter()
            .filter(|block| block.kind == PARAGRAPH_BLOCK)
            .map(|block| {
                block
                    .children
                    .iter()
                    .map(|child| child.text.as_str())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect(),
    };
    paragraphs
        .into_iter()
        .filter(|p| !p.trim().is_empty())
        .collect()
}

/// The payment action. Payment is not wired up, so it is never enabled.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentStub {
    pub label: String,
    pub amount: Option<f64>,
    pub enabled: bool,
}

impl PaymentStub {
    pub fn for_price(price: Option<f64>) -> Self {
        let amount = price.map(format_amount).unwrap_or_default();
        Self {
            label: format!("Proceed to Pay {}{}", CURRENCY_SYMBOL, amount),
            amount: price,
            enabled: false,
        }
    }
}

/// Whole amounts render without decimals, the rest with two.
pub fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{:.0}", amount)
    } else {
        format!("{:.2}", amount)
    }
}

/// What the provider detail page shows.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderView {
    pub id: String,
    pub name: String,
    pub open_time: Option<String>,
    pub address: Option<String>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub about: Vec<String>,
    pub payment: PaymentStub,
}

impl From<&ProviderDetail> for ProviderView {
    fn from(provider: &ProviderDetail) -> Self {
        Self {
            id: provider.id.clone(),
            name: provider.name.clone(),
            open_time: provider.open_time.clone(),
            address: provider.address.clone(),
            category: provider.category.clone(),
            image_url: provider.image_url.clone(),
            about: render_about(&provider.about),
            payment: PaymentStub::for_price(provider.price),
        }
    }
}
