//! Marketplace catalogue.
//!
//! Listings are generated for one or more sales channels; the selection only
//! names the downloaded file, the expansion itself is channel-agnostic.

use serde::Serialize;

use crate::error::ChannelError;

/// Kind of marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ChannelCategory {
    Ecommerce,
    QuickCommerce,
}

impl ChannelCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ecommerce => "Ecommerce",
            Self::QuickCommerce => "Quick Commerce",
        }
    }

    /// Channels of this category, in display order.
    pub fn channels(&self) -> impl Iterator<Item = &'static Channel> {
        let category = *self;
        CHANNELS.iter().filter(move |c| c.category == category)
    }
}

/// A marketplace listings can be generated for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Channel {
    pub name: &'static str,
    pub category: ChannelCategory,
}

const fn ecommerce(name: &'static str) -> Channel {
    Channel {
        name,
        category: ChannelCategory::Ecommerce,
    }
}

const fn quick(name: &'static str) -> Channel {
    Channel {
        name,
        category: ChannelCategory::QuickCommerce,
    }
}

/// Every supported channel.
pub static CHANNELS: &[Channel] = &[
    ecommerce("Amazon"),
    ecommerce("Flipkart"),
    ecommerce("Myntra"),
    ecommerce("Meesho"),
    ecommerce("Ajio"),
    ecommerce("Jio Mart"),
    ecommerce("Nykaa"),
    ecommerce("Mens XP"),
    ecommerce("Tata Cliq"),
    ecommerce("First Cry"),
    ecommerce("Paytm Mall"),
    ecommerce("Snapdeal"),
    ecommerce("IndiaMart"),
    ecommerce("Shopify"),
    quick("Blinkit"),
    quick("Zepto"),
    quick("Swiggy Instamart"),
    quick("Dunzo Daily"),
    quick("BigBasket"),
    quick("Amazon Fresh"),
    quick("Flipkart Minutes"),
    quick("Myntra (M-Now)"),
    quick("FreshToHome"),
];

impl Channel {
    /// Look up a channel by name, ignoring case and surrounding whitespace.
    pub fn parse(name: &str) -> Result<&'static Channel, ChannelError> {
        let wanted = name.trim();
        CHANNELS
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ChannelError(wanted.to_string()))
    }

    /// Parse every name, failing on the first unknown one.
    pub fn parse_all<S: AsRef<str>>(names: &[S]) -> Result<Vec<&'static Channel>, ChannelError> {
        names.iter().map(|n| Self::parse(n.as_ref())).collect()
    }
}

/// Download name for a channel selection: `SKU_Listings_for_Amazon_Flipkart.csv`.
pub fn listing_file_name(channels: &[&Channel]) -> String {
    let names: Vec<&str> = channels.iter().map(|c| c.name).collect();
    format!("SKU_Listings_for_{}.csv", names.join("_"))
}
