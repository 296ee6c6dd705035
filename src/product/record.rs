use rust_decimal::Decimal;
use std::fmt::Write;

/// Header row written at the top of every run's output
pub const CSV_HEADER: &str =
    "Category,Website,Title,SellingPrice,PriceBeforeDiscount,Currency,ProductURL,Brand,RatingScore,RatingCount,Rank";

/// A typed product, ready to be written out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub category: String,
    pub website: String,
    pub title: String,
    pub selling_price: Decimal,
    pub price_before_discount: Option<Decimal>,
    pub currency: String,
    pub product_url: String,
    pub sku: Option<String>,
    pub brand: String,
    pub rating_score: Option<Decimal>,
    pub rating_count: Option<u32>,
    /// 1-based position in the order products left the typing stage
    pub rank: u32,
    pub is_best_seller: bool,
}

impl Product {
    /// Renders the product as one CSV line, newline included
    ///
    /// Columns follow `CSV_HEADER`. Amounts use two decimal places, absent optional
    /// values render as empty cells, and commas are removed from the title. No other
    /// quoting is applied.
    pub fn to_csv_row(&self) -> String {
        let mut row = String::new();
        // Writing into a String cannot fail
        let _ = writeln!(
            row,
            "{},{},{},{},{},{},{},{},{},{},{}",
            self.category,
            self.website,
            self.title.replace(',', ""),
            format_amount(self.selling_price),
            self.price_before_discount.map(format_amount).unwrap_or_default(),
            self.currency,
            self.product_url,
            self.brand,
            self.rating_score.map(format_amount).unwrap_or_default(),
            self.rating_count.map(|c| c.to_string()).unwrap_or_default(),
            self.rank,
        );
        row
    }
}

fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}
