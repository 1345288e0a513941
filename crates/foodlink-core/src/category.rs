/// Retail classification of a store.
///
/// The dataset stores the category as free text, and different views use
/// different spellings for the same bucket ("Grocery" vs "Grocery Store").
/// [`RetailCategory::from_label`] folds the known spellings together and
/// sends everything else to [`RetailCategory::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RetailCategory {
    Grocery,
    FarmersMarket,
    Convenience,
    SmallBox,
    Other,
}

impl RetailCategory {
    pub const ALL: [RetailCategory; 5] = [
        RetailCategory::Grocery,
        RetailCategory::FarmersMarket,
        RetailCategory::Convenience,
        RetailCategory::SmallBox,
        RetailCategory::Other,
    ];

    /// Map a raw dataset label onto a category. Never fails.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let normalized = label.trim().to_lowercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "grocery" | "grocery store" => RetailCategory::Grocery,
            "farmers market" | "farmers' market" | "farmer's market" => {
                RetailCategory::FarmersMarket
            }
            "convenience" | "convenience store" => RetailCategory::Convenience,
            "small box" | "small store" | "small box store" => RetailCategory::SmallBox,
            _ => RetailCategory::Other,
        }
    }

    /// Display label used in reports and legends.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            RetailCategory::Grocery => "Grocery Store",
            RetailCategory::FarmersMarket => "Farmers Market",
            RetailCategory::Convenience => "Convenience Store",
            RetailCategory::SmallBox => "Small Store",
            RetailCategory::Other => "Other",
        }
    }

    /// Marker color as a hex string.
    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            RetailCategory::Grocery => "#4285F4",
            RetailCategory::FarmersMarket => "#0F9D58",
            RetailCategory::Convenience => "#F4B400",
            RetailCategory::SmallBox => "#DB4437",
            RetailCategory::Other => "#757575",
        }
    }

    /// Material icon name for the category marker.
    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            RetailCategory::Grocery => "local_grocery_store",
            RetailCategory::FarmersMarket => "shopping_basket",
            RetailCategory::Convenience => "storefront",
            RetailCategory::SmallBox => "store",
            RetailCategory::Other => "shop",
        }
    }
}

impl std::fmt::Display for RetailCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
