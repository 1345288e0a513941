//! Category aggregation for charts and key statistics.
//!
//! Every percentage reports `0.0` when its denominator is zero, so an empty
//! filtered view never produces NaN.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::category::RetailCategory;
use crate::store::StoreRecord;

#[derive(Debug, Clone, PartialEq)]
pub struct CategorySummary {
    pub category: RetailCategory,
    pub store_count: usize,
    pub redemption: Decimal,
    /// `store_count / total_stores * 100`.
    pub store_share_pct: f64,
    /// `redemption / total_redemption * 100`.
    pub redemption_share_pct: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSummary {
    /// One entry per category present, in first-seen order.
    pub categories: Vec<CategorySummary>,
    pub total_stores: usize,
    pub total_redemption: Decimal,
    pub snap_accepting: usize,
    pub fresh_produce: usize,
    pub snap_pct: f64,
    pub fresh_produce_pct: f64,
}

/// One slice of the redemption distribution.
#[derive(Debug, Clone, PartialEq)]
pub struct RedemptionShare {
    pub category: RetailCategory,
    /// Rounded to cents.
    pub redemption: Decimal,
    pub share_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapSplit {
    pub accepting: usize,
    pub not_accepting: usize,
}

impl DatasetSummary {
    #[must_use]
    pub fn category(&self, category: RetailCategory) -> Option<&CategorySummary> {
        self.categories.iter().find(|c| c.category == category)
    }

    /// Per-category redemption, largest share first.
    #[must_use]
    pub fn redemption_distribution(&self) -> Vec<RedemptionShare> {
        let mut shares: Vec<RedemptionShare> = self
            .categories
            .iter()
            .map(|c| RedemptionShare {
                category: c.category,
                redemption: c.redemption.round_dp(2),
                share_pct: c.redemption_share_pct,
            })
            .collect();
        shares.sort_by(|a, b| b.share_pct.total_cmp(&a.share_pct));
        shares
    }

    #[must_use]
    pub fn snap_split(&self) -> SnapSplit {
        SnapSplit {
            accepting: self.snap_accepting,
            not_accepting: self.total_stores - self.snap_accepting,
        }
    }
}

/// Aggregate `stores` by category and compute whole-set totals.
///
/// Redemption sums saturate at [`Decimal::MAX`].
#[must_use]
pub fn summarize<'a, I>(stores: I) -> DatasetSummary
where
    I: IntoIterator<Item = &'a StoreRecord>,
{
    let mut groups: Vec<(RetailCategory, usize, Decimal)> = Vec::new();
    let mut total_stores = 0usize;
    let mut total_redemption = Decimal::ZERO;
    let mut snap_accepting = 0usize;
    let mut fresh_produce = 0usize;

    for store in stores {
        let amount = store.snap_redemption_estimate;
        match groups.iter_mut().find(|(c, _, _)| *c == store.category) {
            Some((_, count, sum)) => {
                *count += 1;
                *sum = sum.saturating_add(amount);
            }
            None => groups.push((store.category, 1, amount)),
        }
        total_stores += 1;
        total_redemption = total_redemption.saturating_add(amount);
        if store.snap {
            snap_accepting += 1;
        }
        if store.fresh_produce {
            fresh_produce += 1;
        }
    }

    let categories = groups
        .into_iter()
        .map(|(category, store_count, redemption)| CategorySummary {
            category,
            store_count,
            redemption,
            store_share_pct: percent_of_count(store_count, total_stores),
            redemption_share_pct: percent_of_amount(redemption, total_redemption),
        })
        .collect();

    DatasetSummary {
        categories,
        total_stores,
        total_redemption,
        snap_accepting,
        fresh_produce,
        snap_pct: percent_of_count(snap_accepting, total_stores),
        fresh_produce_pct: percent_of_count(fresh_produce, total_stores),
    }
}

/// `part / total * 100`, or `0.0` when `total` is zero.
#[must_use]
pub fn percent_of_count(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    // Store counts stay far below f64's 52-bit mantissa.
    #[allow(clippy::cast_precision_loss)]
    let pct = part as f64 / total as f64 * 100.0;
    pct
}

/// `part / total * 100`, or `0.0` when `total` is zero.
#[must_use]
pub fn percent_of_amount(part: Decimal, total: Decimal) -> f64 {
    if total.is_zero() {
        return 0.0;
    }
    part.checked_div(total)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .and_then(|pct| pct.to_f64())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::store;

    fn with(id: i64, category: RetailCategory, snap: bool, redemption: &str) -> StoreRecord {
        let mut s = store(id, category);
        s.snap = snap;
        s.snap_redemption_estimate = redemption.parse().unwrap();
        s
    }

    #[test]
    fn three_store_example() {
        let stores = vec![
            with(1, RetailCategory::Grocery, true, "100"),
            with(2, RetailCategory::Grocery, false, "50"),
            with(3, RetailCategory::FarmersMarket, true, "0"),
        ];
        let summary = summarize(&stores);

        assert_eq!(summary.total_stores, 3);
        assert_eq!(summary.total_redemption, Decimal::from(150));
        assert_eq!(summary.snap_accepting, 2);

        let grocery = summary.category(RetailCategory::Grocery).unwrap();
        assert_eq!(grocery.store_count, 2);
        assert_eq!(grocery.redemption, Decimal::from(150));
        assert!((grocery.redemption_share_pct - 100.0).abs() < 1e-9);
        assert!((grocery.store_share_pct - 200.0 / 3.0).abs() < 1e-9);

        let market = summary.category(RetailCategory::FarmersMarket).unwrap();
        assert!(market.redemption_share_pct.abs() < f64::EPSILON);

        assert_eq!(
            summary.snap_split(),
            SnapSplit {
                accepting: 2,
                not_accepting: 1
            }
        );
    }

    #[test]
    fn empty_input_has_no_nan() {
        let stores: Vec<StoreRecord> = Vec::new();
        let summary = summarize(&stores);
        assert_eq!(summary.total_stores, 0);
        assert!(summary.categories.is_empty());
        assert!(!summary.snap_pct.is_nan());
        assert!(summary.snap_pct.abs() < f64::EPSILON);
        assert!(summary.fresh_produce_pct.abs() < f64::EPSILON);
    }

    #[test]
    fn zero_total_redemption_reports_zero_share() {
        let stores = vec![
            with(1, RetailCategory::Grocery, false, "0"),
            with(2, RetailCategory::Convenience, false, "0"),
        ];
        let summary = summarize(&stores);
        for c in &summary.categories {
            assert!(!c.redemption_share_pct.is_nan());
            assert!(c.redemption_share_pct.abs() < f64::EPSILON);
            assert!((c.store_share_pct - 50.0).abs() < 1e-9);
        }
    }

    #[test]
    fn category_totals_add_up() {
        let categories = RetailCategory::ALL;
        let stores: Vec<StoreRecord> = (0..40)
            .map(|i| {
                let category = categories[usize::try_from(i).unwrap() % categories.len()];
                with(i, category, i % 3 == 0, &format!("{}.{:02}", i * 7, i % 100))
            })
            .collect();
        let summary = summarize(&stores);

        let count_sum: usize = summary.categories.iter().map(|c| c.store_count).sum();
        let redemption_sum: Decimal = summary.categories.iter().map(|c| c.redemption).sum();
        let share_sum: f64 = summary
            .categories
            .iter()
            .map(|c| c.redemption_share_pct)
            .sum();

        assert_eq!(count_sum, summary.total_stores);
        assert_eq!(redemption_sum, summary.total_redemption);
        assert!((share_sum - 100.0).abs() < 1e-6);
    }

    #[test]
    fn categories_keep_first_seen_order() {
        let stores = vec![
            with(1, RetailCategory::Convenience, false, "1"),
            with(2, RetailCategory::Grocery, false, "1"),
            with(3, RetailCategory::Convenience, false, "1"),
        ];
        let order: Vec<RetailCategory> = summarize(&stores)
            .categories
            .iter()
            .map(|c| c.category)
            .collect();
        assert_eq!(
            order,
            vec![RetailCategory::Convenience, RetailCategory::Grocery]
        );
    }

    #[test]
    fn redemption_distribution_sorted_by_share() {
        let stores = vec![
            with(1, RetailCategory::Convenience, false, "10.005"),
            with(2, RetailCategory::Grocery, false, "90"),
        ];
        let distribution = summarize(&stores).redemption_distribution();
        assert_eq!(distribution[0].category, RetailCategory::Grocery);
        assert_eq!(distribution[1].category, RetailCategory::Convenience);
        assert_eq!(distribution[1].redemption, Decimal::new(1000, 2));
    }

    #[test]
    fn huge_redemptions_saturate_instead_of_overflowing() {
        let stores = vec![
            with(1, RetailCategory::Grocery, false, "50000000000000000000000000000"),
            with(2, RetailCategory::Grocery, false, "50000000000000000000000000000"),
            with(3, RetailCategory::Convenience, false, "50000000000000000000000000000"),
        ];
        let summary = summarize(&stores);

        assert_eq!(summary.total_redemption, Decimal::MAX);
        let grocery = summary.category(RetailCategory::Grocery).unwrap();
        assert_eq!(grocery.redemption, Decimal::MAX);
        assert!(grocery.redemption_share_pct.is_finite());
        assert_eq!(summary.redemption_distribution().len(), 2);
    }

    #[test]
    fn percent_helpers_guard_zero() {
        assert!(percent_of_count(3, 0).abs() < f64::EPSILON);
        assert!(percent_of_amount(Decimal::ONE, Decimal::ZERO).abs() < f64::EPSILON);
        assert!((percent_of_count(1, 4) - 25.0).abs() < 1e-12);
        assert!((percent_of_amount(Decimal::ONE, Decimal::from(8)) - 12.5).abs() < 1e-12);
    }
}
