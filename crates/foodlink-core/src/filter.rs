use crate::category::RetailCategory;
use crate::store::StoreRecord;

/// Which stores the user wants to see. The default matches everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterSpec {
    /// `None` means no category constraint.
    pub category: Option<RetailCategory>,
    /// When set, only stores with fresh produce match.
    pub fresh_produce: bool,
    /// When set, only SNAP-accepting stores match.
    pub snap: bool,
}

impl FilterSpec {
    #[must_use]
    pub fn matches(&self, store: &StoreRecord) -> bool {
        self.category.is_none_or(|c| store.category == c)
            && (!self.fresh_produce || store.fresh_produce)
            && (!self.snap || store.snap)
    }

    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        *self == Self::default()
    }
}

/// Order-preserving subsequence of `stores` matching `spec`.
#[must_use]
pub fn filter_stores<'a, I>(stores: I, spec: &FilterSpec) -> Vec<&'a StoreRecord>
where
    I: IntoIterator<Item = &'a StoreRecord>,
{
    stores.into_iter().filter(|s| spec.matches(s)).collect()
}
