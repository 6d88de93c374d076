//! The impact split engine.
//!
//! Every booking total is divided across four recipients at fixed
//! percentages: 50% to the homestay family, 25% to the local guide, 15% to
//! food suppliers, and the remainder to the village community fund.
//!
//! The first three shares are floored; the community share absorbs all
//! rounding loss. That makes the split exact — the four parts sum to the
//! input total for every input — which is the invariant the rest of the
//! system leans on. Rounding each share independently would not reconcile,
//! so the floor-then-remainder policy here must not be changed.

use crate::types::Money;
use serde::{Deserialize, Serialize};

/// Homestay family share, in percent
pub const HOMESTAY_SHARE_PERCENT: u64 = 50;
/// Local guide share, in percent
pub const GUIDE_SHARE_PERCENT: u64 = 25;
/// Food supplier share, in percent
pub const FOOD_SHARE_PERCENT: u64 = 15;

/// The four-way division of a booking total
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactSplit {
    /// Share paid to the homestay family (50%, floored)
    pub homestay: Money,
    /// Share paid to the local guide (25%, floored)
    pub guide: Money,
    /// Share paid to food suppliers (15%, floored)
    pub food: Money,
    /// Remainder share paid into the community fund
    pub community: Money,
}

impl ImpactSplit {
    /// Sum of the four shares; equals the input total by construction
    #[must_use]
    pub const fn total(&self) -> Money {
        Money::from_rupees(
            self.homestay.rupees()
                + self.guide.rupees()
                + self.food.rupees()
                + self.community.rupees(),
        )
    }
}

/// Split a booking total across the four recipient categories.
///
/// `total = 0` yields the all-zero split. There are no error conditions:
/// [`Money`] is unsigned, so negative totals are rejected upstream by
/// construction.
#[must_use]
pub fn split(total: Money) -> ImpactSplit {
    let homestay = total.percent_floor(HOMESTAY_SHARE_PERCENT);
    let guide = total.percent_floor(GUIDE_SHARE_PERCENT);
    let food = total.percent_floor(FOOD_SHARE_PERCENT);
    // The floored shares sum to at most 90% of the total, so this cannot
    // underflow.
    let community = Money::from_rupees(
        total.rupees() - homestay.rupees() - guide.rupees() - food.rupees(),
    );

    ImpactSplit {
        homestay,
        guide,
        food,
        community,
    }
}
