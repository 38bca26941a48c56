//! Activity draft and bimester allocation types.

use chrono::{Datelike, NaiveDate};
use metas_shared::types::{ActivityId, AreaId, Currency, Money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::quantity::parse_quantity_or_zero;

/// Number of reporting periods in a year.
pub const BIMESTER_COUNT: usize = 6;

/// One of the six fixed two-month reporting periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Bimester {
    /// January–February.
    JanFeb = 1,
    /// March–April.
    MarApr = 2,
    /// May–June.
    MayJun = 3,
    /// July–August.
    JulAug = 4,
    /// September–October.
    SepOct = 5,
    /// November–December.
    NovDec = 6,
}

impl Bimester {
    /// All periods in calendar order.
    pub const ALL: [Self; BIMESTER_COUNT] = [
        Self::JanFeb,
        Self::MarApr,
        Self::MayJun,
        Self::JulAug,
        Self::SepOct,
        Self::NovDec,
    ];

    /// Returns the 1-based period index.
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Returns the period for a 1-based index.
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            1 => Some(Self::JanFeb),
            2 => Some(Self::MarApr),
            3 => Some(Self::MayJun),
            4 => Some(Self::JulAug),
            5 => Some(Self::SepOct),
            6 => Some(Self::NovDec),
            _ => None,
        }
    }

    /// Returns the period containing a calendar month (1-12).
    #[must_use]
    pub fn for_month(month: u32) -> Option<Self> {
        if (1..=12).contains(&month) {
            u8::try_from(month.div_ceil(2)).ok().and_then(Self::from_index)
        } else {
            None
        }
    }

    /// Returns a short month-range label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::JanFeb => "Jan-Feb",
            Self::MarApr => "Mar-Apr",
            Self::MayJun => "May-Jun",
            Self::JulAug => "Jul-Aug",
            Self::SepOct => "Sep-Oct",
            Self::NovDec => "Nov-Dec",
        }
    }
}

impl std::fmt::Display for Bimester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "bimester {} ({})", self.index(), self.label())
    }
}

impl TryFrom<u8> for Bimester {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_index(value).ok_or_else(|| format!("Invalid bimester index: {value}"))
    }
}

impl From<Bimester> for u8 {
    fn from(bimester: Bimester) -> Self {
        bimester.index()
    }
}

/// Budget and target planned for one bimester.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BimesterAllocation {
    /// The period this allocation belongs to.
    pub bimester: Bimester,
    /// Planned budget (≥ 0).
    pub budget: Decimal,
    /// Planned target quantity (≥ 0).
    pub target: Decimal,
    /// Free-text description of what the target consists of.
    pub breakdown_text: Option<String>,
}

impl BimesterAllocation {
    /// Creates a zeroed allocation with no breakdown.
    #[must_use]
    pub const fn empty(bimester: Bimester) -> Self {
        Self {
            bimester,
            budget: Decimal::ZERO,
            target: Decimal::ZERO,
            breakdown_text: None,
        }
    }

    /// Returns the breakdown text when it has visible content.
    #[must_use]
    pub fn breakdown(&self) -> Option<&str> {
        self.breakdown_text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}

/// Raw, unparsed field values for one bimester as typed by the user.
#[derive(Debug, Clone, Default)]
pub struct RawAllocationInput {
    /// Budget as typed.
    pub budget: String,
    /// Target as typed.
    pub target: String,
    /// Breakdown text as typed.
    pub breakdown_text: String,
}

/// An activity being created or edited.
///
/// Allocations are created and replaced together with the draft; there is no
/// partial allocation state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityDraft {
    /// Set when editing an already-saved activity.
    pub id: Option<ActivityId>,
    /// Owning area, once selected.
    pub area_id: Option<AreaId>,
    /// Start date; its year is the fiscal year checked against the ceiling.
    pub effective_start_date: Option<NaiveDate>,
    /// Currency used to render budget figures.
    pub currency: Currency,
    /// Declared yearly budget.
    pub total_budget: Decimal,
    /// Declared yearly target.
    pub total_target: Decimal,
    /// Per-period allocations, one per bimester.
    pub allocations: Vec<BimesterAllocation>,
}

impl Default for ActivityDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivityDraft {
    /// Creates an empty draft with six zeroed allocations.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: None,
            area_id: None,
            effective_start_date: None,
            currency: Currency::default(),
            total_budget: Decimal::ZERO,
            total_target: Decimal::ZERO,
            allocations: Bimester::ALL.into_iter().map(BimesterAllocation::empty).collect(),
        }
    }

    /// Discards every field, including all allocations.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Fiscal year derived from the effective start date.
    #[must_use]
    pub fn fiscal_year(&self) -> Option<i32> {
        self.effective_start_date.map(|date| date.year())
    }

    /// Period containing the effective start date.
    #[must_use]
    pub fn start_bimester(&self) -> Option<Bimester> {
        self.effective_start_date.and_then(|date| Bimester::for_month(date.month()))
    }

    /// Returns the allocation for a period.
    #[must_use]
    pub fn allocation(&self, bimester: Bimester) -> Option<&BimesterAllocation> {
        self.allocations.iter().find(|a| a.bimester == bimester)
    }

    /// Returns the allocation for a period, mutably.
    pub fn allocation_mut(&mut self, bimester: Bimester) -> Option<&mut BimesterAllocation> {
        self.allocations.iter_mut().find(|a| a.bimester == bimester)
    }

    /// Sets the declared budget from user input. Unparseable input becomes zero.
    pub fn set_total_budget_raw(&mut self, raw: &str) {
        self.total_budget = parse_quantity_or_zero(raw);
    }

    /// Sets the declared target from user input. Unparseable input becomes zero.
    pub fn set_total_target_raw(&mut self, raw: &str) {
        self.total_target = parse_quantity_or_zero(raw);
    }

    /// Replaces one period's fields from user input.
    ///
    /// Returns false when the draft has no allocation for `bimester`.
    pub fn set_allocation_raw(&mut self, bimester: Bimester, input: &RawAllocationInput) -> bool {
        let Some(allocation) = self.allocation_mut(bimester) else {
            return false;
        };
        allocation.budget = parse_quantity_or_zero(&input.budget);
        allocation.target = parse_quantity_or_zero(&input.target);
        allocation.breakdown_text = Some(input.breakdown_text.clone()).filter(|t| !t.trim().is_empty());
        true
    }

    /// Sum of all period budgets, saturating at the `Decimal` bounds.
    #[must_use]
    pub fn allocated_budget(&self) -> Decimal {
        self.allocations.iter().map(|a| a.budget).fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Sum of all period targets, saturating at the `Decimal` bounds.
    #[must_use]
    pub fn allocated_target(&self) -> Decimal {
        self.allocations.iter().map(|a| a.target).fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Wraps an amount in the draft's currency.
    #[must_use]
    pub const fn money(&self, amount: Decimal) -> Money {
        Money::new(amount, self.currency)
    }
}
