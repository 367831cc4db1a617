//! Repayment schedule rows and the summary values derived from them.
//!
//! A schedule is a pure derived value: it is recomputed in full whenever the
//! loan terms change and never edited in place.

use crate::money::Money;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// Which part of the loan life a row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Grace period: nothing is collected, interest capitalizes.
    Deferred,

    /// Constant installments split between interest and principal.
    Amortizing,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Deferred => write!(f, "deferred"),
            Phase::Amortizing => write!(f, "amortizing"),
        }
    }
}

/// One month of a repayment schedule.
///
/// # Invariants
///
/// - `period` is 1-based and sequential across deferred and amortizing rows
/// - `payment == principal_portion + interest_portion` on amortizing rows,
///   except where the rounded installment exceeds what is still owed; there
///   `principal_portion` is capped at the outstanding balance
/// - deferred rows collect nothing: `payment` and `principal_portion` are zero
/// - the last row of a schedule has `remaining_balance == 0`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AmortizationRow {
    pub period: u32,
    pub due_date: NaiveDate,
    pub phase: Phase,
    pub payment: Money,
    pub principal_portion: Money,
    pub interest_portion: Money,
    pub remaining_balance: Money,
}

/// A full schedule together with the principal it was computed for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AmortizationSchedule {
    /// Original principal, rounded to whole units.
    pub principal: Money,
    rows: Vec<AmortizationRow>,
}

/// Caller-side figures derived from a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleSummary {
    /// The constant amortizing installment, or zero for an empty schedule.
    pub monthly_payment: Money,

    /// Sum of every row's interest, deferred rows included.
    pub total_interest: Money,

    /// `principal + total_interest`.
    pub total_cost: Money,

    /// Interest added to the balance during the grace period.
    pub capitalized_interest: Money,

    /// Cash actually collected over the life of the loan.
    pub total_paid: Money,

    pub first_due_date: Option<NaiveDate>,
    pub last_due_date: Option<NaiveDate>,
}

impl AmortizationSchedule {
    pub fn new(principal: Money, rows: Vec<AmortizationRow>) -> Self {
        AmortizationSchedule { principal, rows }
    }

    /// An empty schedule means the inputs were insufficient, not that something failed.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[AmortizationRow] {
        &self.rows
    }

    pub fn deferred_rows(&self) -> impl Iterator<Item = &AmortizationRow> {
        self.rows.iter().filter(|r| r.phase == Phase::Deferred)
    }

    pub fn amortizing_rows(&self) -> impl Iterator<Item = &AmortizationRow> {
        self.rows.iter().filter(|r| r.phase == Phase::Amortizing)
    }

    /// Computes the headline figures shown next to a schedule table.
    pub fn summary(&self) -> ScheduleSummary {
        let total_interest: Money = self.rows.iter().map(|r| r.interest_portion).sum();
        let total_cost = if self.is_empty() {
            Money::ZERO
        } else {
            self.principal + total_interest
        };

        ScheduleSummary {
            monthly_payment: self
                .amortizing_rows()
                .next()
                .map(|r| r.payment)
                .unwrap_or(Money::ZERO),
            total_interest,
            total_cost,
            capitalized_interest: self.deferred_rows().map(|r| r.interest_portion).sum(),
            total_paid: self.rows.iter().map(|r| r.payment).sum(),
            first_due_date: self.rows.first().map(|r| r.due_date),
            last_due_date: self.rows.last().map(|r| r.due_date),
        }
    }

    /// Interest accruing each month, whether collected or capitalized.
    ///
    /// Cash-flow views use this to project an interest-only profile over the
    /// grace period without a separate computation.
    pub fn interest_only_projection(&self) -> Vec<(NaiveDate, Money)> {
        self.rows
            .iter()
            .map(|r| (r.due_date, r.interest_portion))
            .collect()
    }
}
