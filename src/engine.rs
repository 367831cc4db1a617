//! Core amortization engine.
//!
//! Turns loan terms into a month-by-month repayment schedule: an optional
//! grace period during which interest capitalizes, followed by a fixed-installment
//! annuity on the capitalized principal.
//!
//! The engine is total. Every degenerate or invalid configuration produces an
//! empty schedule; nothing here returns an error or panics on numeric input.

use crate::money::Money;
use crate::params::LoanParameters;
use crate::schedule::{AmortizationRow, AmortizationSchedule, Phase};
use chrono::{Months, NaiveDate};
use log::{debug, warn};
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

const MONTHS_PER_YEAR: Decimal = dec!(12);
const PERCENT: Decimal = dec!(100);

/// Longest term the engine will schedule: 100 years of monthly rows.
pub const MAX_TERM_MONTHS: i64 = 1200;

/// Computes a repayment schedule from month-denominated terms.
///
/// Deferred rows come first, then `term_months - deferred_months` amortizing
/// rows. Row `k` falls due `k` months after `origin_date`.
///
/// Returns an empty vector when:
/// - `principal <= 0` or `term_months <= 0`
/// - `term_months > MAX_TERM_MONTHS`
/// - `annual_rate_percent < 0` or `deferred_months < 0`
/// - the grace period consumes the whole term (`deferred_months >= term_months`)
/// - the compounding overflows `Decimal`
///
/// # Examples
///
/// ```
/// use amortization_engine::compute;
/// use chrono::NaiveDate;
/// use rust_decimal_macros::dec;
///
/// let origin = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
/// let rows = compute(dec!(1200000), dec!(0), 12, 0, origin);
/// assert_eq!(rows.len(), 12);
/// assert_eq!(rows[0].payment.to_string(), "100000");
/// assert!(rows[11].remaining_balance.is_zero());
/// ```
pub fn compute(
    principal: Decimal,
    annual_rate_percent: Decimal,
    term_months: i64,
    deferred_months: i64,
    origin_date: NaiveDate,
) -> Vec<AmortizationRow> {
    if principal <= Decimal::ZERO || term_months <= 0 {
        debug!(
            "Insufficient input (principal {}, term {} months), empty schedule",
            principal, term_months
        );
        return Vec::new();
    }
    if annual_rate_percent < Decimal::ZERO || deferred_months < 0 {
        debug!(
            "Negative rate {} or deferral {}, empty schedule",
            annual_rate_percent, deferred_months
        );
        return Vec::new();
    }

    if term_months > MAX_TERM_MONTHS {
        warn!(
            "Term of {} months exceeds the {}-month maximum, empty schedule",
            term_months, MAX_TERM_MONTHS
        );
        return Vec::new();
    }

    let effective_months = term_months - deferred_months;
    if effective_months <= 0 {
        debug!(
            "Deferral of {} months consumes the {}-month term, empty schedule",
            deferred_months, term_months
        );
        return Vec::new();
    }

    // Both lie in 0..=MAX_TERM_MONTHS here.
    let (Ok(deferred), Ok(amortizing)) = (
        u32::try_from(deferred_months),
        u32::try_from(effective_months),
    ) else {
        return Vec::new();
    };

    let monthly_rate = annual_rate_percent / PERCENT / MONTHS_PER_YEAR;

    match build_rows(principal, monthly_rate, deferred, amortizing, origin_date) {
        Some(rows) => rows,
        None => {
            warn!(
                "Decimal overflow computing schedule (principal {}, rate {}%, term {} months), empty schedule",
                principal, annual_rate_percent, term_months
            );
            Vec::new()
        }
    }
}

/// Builds both phases; `None` on arithmetic overflow.
fn build_rows(
    principal: Decimal,
    monthly_rate: Decimal,
    deferred: u32,
    amortizing: u32,
    origin_date: NaiveDate,
) -> Option<Vec<AmortizationRow>> {
    let growth = Decimal::ONE + monthly_rate;
    let mut rows = Vec::with_capacity((deferred + amortizing) as usize);

    // Grace period: interest accrues on the original principal at a compound
    // rate and is added to what is owed. Nothing is collected.
    for i in 1..=deferred {
        let accrued_before = principal.checked_mul(growth.checked_powu(u64::from(i - 1))?)?;
        let interest = accrued_before.checked_mul(monthly_rate)?;
        let balance = principal.checked_mul(growth.checked_powu(u64::from(i))?)?;

        rows.push(AmortizationRow {
            period: i,
            due_date: due_date(origin_date, i),
            phase: Phase::Deferred,
            payment: Money::ZERO,
            principal_portion: Money::ZERO,
            interest_portion: Money::round(interest),
            remaining_balance: Money::round(balance),
        });
    }

    let capitalized = principal.checked_mul(growth.checked_powu(u64::from(deferred))?)?;
    let payment = Money::round(annuity_payment(capitalized, monthly_rate, amortizing)?);
    let mut balance = capitalized;

    for j in 1..=amortizing {
        let period = deferred + j;
        let interest = Money::round(balance.checked_mul(monthly_rate)?);

        // Never repay more than is still owed, nor a negative amount when a
        // tiny installment rounds below its interest.
        let repaid = (payment - interest)
            .as_decimal()
            .min(balance)
            .max(Decimal::ZERO);
        let principal_portion = Money::round(repaid);

        balance -= repaid;
        if j == amortizing {
            // Absorb the drift left by rounding the installment.
            balance = Decimal::ZERO;
        }

        rows.push(AmortizationRow {
            period,
            due_date: due_date(origin_date, period),
            phase: Phase::Amortizing,
            payment,
            principal_portion,
            interest_portion: interest,
            remaining_balance: Money::round(balance),
        });
    }

    Some(rows)
}

/// Level installment repaying `balance` over `periods` months at `monthly_rate`.
///
/// `P * r * (1+r)^n / ((1+r)^n - 1)`, or straight-line `P / n` at a zero rate.
fn annuity_payment(balance: Decimal, monthly_rate: Decimal, periods: u32) -> Option<Decimal> {
    let n = Decimal::from(periods);
    if monthly_rate.is_zero() {
        return balance.checked_div(n);
    }

    let compounded = (Decimal::ONE + monthly_rate).checked_powu(u64::from(periods))?;
    let denominator = compounded - Decimal::ONE;
    if denominator.is_zero() {
        // Rate too small to register over this horizon; same as zero rate.
        return balance.checked_div(n);
    }

    balance
        .checked_mul(monthly_rate.checked_mul(compounded)?)?
        .checked_div(denominator)
}

/// `origin + months`, clamped to month end and saturating at the calendar limit.
fn due_date(origin: NaiveDate, months: u32) -> NaiveDate {
    origin
        .checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

impl AmortizationSchedule {
    /// Normalizes the parameters to months and computes their schedule.
    ///
    /// `today` is used only when the parameters carry no origin date.
    pub fn from_parameters(params: &LoanParameters, today: NaiveDate) -> Self {
        let rows = compute(
            params.principal,
            params.annual_rate_percent,
            params.term_months(),
            params.deferred_months(),
            params.origin_or(today),
        );
        AmortizationSchedule::new(Money::round(params.principal), rows)
    }
}
