//! Loan parameters and the raw CSV record they are parsed from.

use crate::period::{Duration, PeriodUnit};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;

/// Date format accepted for `origin_date`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// The terms of a loan as supplied by a caller.
#[derive(Debug, Clone, PartialEq)]
pub struct LoanParameters {
    /// Amount borrowed, in whatever currency unit the caller works in.
    pub principal: Decimal,

    /// Nominal annual rate in percent (`12` means 12%).
    pub annual_rate_percent: Decimal,

    /// Full repayment duration, grace period included.
    pub term: Duration,

    /// Grace period before amortization begins.
    pub deferral: Duration,

    /// First due date is one month after this. `None` means "today".
    pub origin_date: Option<NaiveDate>,
}

impl LoanParameters {
    /// Creates month-denominated parameters with no grace period.
    pub fn new(principal: Decimal, annual_rate_percent: Decimal, term_months: i64) -> Self {
        LoanParameters {
            principal,
            annual_rate_percent,
            term: Duration::months(term_months),
            deferral: Duration::months(0),
            origin_date: None,
        }
    }

    pub fn with_deferral(mut self, deferral: Duration) -> Self {
        self.deferral = deferral;
        self
    }

    pub fn with_term(mut self, term: Duration) -> Self {
        self.term = term;
        self
    }

    pub fn with_origin(mut self, origin_date: NaiveDate) -> Self {
        self.origin_date = Some(origin_date);
        self
    }

    pub fn term_months(&self) -> i64 {
        self.term.to_months()
    }

    pub fn deferred_months(&self) -> i64 {
        self.deferral.to_months()
    }

    /// Origin date, falling back to the caller's notion of today.
    pub fn origin_or(&self, today: NaiveDate) -> NaiveDate {
        self.origin_date.unwrap_or(today)
    }
}

/// Raw loan request as read from CSV.
///
/// Every field except the identifier is kept as an optional string so that a
/// malformed cell skips its row instead of aborting the whole batch.
#[derive(Debug, Deserialize)]
pub struct LoanRecord {
    /// Caller-chosen loan identifier, echoed in the output.
    pub loan: String,

    pub principal: Option<String>,

    /// Annual nominal rate in percent.
    pub rate: Option<String>,

    pub term: Option<String>,

    #[serde(default)]
    pub term_unit: Option<String>,

    /// Grace period length; empty means none.
    #[serde(default)]
    pub deferred: Option<String>,

    #[serde(default)]
    pub deferred_unit: Option<String>,

    /// `YYYY-MM-DD`; empty means today.
    #[serde(default)]
    pub origin_date: Option<String>,
}

/// A parsed loan request ready for scheduling.
#[derive(Debug, Clone, PartialEq)]
pub struct LoanRequest {
    pub loan: String,
    pub params: LoanParameters,
}

impl LoanRecord {
    /// Parses the raw CSV record into typed loan parameters.
    ///
    /// Returns `None` if a required field is missing or any field is malformed.
    /// Values are not range-checked here; out-of-range terms are the engine's
    /// call (it answers them with an empty schedule).
    pub fn parse(&self) -> Option<LoanRequest> {
        let principal = Decimal::from_str(non_empty(&self.principal)?).ok()?;
        let annual_rate_percent = Decimal::from_str(non_empty(&self.rate)?).ok()?;
        let term = Duration {
            periods: non_empty(&self.term)?.parse().ok()?,
            unit: parse_unit(&self.term_unit)?,
        };
        let deferral = Duration {
            periods: match non_empty(&self.deferred) {
                Some(value) => value.parse().ok()?,
                None => 0,
            },
            unit: parse_unit(&self.deferred_unit)?,
        };
        let origin_date = match non_empty(&self.origin_date) {
            Some(value) => Some(NaiveDate::parse_from_str(value, DATE_FORMAT).ok()?),
            None => None,
        };

        Some(LoanRequest {
            loan: self.loan.trim().to_string(),
            params: LoanParameters {
                principal,
                annual_rate_percent,
                term,
                deferral,
                origin_date,
            },
        })
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn parse_unit(field: &Option<String>) -> Option<PeriodUnit> {
    PeriodUnit::from_str(non_empty(field).unwrap_or("")).ok()
}
