//! # Amortization Engine
//!
//! Turns loan terms (principal, nominal annual rate, term, optional grace
//! period) into a deterministic month-by-month repayment schedule.
//!
//! ## Design Principles
//!
//! - **Pure and total**: [`compute`] has no I/O, no clock, and never fails;
//!   invalid terms produce an empty schedule
//! - **Decimal arithmetic**: full-precision `rust_decimal` internally, rounded
//!   to whole currency units only when a row is emitted
//! - **Moratorium semantics**: during the grace period nothing is collected and
//!   interest capitalizes into the balance
//! - **Fixed installment**: one rounded payment shared by every amortizing row
//!
//! ## Example
//!
//! ```
//! use amortization_engine::{AmortizationSchedule, Duration, LoanParameters};
//! use chrono::NaiveDate;
//! use rust_decimal_macros::dec;
//!
//! let today = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
//! let params = LoanParameters::new(dec!(5000000), dec!(12), 24)
//!     .with_deferral(Duration::months(3));
//!
//! let schedule = AmortizationSchedule::from_parameters(&params, today);
//! assert_eq!(schedule.len(), 24);
//! assert!(schedule.summary().monthly_payment.as_decimal() > dec!(235367));
//! ```

pub mod batch;
pub mod engine;
pub mod error;
pub mod money;
pub mod params;
pub mod period;
pub mod schedule;

pub use batch::ScheduleBatch;
pub use engine::{compute, MAX_TERM_MONTHS};
pub use error::{EngineError, Result};
pub use money::Money;
pub use params::{LoanParameters, LoanRecord, LoanRequest};
pub use period::{Duration, PeriodUnit};
pub use schedule::{AmortizationRow, AmortizationSchedule, Phase, ScheduleSummary};
