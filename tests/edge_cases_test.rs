//! Property and edge case tests for the amortization engine.
//!
//! Exercises the public library API across a spread of loan terms.

use amortization_engine::{
    compute, AmortizationRow, AmortizationSchedule, Duration, LoanParameters, Money, Phase,
};
use chrono::NaiveDate;
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

fn origin() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
}

/// (principal, annual rate %, term months, deferred months)
fn cases() -> Vec<(Decimal, Decimal, i64, i64)> {
    vec![
        (dec!(5000000), dec!(12), 24, 0),
        (dec!(5000000), dec!(12), 24, 3),
        (dec!(1000000), dec!(10), 13, 2),
        (dec!(250000), dec!(7.5), 36, 6),
        (dec!(1200000), dec!(0), 12, 0),
        (dec!(80000000), dec!(4.25), 240, 12),
        (dec!(999), dec!(19.9), 7, 1),
        (dec!(15000), dec!(3), 1, 0),
    ]
}

fn amortizing(rows: &[AmortizationRow]) -> Vec<&AmortizationRow> {
    rows.iter().filter(|r| r.phase == Phase::Amortizing).collect()
}

fn capitalized(principal: Decimal, rate: Decimal, deferred: i64) -> Decimal {
    let growth = Decimal::ONE + rate / dec!(100) / dec!(12);
    principal * growth.powu(deferred as u64)
}

// ==================== CORE PROPERTIES ====================

#[test]
fn test_identical_inputs_give_identical_schedules() {
    for (p, r, t, d) in cases() {
        assert_eq!(compute(p, r, t, d, origin()), compute(p, r, t, d, origin()));
    }
}

#[test]
fn test_row_count_and_periods() {
    for (p, r, t, d) in cases() {
        let rows = compute(p, r, t, d, origin());
        assert_eq!(rows.len() as i64, t);

        let periods: Vec<u32> = rows.iter().map(|row| row.period).collect();
        let expected: Vec<u32> = (1..=t as u32).collect();
        assert_eq!(periods, expected);

        let deferred = rows.iter().take_while(|row| row.phase == Phase::Deferred).count();
        assert_eq!(deferred as i64, d);
        assert!(rows[deferred..].iter().all(|row| row.phase == Phase::Amortizing));
    }
}

#[test]
fn test_amortizing_balance_never_increases_and_ends_at_zero() {
    for (p, r, t, d) in cases() {
        let rows = compute(p, r, t, d, origin());
        let balances: Vec<Money> = rows.iter().map(|row| row.remaining_balance).collect();

        let start = d as usize;
        for pair in balances[start..].windows(2) {
            assert!(pair[0] >= pair[1], "balance rose for {:?}: {:?}", (p, r, t, d), pair);
        }
        if start > 0 {
            assert!(balances[start - 1] >= balances[start]);
        }
        assert!(balances.last().unwrap().is_zero());
        assert!(balances.iter().all(|b| *b >= Money::ZERO));
    }
}

#[test]
fn test_without_deferral_whole_schedule_is_non_increasing() {
    let rows = compute(dec!(5000000), dec!(12), 24, 0, origin());
    assert!(rows
        .windows(2)
        .all(|pair| pair[0].remaining_balance >= pair[1].remaining_balance));
    assert!(rows[0].remaining_balance < Money::round(dec!(5000000)));
}

#[test]
fn test_payment_constant_across_amortizing_rows() {
    for (p, r, t, d) in cases() {
        let rows = compute(p, r, t, d, origin());
        let amortizing = amortizing(&rows);
        let payment = amortizing[0].payment;
        assert!(amortizing.iter().all(|row| row.payment == payment));
        let (last, earlier) = amortizing.split_last().unwrap();
        assert!(earlier
            .iter()
            .all(|row| row.principal_portion + row.interest_portion == row.payment));
        assert!(last.principal_portion + last.interest_portion <= last.payment);
    }
}

#[test]
fn test_principal_repaid_matches_capitalized_principal() {
    for (p, r, t, d) in cases() {
        let rows = compute(p, r, t, d, origin());
        let repaid: Money = amortizing(&rows).iter().map(|row| row.principal_portion).sum();

        let drift = (repaid.as_decimal() - capitalized(p, r, d)).abs();
        assert!(
            drift <= Decimal::from(rows.len()),
            "drift {} over {} rows for {:?}",
            drift,
            rows.len(),
            (p, r, t, d)
        );
    }
}

// ==================== DEFERRED PHASE ====================

#[test]
fn test_deferral_counts_against_term() {
    // A 24-month term with 3 months of grace: 3 deferred rows, then 21 paying rows.
    let rows = compute(dec!(5000000), dec!(12), 24, 3, origin());

    assert_eq!(rows.len(), 24);
    assert_eq!(rows.iter().filter(|r| r.phase == Phase::Deferred).count(), 3);
    assert_eq!(amortizing(&rows).len(), 21);
    assert_eq!(rows[23].period, 24);
    assert_eq!(rows[23].due_date, NaiveDate::from_ymd_opt(2026, 1, 15).unwrap());
}

#[test]
fn test_deferred_rows_collect_nothing() {
    let rows = compute(dec!(5000000), dec!(12), 24, 3, origin());

    for row in &rows[..3] {
        assert!(row.payment.is_zero());
        assert!(row.principal_portion.is_zero());
    }
    assert!(rows[0].interest_portion < rows[1].interest_portion);
    assert!(rows[1].interest_portion < rows[2].interest_portion);
}

#[test]
fn test_deferral_raises_the_installment() {
    let plain = compute(dec!(5000000), dec!(12), 24, 0, origin());
    let deferred = compute(dec!(5000000), dec!(12), 24, 3, origin());

    assert!(deferred[3].payment > plain[0].payment);
    assert!(capitalized(dec!(5000000), dec!(12), 3) > dec!(5000000));
}

#[test]
fn test_deferred_interest_compounds_on_original_principal() {
    let rows = compute(dec!(1000000), dec!(10), 13, 2, origin());

    assert_eq!(rows[0].interest_portion.to_string(), "8333");
    assert_eq!(rows[0].remaining_balance.to_string(), "1008333");
    assert_eq!(rows[1].interest_portion.to_string(), "8403");
    assert_eq!(rows[1].remaining_balance.to_string(), "1016736");
}

// ==================== DEGENERATE INPUTS ====================

#[test]
fn test_zero_term_is_empty() {
    assert!(compute(dec!(1000000), dec!(10), 0, 0, origin()).is_empty());
}

#[test]
fn test_deferral_consuming_term_is_empty() {
    assert!(compute(dec!(1000000), dec!(10), 6, 6, origin()).is_empty());
    assert!(compute(dec!(1000000), dec!(10), 6, 7, origin()).is_empty());
}

#[test]
fn test_zero_principal_is_empty() {
    assert!(compute(dec!(0), dec!(10), 12, 0, origin()).is_empty());
}

#[test]
fn test_empty_schedule_summary() {
    let params = LoanParameters::new(dec!(1000000), dec!(10), 6).with_deferral(Duration::months(6));
    let schedule = AmortizationSchedule::from_parameters(&params, origin());

    assert!(schedule.is_empty());
    let summary = schedule.summary();
    assert!(summary.monthly_payment.is_zero());
    assert!(summary.total_interest.is_zero());
}

#[test]
fn test_oversized_terms_are_empty() {
    assert!(compute(dec!(1000), dec!(12), 4_000_000_000, 0, origin()).is_empty());

    let params = LoanParameters::new(dec!(1000), dec!(12), 0).with_term(Duration::weeks(i64::MAX));
    assert!(AmortizationSchedule::from_parameters(&params, origin()).is_empty());
}

#[test]
fn test_tiny_principal_repays_at_most_what_is_owed() {
    let rows = compute(dec!(3), dec!(600), 10, 2, origin());
    let repaid: Money = amortizing(&rows).iter().map(|r| r.principal_portion).sum();

    let drift = (repaid.as_decimal() - capitalized(dec!(3), dec!(600), 2)).abs();
    assert!(drift <= Decimal::from(rows.len()));
    assert!(rows.last().unwrap().remaining_balance.is_zero());
}

// ==================== ZERO RATE ====================

#[test]
fn test_zero_rate_even_split() {
    let rows = compute(dec!(1200000), dec!(0), 12, 0, origin());

    assert_eq!(rows.len(), 12);
    assert!(rows.iter().all(|r| r.payment.to_string() == "100000"));
    assert!(rows.iter().all(|r| r.interest_portion.is_zero()));
    assert!(rows[11].remaining_balance.is_zero());
}

#[test]
fn test_zero_rate_uneven_split_still_closes() {
    let rows = compute(dec!(120000), dec!(0), 13, 0, origin());

    assert_eq!(rows.len(), 13);
    assert!(rows.iter().all(|r| r.payment.to_string() == "9231"));
    assert!(rows[12].remaining_balance.is_zero());
}

// ==================== UNIT NORMALIZATION ====================

#[test]
fn test_week_term_normalizes_to_months() {
    let params = LoanParameters::new(dec!(500000), dec!(9), 0)
        .with_term(Duration::weeks(52))
        .with_origin(origin());
    let schedule = AmortizationSchedule::from_parameters(&params, origin());

    assert_eq!(schedule.len(), 13);
}

#[test]
fn test_week_deferral_normalizes_to_months() {
    let params = LoanParameters::new(dec!(500000), dec!(9), 12).with_deferral(Duration::weeks(5));
    let schedule = AmortizationSchedule::from_parameters(&params, origin());

    assert_eq!(schedule.deferred_rows().count(), 2);
    assert_eq!(schedule.amortizing_rows().count(), 10);
}

// ==================== SUMMARY ====================

#[test]
fn test_summary_matches_rows() {
    let params = LoanParameters::new(dec!(5000000), dec!(12), 24)
        .with_deferral(Duration::months(3))
        .with_origin(origin());
    let schedule = AmortizationSchedule::from_parameters(&params, NaiveDate::MIN);
    let summary = schedule.summary();

    let interest: Money = schedule.rows().iter().map(|r| r.interest_portion).sum();
    assert_eq!(summary.total_interest, interest);
    assert_eq!(summary.total_cost, Money::round(dec!(5000000)) + interest);
    assert_eq!(summary.monthly_payment.to_string(), "273188");
    assert_eq!(summary.capitalized_interest.to_string(), "151505");
    assert_eq!(summary.first_due_date, NaiveDate::from_ymd_opt(2024, 2, 15));
    assert_eq!(summary.last_due_date, NaiveDate::from_ymd_opt(2026, 1, 15));
}
