//! CSV batch adapter around the engine.
//!
//! Reads loan requests in streaming fashion, schedules each one, and writes
//! either the full schedules or one summary line per loan.

use crate::error::Result;
use crate::params::{LoanRecord, LoanRequest};
use crate::schedule::AmortizationSchedule;
use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim};
use log::{debug, warn};
use std::io::{Read, Write};

/// Batch of scheduled loans.
///
/// Loans are kept in input order so output is reproducible for a given input
/// file and `today`.
pub struct ScheduleBatch {
    /// Origin date for requests that do not carry one.
    today: NaiveDate,

    /// Parsed requests and their schedules, in input order.
    loans: Vec<(LoanRequest, AmortizationSchedule)>,
}

impl ScheduleBatch {
    /// Creates an empty batch. `today` stands in for missing origin dates.
    pub fn new(today: NaiveDate) -> Self {
        ScheduleBatch {
            today,
            loans: Vec::new(),
        }
    }

    /// Processes loan requests from a CSV reader.
    ///
    /// Records are read one at a time. Malformed records are logged at warn
    /// level and skipped. Loans whose terms yield no schedule are kept with an
    /// empty one and logged.
    pub fn process_csv<R: Read>(&mut self, reader: R) -> Result<()> {
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        for (row_idx, result) in csv_reader.deserialize::<LoanRecord>().enumerate() {
            let row_num = row_idx + 2; // 1-indexed, accounting for header row

            match result {
                Ok(record) => match record.parse() {
                    Some(request) => self.schedule(request, row_num),
                    None => warn!("Row {}: Failed to parse loan record", row_num),
                },
                Err(e) => {
                    warn!("Row {}: CSV parse error: {}", row_num, e);
                }
            }
        }

        Ok(())
    }

    /// Schedules a single parsed request.
    pub fn schedule(&mut self, request: LoanRequest, row: usize) {
        let schedule = AmortizationSchedule::from_parameters(&request.params, self.today);

        if schedule.is_empty() {
            warn!(
                "Row {}: Loan {} has insufficient or invalid terms, schedule is empty",
                row, request.loan
            );
        } else {
            debug!(
                "Row {}: Scheduled loan {} over {} months",
                row,
                request.loan,
                schedule.len()
            );
        }

        self.loans.push((request, schedule));
    }

    /// Scheduled loans in input order.
    pub fn loans(&self) -> &[(LoanRequest, AmortizationSchedule)] {
        &self.loans
    }

    /// Writes every schedule row to CSV.
    ///
    /// Loans with an empty schedule contribute no rows.
    pub fn write_schedules<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "loan",
            "period",
            "due_date",
            "phase",
            "payment",
            "principal",
            "interest",
            "remaining_balance",
        ])?;

        for (request, schedule) in &self.loans {
            for row in schedule.rows() {
                csv_writer.write_record([
                    request.loan.clone(),
                    row.period.to_string(),
                    row.due_date.to_string(),
                    row.phase.to_string(),
                    row.payment.to_string(),
                    row.principal_portion.to_string(),
                    row.interest_portion.to_string(),
                    row.remaining_balance.to_string(),
                ])?;
            }
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Writes one summary line per loan, empty schedules included.
    pub fn write_summaries<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "loan",
            "rows",
            "monthly_payment",
            "total_interest",
            "total_cost",
            "capitalized_interest",
            "first_due_date",
            "last_due_date",
        ])?;

        for (request, schedule) in &self.loans {
            let summary = schedule.summary();
            csv_writer.write_record([
                request.loan.clone(),
                schedule.len().to_string(),
                summary.monthly_payment.to_string(),
                summary.total_interest.to_string(),
                summary.total_cost.to_string(),
                summary.capitalized_interest.to_string(),
                format_date(summary.first_due_date),
                format_date(summary.last_due_date),
            ])?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_default()
}
