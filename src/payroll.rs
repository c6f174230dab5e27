//! Payroll generation and compensation calculation.
//!
//! A period is resolved once per `(start, end)` pair. Creating it generates one
//! [`payroll_item`](crate::entity::payroll_item) per eligible employee, each with
//! its standard deductions, an optional performance bonus, and reconciled totals.
//! Every amount is a [`rust_decimal::Decimal`].

mod aggregate;
mod bonus;
mod deduction;
mod kpi;
mod payslip;
mod period;
mod salary;
mod working_days;

use sea_orm::{DbErr, SqlErr};

pub use kpi::{KpiAchievementRecorder, KpiObservation};
pub use payslip::ItemDetail;
pub use period::PeriodResolver;
pub use salary::{NewSalaryStructure, SalaryResolver, SalaryStructureWriter};

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
