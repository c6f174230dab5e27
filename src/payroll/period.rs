use std::collections::HashSet;

use chrono::{DateTime, FixedOffset, Local, NaiveDate};
use rust_decimal::Decimal;
use sea_orm::{ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, TransactionTrait};
use serde::Serialize;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::{
    entity::{payroll_item, payroll_period, prelude::*, salary_structure, sea_orm_active_enums::PeriodStatus, user},
    error::PayrollError,
    utils,
};

use super::{
    is_unique_violation,
    aggregate::PayrollItemAggregator,
    bonus::PerformanceBonusGenerator,
    deduction::StandardDeductionGenerator,
    salary::SalaryResolver,
    working_days::{WorkingDays, WorkingDaysCalculator},
};

#[derive(Debug, Serialize)]
pub struct PeriodResolution {
    pub period: payroll_period::Model,
    /// `false` when the period already existed and nothing was generated
    pub created: bool,
    pub report: GenerationReport,
}

#[derive(Debug, Default, Serialize)]
pub struct GenerationReport {
    pub generated: Vec<Uuid>,
    /// Employees whose item was written by a concurrent request
    pub existing: Vec<Uuid>,
    /// Employees without a salary structure effective at the end of the period
    pub skipped: Vec<Uuid>,
    pub failed: Vec<FailedEmployee>,
}

#[derive(Debug, Serialize)]
pub struct FailedEmployee {
    pub employee_id: Uuid,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodAction {
    Approve,
    Release,
}

impl PeriodAction {
    fn as_str(&self) -> &'static str {
        match self {
            PeriodAction::Approve => "approve",
            PeriodAction::Release => "release",
        }
    }

    /// `processing -> approved -> paid`, nothing else
    pub fn next(self, from: PeriodStatus) -> Result<PeriodStatus, PayrollError> {
        match (self, from) {
            (PeriodAction::Approve, PeriodStatus::Processing) => Ok(PeriodStatus::Approved),
            (PeriodAction::Release, PeriodStatus::Approved) => Ok(PeriodStatus::Paid),
            _ => Err(PayrollError::InvalidTransition { from, action: self.as_str() }),
        }
    }
}

/// Hired by the end of the period, and not terminated on or before it
fn is_eligible(employee: &user::Model, period_end: NaiveDate) -> bool {
    employee.hire_date <= period_end
        && employee.termination_date.is_none_or(|terminated| terminated > period_end)
}

fn skeleton_item(
    period: &payroll_period::Model,
    salary: &salary_structure::Model,
    days: WorkingDays,
    now: DateTime<FixedOffset>,
) -> payroll_item::ActiveModel {
    let gross = salary.gross_salary();

    payroll_item::ActiveModel {
        created_at: Set(now),
        updated_at: Set(now),
        payroll_period_id: Set(period.id),
        employee_id: Set(salary.employee_id),
        salary_structure_id: Set(salary.id),
        basic_salary: Set(salary.basic_salary),
        total_allowances: Set(salary.total_allowances()),
        total_deductions: Set(Decimal::ZERO),
        total_bonuses: Set(Decimal::ZERO),
        gross_salary: Set(gross),
        net_salary: Set(gross),
        working_days: Set(days.working),
        leave_days: Set(days.leave),
        absent_days: Set(days.absent),
        ..Default::default()
    }
}

pub struct PeriodResolver;

impl PeriodResolver {
    /// Returns the period for exactly `[start, end]`, creating it and generating
    /// its payroll items on first request.
    ///
    /// An existing period is returned untouched. Losing a creation race to a
    /// concurrent request is not an error, the winner's row is returned.
    #[instrument(skip(db))]
    pub async fn resolve(db: &DatabaseConnection, start: NaiveDate, end: NaiveDate, actor: Uuid) -> Result<PeriodResolution, PayrollError> {
        if end < start {
            return Err(PayrollError::InvalidDateRange { start, end });
        }

        if let Some(period) = Self::find(db, start, end).await? {
            return Self::resume(db, period).await;
        }

        let period = match Self::create(db, start, end, actor).await {
            Ok(period) => period,
            Err(PayrollError::DuplicatePeriod { .. }) => {
                info!("Period created concurrently, re-reading");

                let period = Self::find(db, start, end).await?
                    .ok_or(PayrollError::DuplicatePeriod { start, end })?;

                return Ok(PeriodResolution { period, created: false, report: GenerationReport::default() });
            },
            Err(err) => return Err(err),
        };

        info!(period_id = %period.id, reference = %period.reference, "Created payroll period");

        let report = Self::generate_items(db, &period).await?;

        Ok(PeriodResolution { period, created: true, report })
    }

    /// An existing period still in `processing` gets the items an interrupted
    /// generation left out. Employees that already have one are not touched
    async fn resume(db: &DatabaseConnection, period: payroll_period::Model) -> Result<PeriodResolution, PayrollError> {
        if period.status != PeriodStatus::Processing {
            return Ok(PeriodResolution { period, created: false, report: GenerationReport::default() });
        }

        let report = Self::generate_items(db, &period).await?;

        if !report.generated.is_empty() {
            warn!(period_id = %period.id, generated = report.generated.len(), "Resumed interrupted payroll generation");
        }

        Ok(PeriodResolution { period, created: false, report })
    }

    async fn find<C: ConnectionTrait>(db: &C, start: NaiveDate, end: NaiveDate) -> Result<Option<payroll_period::Model>, PayrollError> {
        let period = PayrollPeriod::find()
            .filter(payroll_period::Column::StartDate.eq(start))
            .filter(payroll_period::Column::EndDate.eq(end))
            .one(db).await?;

        Ok(period)
    }

    async fn create<C: ConnectionTrait>(db: &C, start: NaiveDate, end: NaiveDate, actor: Uuid) -> Result<payroll_period::Model, PayrollError> {
        let now = Local::now().fixed_offset();

        PayrollPeriod::insert(payroll_period::ActiveModel {
            created_at: Set(now),
            updated_at: Set(now),
            created_by: Set(Some(actor)),
            updated_by: Set(Some(actor)),
            reference: Set(utils::period_reference(start)),
            start_date: Set(start),
            end_date: Set(end),
            payment_date: Set(end),
            status: Set(PeriodStatus::Processing),
            approved_by: Set(None),
            approved_at: Set(None),
            ..Default::default()
        })
            .exec_with_returning(db).await
            .map_err(|err| if is_unique_violation(&err) {
                PayrollError::DuplicatePeriod { start, end }
            } else {
                err.into()
            })
    }

    /// Generates the items of every eligible employee that has none yet. A
    /// failing employee is reported and does not stop the others
    #[instrument(skip_all, fields(period_id = %period.id))]
    pub async fn generate_items(db: &DatabaseConnection, period: &payroll_period::Model) -> Result<GenerationReport, PayrollError> {
        let covered = PayrollItem::find()
            .filter(payroll_item::Column::PayrollPeriodId.eq(period.id))
            .all(db).await?
            .into_iter()
            .map(|item| item.employee_id)
            .collect::<HashSet<_>>();

        let employees = User::find()
            .filter(user::Column::HireDate.lte(period.end_date))
            .order_by_asc(user::Column::HireDate)
            .all(db).await?;

        let mut report = GenerationReport::default();

        let pending = employees.iter()
            .filter(|employee| is_eligible(employee, period.end_date))
            .filter(|employee| !covered.contains(&employee.id));

        for employee in pending {
            match Self::generate_for_employee(db, period, employee).await {
                Ok(item) => {
                    info!(employee_id = %employee.id, item_id = %item.id, net_salary = %item.net_salary, "Generated payroll item");
                    report.generated.push(employee.id);
                },
                Err(PayrollError::NoApplicableSalary { employee_id, as_of }) => {
                    warn!(%employee_id, %as_of, "No applicable salary structure, skipping");
                    report.skipped.push(employee_id);
                },
                Err(PayrollError::DuplicateItem { employee_id, .. }) => {
                    info!(%employee_id, "Payroll item already exists");
                    report.existing.push(employee_id);
                },
                Err(err) => {
                    error!(employee_id = %employee.id, %err, "Failed to generate payroll item");
                    report.failed.push(FailedEmployee {
                        employee_id: employee.id,
                        reason: err.to_string(),
                    });
                },
            }
        }

        info!(
            generated = report.generated.len(),
            existing = report.existing.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "Payroll generation finished"
        );

        Ok(report)
    }

    /// Item, deduction lines, bonus line and totals for one employee, all in one
    /// transaction
    async fn generate_for_employee(db: &DatabaseConnection, period: &payroll_period::Model, employee: &user::Model) -> Result<payroll_item::Model, PayrollError> {
        let Some(salary) = SalaryResolver::resolve(db, employee.id, period.end_date).await? else {
            return Err(PayrollError::NoApplicableSalary { employee_id: employee.id, as_of: period.end_date });
        };

        let now = Local::now().fixed_offset();
        let txn = db.begin().await?;

        let days = WorkingDaysCalculator::count(&txn, employee.id, period.start_date, period.end_date).await?;

        let item = PayrollItem::insert(skeleton_item(period, &salary, days, now))
            .exec_with_returning(&txn).await
            .map_err(|err| if is_unique_violation(&err) {
                PayrollError::DuplicateItem { period_id: period.id, employee_id: employee.id }
            } else {
                err.into()
            })?;

        let deductions = StandardDeductionGenerator::generate(&item)
            .into_iter()
            .map(|line| line.into_active_model(item.id, now));

        Deduction::insert_many(deductions)
            .exec_without_returning(&txn).await?;

        if let Some(bonus) = PerformanceBonusGenerator::generate(&txn, &item, period).await? {
            Bonus::insert(bonus.into_active_model(item.id, now))
                .exec_without_returning(&txn).await?;
        }

        let item = PayrollItemAggregator::finalize(&txn, &item).await?;

        txn.commit().await?;

        Ok(item)
    }

    pub async fn approve<C: ConnectionTrait>(db: &C, period_id: Uuid, actor: Uuid) -> Result<payroll_period::Model, PayrollError> {
        Self::transition(db, period_id, PeriodAction::Approve, actor).await
    }

    pub async fn release<C: ConnectionTrait>(db: &C, period_id: Uuid, actor: Uuid) -> Result<payroll_period::Model, PayrollError> {
        Self::transition(db, period_id, PeriodAction::Release, actor).await
    }

    /// Applies `action` only if the period is still in the status it was read
    /// with, so racing transitions cannot both succeed
    #[instrument(skip(db))]
    async fn transition<C: ConnectionTrait>(db: &C, period_id: Uuid, action: PeriodAction, actor: Uuid) -> Result<payroll_period::Model, PayrollError> {
        let Some(period) = PayrollPeriod::find_by_id(period_id).one(db).await? else {
            return Err(PayrollError::PeriodNotFound(period_id));
        };

        let status = action.next(period.status)?;
        let now = Local::now().fixed_offset();

        let mut changes = payroll_period::ActiveModel {
            status: Set(status),
            updated_at: Set(now),
            updated_by: Set(Some(actor)),
            ..Default::default()
        };

        if action == PeriodAction::Approve {
            changes.approved_by = Set(Some(actor));
            changes.approved_at = Set(Some(now));
        }

        let result = PayrollPeriod::update_many()
            .set(changes)
            .filter(payroll_period::Column::Id.eq(period_id))
            .filter(payroll_period::Column::Status.eq(period.status))
            .exec(db).await?;

        let Some(updated) = PayrollPeriod::find_by_id(period_id).one(db).await? else {
            return Err(PayrollError::PeriodNotFound(period_id));
        };

        if result.rows_affected == 0 {
            return Err(PayrollError::InvalidTransition { from: updated.status, action: action.as_str() });
        }

        info!(from = ?period.status, to = ?updated.status, "Payroll period transitioned");

        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult, Value};

    use crate::{
        entity::{bonus, deduction, kpi_record, leave_request, sea_orm_active_enums::RoleType},
        fixtures::{self, date},
    };

    use super::*;

    fn employee(hire_date: NaiveDate, termination_date: Option<NaiveDate>) -> user::Model {
        user::Model {
            hire_date,
            termination_date,
            ..fixtures::user(RoleType::Employee)
        }
    }

    #[test]
    fn test_transitions() {
        use PeriodStatus::*;

        assert_eq!(PeriodAction::Approve.next(Processing).unwrap(), Approved);
        assert_eq!(PeriodAction::Release.next(Approved).unwrap(), Paid);

        for (action, from) in [
            (PeriodAction::Approve, Approved),
            (PeriodAction::Approve, Paid),
            (PeriodAction::Release, Processing),
            (PeriodAction::Release, Paid),
        ] {
            let err = action.next(from).unwrap_err();
            assert!(matches!(err, PayrollError::InvalidTransition { from: f, .. } if f == from));
        }
    }

    #[test]
    fn test_eligibility() {
        let end = date(2024, 6, 30);

        assert!(is_eligible(&employee(date(2024, 6, 30), None), end));
        assert!(is_eligible(&employee(date(2020, 1, 1), Some(date(2024, 7, 1))), end));

        assert!(!is_eligible(&employee(date(2024, 7, 1), None), end));
        assert!(!is_eligible(&employee(date(2020, 1, 1), Some(date(2024, 6, 30))), end));
        // Terminated after the period but hired after it too
        assert!(!is_eligible(&employee(date(2024, 7, 1), Some(date(2024, 8, 1))), end));
    }

    #[test]
    fn test_skeleton_item() {
        let period = fixtures::period(date(2024, 6, 1), date(2024, 6, 30), PeriodStatus::Processing);
        let salary = salary_structure::Model {
            housing_allowance: dec!(200),
            ..fixtures::salary(Uuid::new_v4(), dec!(1000), date(2024, 1, 1), None)
        };
        let days = WorkingDays { working: 19, leave: 1, absent: 0 };

        let item = skeleton_item(&period, &salary, days, Local::now().fixed_offset());

        assert_eq!(item.gross_salary, Set(dec!(1200)));
        assert_eq!(item.net_salary, Set(dec!(1200)));
        assert_eq!(item.total_allowances, Set(dec!(200)));
        assert_eq!(item.salary_structure_id, Set(salary.id));
        assert_eq!(item.working_days, Set(19));
        assert_eq!(item.leave_days, Set(1));
    }

    #[actix_web::test]
    async fn test_resolve_rejects_inverted_range() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let err = PeriodResolver::resolve(&db, date(2024, 6, 30), date(2024, 6, 1), Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, PayrollError::InvalidDateRange { .. }));
        assert!(db.into_transaction_log().is_empty());
    }

    #[actix_web::test]
    async fn test_resolve_existing_period_is_idempotent() {
        let period = fixtures::period(date(2024, 6, 1), date(2024, 6, 30), PeriodStatus::Approved);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                vec![ period.clone() ],
            ])
            .into_connection();

        let resolution = PeriodResolver::resolve(&db, period.start_date, period.end_date, Uuid::new_v4()).await.unwrap();
        assert!(!resolution.created);
        assert_eq!(resolution.period, period);
        assert!(resolution.report.generated.is_empty());
        assert_eq!(db.into_transaction_log().len(), 1);
    }

    #[actix_web::test]
    async fn test_resolve_creates_and_generates() {
        let actor = Uuid::new_v4();
        let period = fixtures::period(date(2024, 6, 1), date(2024, 6, 30), PeriodStatus::Processing);

        let paid = employee(date(2020, 1, 1), None);
        let unpaid = employee(date(2021, 1, 1), None);
        let terminated = employee(date(2019, 1, 1), Some(date(2024, 5, 31)));

        let salary = fixtures::salary(paid.id, dec!(1000), date(2024, 1, 1), None);
        let item = fixtures::item(period.id, paid.id, dec!(1000), Decimal::ZERO);

        let lines = StandardDeductionGenerator::generate(&item)
            .into_iter()
            .map(|line| deduction::Model {
                id: Uuid::new_v4(),
                created_at: Local::now().into(),
                updated_at: Local::now().into(),
                payroll_item_id: item.id,
                kind: line.kind,
                amount: line.amount,
                description: line.description,
            })
            .collect::<Vec<_>>();

        let finalized = payroll_item::Model {
            total_deductions: dec!(180.00),
            net_salary: dec!(820.00),
            ..item.clone()
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            // Lookup, then insert
            .append_query_results([
                Vec::<payroll_period::Model>::new(),
                vec![ period.clone() ],
            ])
            .append_query_results([
                Vec::<payroll_item::Model>::new(),
            ])
            .append_query_results([
                vec![ paid.clone(), unpaid.clone(), terminated.clone() ],
            ])
            // `paid`
            .append_query_results([
                vec![ salary ],
            ])
            .append_query_results([
                Vec::<leave_request::Model>::new(),
            ])
            .append_query_results([
                vec![ item.clone() ],
            ])
            .append_exec_results([
                MockExecResult { last_insert_id: 0, rows_affected: 3 },
            ])
            .append_query_results([
                Vec::<kpi_record::Model>::new(),
            ])
            .append_query_results([
                lines.clone(),
            ])
            .append_query_results([
                Vec::<bonus::Model>::new(),
            ])
            .append_query_results([
                vec![ finalized.clone() ],
            ])
            // `unpaid`
            .append_query_results([
                Vec::<salary_structure::Model>::new(),
            ])
            .into_connection();

        let resolution = PeriodResolver::resolve(&db, period.start_date, period.end_date, actor).await.unwrap();

        assert!(resolution.created);
        assert_eq!(resolution.period, period);
        assert_eq!(resolution.report.generated, vec![paid.id]);
        assert_eq!(resolution.report.skipped, vec![unpaid.id]);
        assert!(resolution.report.existing.is_empty());
        assert!(resolution.report.failed.is_empty());

        let log = db.into_transaction_log();

        // One item, for `paid` only
        assert_eq!(fixtures::count_statements(&log, r#"INSERT INTO "payroll_item""#), 1);

        let deducted = fixtures::bound_values(&log, r#"INSERT INTO "deduction""#);
        for amount in [dec!(100.00), dec!(50.00), dec!(30.00)] {
            assert!(deducted.contains(&fixtures::decimal(amount)));
        }
        for kind in ["tax", "pension", "health_insurance"] {
            assert!(deducted.contains(&fixtures::text(kind)));
        }

        // net = 1000 - 180 + 0
        let totals = fixtures::bound_values(&log, r#"UPDATE "payroll_item""#);
        assert!(totals.contains(&fixtures::decimal(dec!(180.00))));
        assert!(totals.contains(&fixtures::decimal(Decimal::ZERO)));
        assert!(totals.contains(&fixtures::decimal(dec!(820.00))));
    }

    #[actix_web::test]
    async fn test_resolve_resumes_interrupted_generation() {
        let actor = Uuid::new_v4();
        let period = fixtures::period(date(2024, 6, 1), date(2024, 6, 30), PeriodStatus::Processing);

        let done = employee(date(2020, 1, 1), None);
        let missing = employee(date(2021, 1, 1), None);

        let done_item = fixtures::item(period.id, done.id, dec!(1500), Decimal::ZERO);
        let salary = fixtures::salary(missing.id, dec!(1000), date(2024, 1, 1), None);
        let item = fixtures::item(period.id, missing.id, dec!(1000), Decimal::ZERO);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            // First call: the period is created, then reading its items fails
            .append_query_results([
                Vec::<payroll_period::Model>::new(),
                vec![ period.clone() ],
            ])
            .append_query_errors([
                DbErr::Custom("connection reset".to_owned()),
            ])
            // Second call finds the period with only one of its items
            .append_query_results([
                vec![ period.clone() ],
            ])
            .append_query_results([
                vec![ done_item ],
            ])
            .append_query_results([
                vec![ done.clone(), missing.clone() ],
            ])
            .append_query_results([
                vec![ salary ],
            ])
            .append_query_results([
                Vec::<leave_request::Model>::new(),
            ])
            .append_query_results([
                vec![ item.clone() ],
            ])
            .append_exec_results([
                MockExecResult { last_insert_id: 0, rows_affected: 3 },
            ])
            .append_query_results([
                Vec::<kpi_record::Model>::new(),
            ])
            .append_query_results([
                Vec::<deduction::Model>::new(),
            ])
            .append_query_results([
                Vec::<bonus::Model>::new(),
            ])
            .append_query_results([
                vec![ item.clone() ],
            ])
            .into_connection();

        let err = PeriodResolver::resolve(&db, period.start_date, period.end_date, actor).await.unwrap_err();
        assert!(matches!(err, PayrollError::Database(_)));

        let resolution = PeriodResolver::resolve(&db, period.start_date, period.end_date, actor).await.unwrap();
        assert!(!resolution.created);
        assert_eq!(resolution.report.generated, vec![missing.id]);
        assert!(resolution.report.existing.is_empty());
        assert!(resolution.report.failed.is_empty());

        let log = db.into_transaction_log();
        assert_eq!(fixtures::count_statements(&log, r#"INSERT INTO "payroll_period""#), 1);
        assert_eq!(fixtures::count_statements(&log, r#"INSERT INTO "payroll_item""#), 1);
        assert!(fixtures::bound_values(&log, r#"INSERT INTO "payroll_item""#)
            .contains(&Value::Uuid(Some(Box::new(missing.id)))));
    }

    #[actix_web::test]
    async fn test_resolve_complete_period_generates_nothing() {
        let period = fixtures::period(date(2024, 6, 1), date(2024, 6, 30), PeriodStatus::Processing);
        let staff = employee(date(2020, 1, 1), None);
        let item = fixtures::item(period.id, staff.id, dec!(1000), Decimal::ZERO);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                vec![ period.clone() ],
            ])
            .append_query_results([
                vec![ item ],
            ])
            .append_query_results([
                vec![ staff ],
            ])
            .into_connection();

        let resolution = PeriodResolver::resolve(&db, period.start_date, period.end_date, Uuid::new_v4()).await.unwrap();
        assert!(!resolution.created);
        assert!(resolution.report.generated.is_empty());
        assert!(resolution.report.existing.is_empty());

        // Lookups only
        let log = db.into_transaction_log();
        assert_eq!(log.len(), 3);
        assert!(log.iter().flat_map(|txn| txn.statements()).all(|stmt| stmt.sql.starts_with("SELECT")));
    }

    #[actix_web::test]
    async fn test_approve_paid_period_is_rejected() {
        let period = fixtures::period(date(2024, 6, 1), date(2024, 6, 30), PeriodStatus::Paid);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                vec![ period.clone() ],
            ])
            .into_connection();

        let err = PeriodResolver::approve(&db, period.id, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, PayrollError::InvalidTransition { from: PeriodStatus::Paid, action: "approve" }));

        // Only the lookup ran
        assert_eq!(db.into_transaction_log().len(), 1);
    }

    #[actix_web::test]
    async fn test_release_requires_approval() {
        let period = fixtures::period(date(2024, 6, 1), date(2024, 6, 30), PeriodStatus::Processing);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                vec![ period.clone() ],
            ])
            .into_connection();

        let err = PeriodResolver::release(&db, period.id, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, PayrollError::InvalidTransition { from: PeriodStatus::Processing, action: "release" }));
        assert_eq!(db.into_transaction_log().len(), 1);
    }

    #[actix_web::test]
    async fn test_approve() {
        let actor = Uuid::new_v4();
        let period = fixtures::period(date(2024, 6, 1), date(2024, 6, 30), PeriodStatus::Processing);
        let approved = payroll_period::Model {
            status: PeriodStatus::Approved,
            approved_by: Some(actor),
            approved_at: Some(Local::now().into()),
            ..period.clone()
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                vec![ period.clone() ],
                vec![ approved.clone() ],
            ])
            .append_exec_results([
                MockExecResult { last_insert_id: 0, rows_affected: 1 },
            ])
            .into_connection();

        let returned = PeriodResolver::approve(&db, period.id, actor).await.unwrap();
        assert_eq!(returned, approved);
    }

    #[actix_web::test]
    async fn test_lost_transition_race() {
        let period = fixtures::period(date(2024, 6, 1), date(2024, 6, 30), PeriodStatus::Processing);
        let approved_elsewhere = payroll_period::Model {
            status: PeriodStatus::Approved,
            ..period.clone()
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                vec![ period.clone() ],
                vec![ approved_elsewhere ],
            ])
            .append_exec_results([
                MockExecResult { last_insert_id: 0, rows_affected: 0 },
            ])
            .into_connection();

        let err = PeriodResolver::approve(&db, period.id, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, PayrollError::InvalidTransition { from: PeriodStatus::Approved, .. }));
    }

    #[actix_web::test]
    async fn test_missing_period() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                Vec::<payroll_period::Model>::new(),
            ])
            .into_connection();

        let err = PeriodResolver::release(&db, Uuid::new_v4(), Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, PayrollError::PeriodNotFound(_)));
    }
}
