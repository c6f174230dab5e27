use chrono::{Days, Local, NaiveDate};
use rust_decimal::Decimal;
use sea_orm::{ActiveValue::{Set, Unchanged}, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{entity::{prelude::*, salary_structure}, error::PayrollError, utils};

use super::is_unique_violation;

impl salary_structure::Model {
    pub fn total_allowances(&self) -> Decimal {
        self.housing_allowance + self.transport_allowance + self.meal_allowance
    }

    /// Basic salary plus every allowance. Bonuses are never part of gross pay
    pub fn gross_salary(&self) -> Decimal {
        self.basic_salary + self.total_allowances()
    }

    pub fn interval(&self) -> SalaryInterval {
        SalaryInterval {
            start: self.effective_date,
            end: self.end_date,
        }
    }
}

/// Effective window of a salary structure. `end` is inclusive, `None` is open ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SalaryInterval {
    pub start: NaiveDate,
    pub end: Option<NaiveDate>,
}

impl SalaryInterval {
    pub fn overlaps(&self, other: &SalaryInterval) -> bool {
        let ends_before = |a: &SalaryInterval, b: &SalaryInterval| a.end.is_some_and(|end| end < b.start);

        !ends_before(self, other) && !ends_before(other, self)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSalaryStructure {
    pub basic_salary: Decimal,
    #[serde(default)]
    pub housing_allowance: Decimal,
    #[serde(default)]
    pub transport_allowance: Decimal,
    #[serde(default)]
    pub meal_allowance: Decimal,
    pub effective_date: NaiveDate,
}

impl NewSalaryStructure {
    /// Every amount must be non-negative and fit a money column
    fn validate(&self) -> Result<(), PayrollError> {
        utils::validate_amount("basic_salary", self.basic_salary, false)?;
        utils::validate_amount("housing_allowance", self.housing_allowance, false)?;
        utils::validate_amount("transport_allowance", self.transport_allowance, false)?;
        utils::validate_amount("meal_allowance", self.meal_allowance, false)?;

        utils::validate_amount("gross_salary", self.basic_salary + self.housing_allowance + self.transport_allowance + self.meal_allowance, false)?;

        Ok(())
    }
}

pub struct SalaryResolver;

impl SalaryResolver {
    /// Salary structure in force for `employee_id` on `as_of`.
    ///
    /// Overlapping rows are rejected on write, but should any exist the most
    /// recently effective one wins.
    #[instrument(skip(db))]
    pub async fn resolve<C: ConnectionTrait>(db: &C, employee_id: Uuid, as_of: NaiveDate) -> Result<Option<salary_structure::Model>, PayrollError> {
        let structure = SalaryStructure::find()
            .filter(salary_structure::Column::EmployeeId.eq(employee_id))
            .filter(salary_structure::Column::EffectiveDate.lte(as_of))
            .filter(Condition::any()
                .add(salary_structure::Column::EndDate.is_null())
                .add(salary_structure::Column::EndDate.gte(as_of)))
            .order_by_desc(salary_structure::Column::EffectiveDate)
            .order_by_desc(salary_structure::Column::CreatedAt)
            .one(db).await?;

        Ok(structure)
    }
}

/// What has to change for a new current structure effective on a given date
#[derive(Debug, PartialEq, Eq)]
struct AssignmentPlan {
    /// Current structure to close, and its new end date
    close: Option<(Uuid, NaiveDate)>,
}

fn plan_assignment(employee_id: Uuid, existing: &[salary_structure::Model], effective_date: NaiveDate) -> Result<AssignmentPlan, PayrollError> {
    let overlapping = || PayrollError::OverlappingSalaryStructure { employee_id, effective_date };

    let current = existing.iter().find(|s| s.is_current && s.end_date.is_none());

    let close = match current {
        Some(current) => {
            if effective_date <= current.effective_date {
                return Err(overlapping());
            }

            let end = effective_date.checked_sub_days(Days::new(1)).ok_or_else(overlapping)?;
            Some((current.id, end))
        },
        None => None,
    };

    let new = SalaryInterval { start: effective_date, end: None };

    let conflict = existing.iter()
        .filter(|s| Some(s.id) != close.map(|(id, _)| id))
        .any(|s| s.interval().overlaps(&new));

    if conflict {
        return Err(overlapping());
    }

    Ok(AssignmentPlan { close })
}

pub struct SalaryStructureWriter;

impl SalaryStructureWriter {
    /// Makes `new` the employee's current salary structure.
    ///
    /// The previous current row is end-dated to the day before `new` takes
    /// effect. Fails without writing anything if the new window would overlap
    /// any other structure of the employee.
    #[instrument(skip(db, new), fields(effective_date = %new.effective_date))]
    pub async fn assign(db: &DatabaseConnection, employee_id: Uuid, new: NewSalaryStructure, actor: Uuid) -> Result<salary_structure::Model, PayrollError> {
        new.validate()?;

        let txn = db.begin().await?;

        // Serialises concurrent assignments for the same employee
        if User::find_by_id(employee_id).lock_exclusive().one(&txn).await?.is_none() {
            return Err(PayrollError::EmployeeNotFound(employee_id));
        }

        let existing = SalaryStructure::find()
            .filter(salary_structure::Column::EmployeeId.eq(employee_id))
            .all(&txn).await?;

        let plan = plan_assignment(employee_id, &existing, new.effective_date)?;
        let now = Local::now().fixed_offset();

        if let Some((current_id, end_date)) = plan.close {
            SalaryStructure::update(salary_structure::ActiveModel {
                id: Unchanged(current_id),
                end_date: Set(Some(end_date)),
                is_current: Set(false),
                updated_at: Set(now),
                updated_by: Set(Some(actor)),
                ..Default::default()
            }).exec(&txn).await?;

            info!(%current_id, %end_date, "Closed previous salary structure");
        }

        let structure = SalaryStructure::insert(salary_structure::ActiveModel {
            created_at: Set(now),
            updated_at: Set(now),
            created_by: Set(Some(actor)),
            updated_by: Set(Some(actor)),
            employee_id: Set(employee_id),
            basic_salary: Set(new.basic_salary),
            housing_allowance: Set(new.housing_allowance),
            transport_allowance: Set(new.transport_allowance),
            meal_allowance: Set(new.meal_allowance),
            effective_date: Set(new.effective_date),
            end_date: Set(None),
            is_current: Set(true),
            ..Default::default()
        })
            .exec_with_returning(&txn).await
            .map_err(|err| if is_unique_violation(&err) {
                PayrollError::OverlappingSalaryStructure { employee_id, effective_date: new.effective_date }
            } else {
                err.into()
            })?;

        txn.commit().await?;

        info!(structure_id = %structure.id, "Assigned salary structure");

        Ok(structure)
    }
}
