use chrono::{Local, NaiveDate};
use rust_decimal::{prelude::ToPrimitive as _, Decimal, RoundingStrategy};
use sea_orm::{ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, TransactionTrait};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{consts::MAX_ACHIEVEMENT, entity::{kpi_assignment, kpi_record, prelude::*, sea_orm_active_enums::AssignmentStatus}, error::PayrollError, utils};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KpiObservation {
    pub actual_value: Decimal,
    pub record_date: NaiveDate,
    #[serde(default)]
    pub notes: Option<String>,
}

/// `actual / target` as a percentage within `[0, 100]`.
///
/// `None` when the ratio does not fit a `Decimal`. A zero target never reaches
/// this point.
fn achievement_percentage(actual: Decimal, target: Decimal) -> Option<Decimal> {
    let percentage = actual.checked_div(target)?
        .checked_mul(Decimal::ONE_HUNDRED)?
        .clamp(Decimal::ZERO, MAX_ACHIEVEMENT)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    Some(percentage)
}

/// `None` when the weighted points do not fit the `integer` column
fn points_earned(achievement: Decimal, points_value: i32, weight: Decimal) -> Option<i32> {
    (achievement / Decimal::ONE_HUNDRED)
        .checked_mul(Decimal::from(points_value))?
        .checked_mul(weight)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i32()
}

fn completes_assignment(assignment: &kpi_assignment::Model, today: NaiveDate) -> bool {
    assignment.status == AssignmentStatus::Active && assignment.end_date <= today
}

pub struct KpiAchievementRecorder;

impl KpiAchievementRecorder {
    /// Stores one observation against a KPI assignment.
    ///
    /// Recording is not side-effect free: an active assignment whose end date
    /// has been reached is marked completed in the same transaction.
    pub async fn record(db: &DatabaseConnection, assignment_id: Uuid, observation: KpiObservation, actor: Uuid) -> Result<kpi_record::Model, PayrollError> {
        Self::record_on(db, assignment_id, observation, actor, Local::now().date_naive()).await
    }

    #[instrument(skip(db, observation), fields(actual_value = %observation.actual_value))]
    async fn record_on(db: &DatabaseConnection, assignment_id: Uuid, observation: KpiObservation, actor: Uuid, today: NaiveDate) -> Result<kpi_record::Model, PayrollError> {
        let actual_value = utils::validate_amount("actual_value", observation.actual_value, true)?;

        let Some(assignment) = KpiAssignment::find_by_id(assignment_id).one(db).await? else {
            return Err(PayrollError::InvalidAssignment(assignment_id));
        };

        if assignment.target_value.is_zero() {
            return Err(PayrollError::DivisionByZero(assignment_id));
        }

        let achievement = achievement_percentage(actual_value, assignment.target_value)
            .ok_or(PayrollError::ArithmeticOverflow(assignment_id))?;

        let Some(kpi) = Kpi::find_by_id(assignment.kpi_id).one(db).await? else {
            return Err(PayrollError::InvalidAssignment(assignment_id));
        };

        let points = points_earned(achievement, kpi.points_value, assignment.weight)
            .ok_or(PayrollError::ArithmeticOverflow(assignment_id))?;
        let now = Local::now().fixed_offset();

        let txn = db.begin().await?;

        let record = KpiRecord::insert(kpi_record::ActiveModel {
            created_at: Set(now),
            updated_at: Set(now),
            kpi_assignment_id: Set(assignment_id),
            actual_value: Set(actual_value),
            achievement_percentage: Set(achievement),
            points_earned: Set(points),
            record_date: Set(observation.record_date),
            recorded_by: Set(Some(actor)),
            notes: Set(observation.notes),
            ..Default::default()
        }).exec_with_returning(&txn).await?;

        // Only an assignment still active at write time is completed
        if completes_assignment(&assignment, today) {
            let result = KpiAssignment::update_many()
                .set(kpi_assignment::ActiveModel {
                    status: Set(AssignmentStatus::Completed),
                    updated_at: Set(now),
                    updated_by: Set(Some(actor)),
                    ..Default::default()
                })
                .filter(kpi_assignment::Column::Id.eq(assignment_id))
                .filter(kpi_assignment::Column::Status.eq(AssignmentStatus::Active))
                .exec(&txn).await?;

            if result.rows_affected > 0 {
                info!(%assignment_id, "Assignment completed");
            } else {
                warn!(%assignment_id, "Assignment left active status concurrently, not completing");
            }
        }

        txn.commit().await?;

        info!(record_id = %record.id, %achievement, points, "Recorded KPI observation");

        Ok(record)
    }
}
