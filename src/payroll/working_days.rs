use chrono::NaiveDate;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use crate::{entity::{leave_request, prelude::*, sea_orm_active_enums::LeaveStatus}, error::PayrollError, utils};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WorkingDays {
    pub working: i32,
    /// Weekdays covered by approved leave
    pub leave: i32,
    /// Always zero, no attendance source feeds payroll
    pub absent: i32,
}

#[derive(Debug, Clone, Copy)]
struct LeaveSpan {
    start: NaiveDate,
    end: NaiveDate,
}

impl LeaveSpan {
    fn covers(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }
}

impl From<&leave_request::Model> for LeaveSpan {
    fn from(request: &leave_request::Model) -> Self {
        Self {
            start: request.start_date,
            end: request.end_date,
        }
    }
}

/// Weekdays in `[start, end]`, split into working days and days on leave
fn count_days(start: NaiveDate, end: NaiveDate, leave: &[LeaveSpan]) -> WorkingDays {
    let mut days = WorkingDays::default();

    for day in utils::days_in_range(start, end).filter(|day| utils::is_weekday(*day)) {
        if leave.iter().any(|span| span.covers(day)) {
            days.leave += 1;
        } else {
            days.working += 1;
        }
    }

    days
}

pub struct WorkingDaysCalculator;

impl WorkingDaysCalculator {
    #[instrument(skip(db))]
    pub async fn count<C: ConnectionTrait>(db: &C, employee_id: Uuid, start: NaiveDate, end: NaiveDate) -> Result<WorkingDays, PayrollError> {
        if end < start {
            return Ok(WorkingDays::default());
        }

        let leave = LeaveRequest::find()
            .filter(leave_request::Column::EmployeeId.eq(employee_id))
            .filter(leave_request::Column::Status.eq(LeaveStatus::Approved))
            .filter(leave_request::Column::StartDate.lte(end))
            .filter(leave_request::Column::EndDate.gte(start))
            .all(db).await?
            .iter()
            .map(LeaveSpan::from)
            .collect::<Vec<_>>();

        Ok(count_days(start, end, &leave))
    }
}
