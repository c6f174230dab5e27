use actix_web::{body, http::{self, header::ContentType, StatusCode}, HttpResponse};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

use crate::entity::sea_orm_active_enums::PeriodStatus;

#[derive(Debug, Error)]
pub enum PayrollError {
    #[error("end date {end} is before start date {start}")]
    InvalidDateRange {
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("employee {employee_id} has no salary structure effective on {as_of}")]
    NoApplicableSalary {
        employee_id: Uuid,
        as_of: NaiveDate,
    },

    #[error("payroll period {start} - {end} already exists")]
    DuplicatePeriod {
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("payroll item for employee {employee_id} already exists in period {period_id}")]
    DuplicateItem {
        period_id: Uuid,
        employee_id: Uuid,
    },

    #[error("cannot {action} a payroll period in `{from:?}` status")]
    InvalidTransition {
        from: PeriodStatus,
        action: &'static str,
    },

    #[error("kpi assignment {0} has a target value of zero")]
    DivisionByZero(Uuid),

    #[error("kpi assignment {0} produced a value too large to store")]
    ArithmeticOverflow(Uuid),

    #[error("`{field}` value {value} is outside the accepted range")]
    ValueOutOfRange {
        field: &'static str,
        value: Decimal,
    },

    #[error("kpi assignment {0} not found")]
    InvalidAssignment(Uuid),

    #[error("payroll period {0} not found")]
    PeriodNotFound(Uuid),

    #[error("employee {0} not found")]
    EmployeeNotFound(Uuid),

    #[error("salary structure effective {effective_date} overlaps an existing structure of employee {employee_id}")]
    OverlappingSalaryStructure {
        employee_id: Uuid,
        effective_date: NaiveDate,
    },

    #[error("database error")]
    Database(#[from] DbErr),
}

impl actix_web::error::ResponseError for PayrollError {
    fn error_response(&self) -> HttpResponse<body::BoxBody> {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::plaintext())
            .body(self.to_string())
    }

    fn status_code(&self) -> http::StatusCode {
        match self {
            PayrollError::InvalidDateRange { .. } => StatusCode::BAD_REQUEST,
            PayrollError::NoApplicableSalary { .. }
            | PayrollError::InvalidAssignment(_)
            | PayrollError::PeriodNotFound(_)
            | PayrollError::EmployeeNotFound(_) => StatusCode::NOT_FOUND,
            PayrollError::DuplicatePeriod { .. }
            | PayrollError::DuplicateItem { .. }
            | PayrollError::InvalidTransition { .. }
            | PayrollError::OverlappingSalaryStructure { .. } => StatusCode::CONFLICT,
            PayrollError::DivisionByZero(_)
            | PayrollError::ArithmeticOverflow(_)
            | PayrollError::ValueOutOfRange { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            PayrollError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
