//! Model builders shared by the unit tests

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{Transaction, Value};
use uuid::Uuid;

use crate::entity::{kpi, kpi_assignment, payroll_item, payroll_period, salary_structure, sea_orm_active_enums::*, user};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn user(role: RoleType) -> user::Model {
    user::Model {
        id: Uuid::new_v4(),
        created_at: Local::now().into(),
        updated_at: Local::now().into(),
        username: "Bob".to_string(),
        password: Vec::new(),
        role,
        hire_date: date(2020, 1, 6),
        termination_date: None,
        is_active: true,
    }
}

pub fn period(start: NaiveDate, end: NaiveDate, status: PeriodStatus) -> payroll_period::Model {
    payroll_period::Model {
        id: Uuid::new_v4(),
        created_at: Local::now().into(),
        updated_at: Local::now().into(),
        created_by: None,
        updated_by: None,
        reference: crate::utils::period_reference(start),
        start_date: start,
        end_date: end,
        payment_date: end,
        status,
        approved_by: None,
        approved_at: None,
    }
}

pub fn salary(employee_id: Uuid, basic: Decimal, effective_date: NaiveDate, end_date: Option<NaiveDate>) -> salary_structure::Model {
    salary_structure::Model {
        id: Uuid::new_v4(),
        created_at: Local::now().into(),
        updated_at: Local::now().into(),
        created_by: None,
        updated_by: None,
        employee_id,
        basic_salary: basic,
        housing_allowance: Decimal::ZERO,
        transport_allowance: Decimal::ZERO,
        meal_allowance: Decimal::ZERO,
        effective_date,
        end_date,
        is_current: end_date.is_none(),
    }
}

pub fn item(period_id: Uuid, employee_id: Uuid, basic: Decimal, allowances: Decimal) -> payroll_item::Model {
    payroll_item::Model {
        id: Uuid::new_v4(),
        created_at: Local::now().into(),
        updated_at: Local::now().into(),
        payroll_period_id: period_id,
        employee_id,
        salary_structure_id: Uuid::new_v4(),
        basic_salary: basic,
        total_allowances: allowances,
        total_deductions: Decimal::ZERO,
        total_bonuses: Decimal::ZERO,
        gross_salary: basic + allowances,
        net_salary: basic + allowances,
        working_days: 20,
        leave_days: 0,
        absent_days: 0,
    }
}

pub fn kpi(points_value: i32) -> kpi::Model {
    kpi::Model {
        id: Uuid::new_v4(),
        created_at: Local::now().into(),
        updated_at: Local::now().into(),
        created_by: None,
        updated_by: None,
        name: "Tickets closed".to_string(),
        description: "Support tickets resolved".to_string(),
        unit: "tickets".to_string(),
        points_value,
        is_active: true,
    }
}

pub fn assignment(kpi_id: Uuid, target: Decimal, end_date: NaiveDate, status: AssignmentStatus) -> kpi_assignment::Model {
    kpi_assignment::Model {
        id: Uuid::new_v4(),
        created_at: Local::now().into(),
        updated_at: Local::now().into(),
        created_by: None,
        updated_by: None,
        kpi_id,
        employee_id: Uuid::new_v4(),
        target_value: target,
        min_value: Decimal::ZERO,
        max_value: None,
        weight: dec!(1.00),
        start_date: date(2024, 6, 1),
        end_date,
        status,
    }
}

/// Values bound to every logged statement whose SQL starts with `prefix`
pub fn bound_values(log: &[Transaction], prefix: &str) -> Vec<Value> {
    log.iter()
        .flat_map(|txn| txn.statements())
        .filter(|stmt| stmt.sql.starts_with(prefix))
        .flat_map(|stmt| stmt.values.iter().flat_map(|values| values.0.iter().cloned()))
        .collect()
}

/// Number of logged statements whose SQL starts with `prefix`
pub fn count_statements(log: &[Transaction], prefix: &str) -> usize {
    log.iter()
        .flat_map(|txn| txn.statements())
        .filter(|stmt| stmt.sql.starts_with(prefix))
        .count()
}

pub fn decimal(amount: Decimal) -> Value {
    Value::Decimal(Some(Box::new(amount)))
}

pub fn text(value: &str) -> Value {
    Value::String(Some(Box::new(value.to_owned())))
}
