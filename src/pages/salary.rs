use actix_web::{get, post, web, HttpResponse, Responder};
use chrono::{Local, NaiveDate};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use uuid::Uuid;

use crate::{auth::Admin, error::PayrollError, payroll::{NewSalaryStructure, SalaryResolver, SalaryStructureWriter}};

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(assign_salary)
        .service(resolve_salary);
}

#[derive(Debug, Deserialize)]
struct AsOf {
    as_of: Option<NaiveDate>,
}

#[post("/{employee_id}")]
async fn assign_salary(db: web::Data<DatabaseConnection>, admin: Admin, employee_id: web::Path<Uuid>, payload: web::Json<NewSalaryStructure>) -> Result<impl Responder, PayrollError> {
    let structure = SalaryStructureWriter::assign(db.as_ref(), employee_id.into_inner(), payload.into_inner(), admin.actor()).await?;

    Ok(HttpResponse::Created().json(structure))
}

#[get("/{employee_id}")]
async fn resolve_salary(db: web::Data<DatabaseConnection>, _admin: Admin, employee_id: web::Path<Uuid>, query: web::Query<AsOf>) -> Result<impl Responder, PayrollError> {
    let employee_id = employee_id.into_inner();
    let as_of = query.as_of.unwrap_or_else(|| Local::now().date_naive());

    let Some(structure) = SalaryResolver::resolve(db.as_ref(), employee_id, as_of).await? else {
        return Err(PayrollError::NoApplicableSalary { employee_id, as_of });
    };

    Ok(web::Json(structure))
}
