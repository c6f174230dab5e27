use std::str::FromStr;

use actix_web::{dev, get, post, web, FromRequest, HttpRequest, HttpResponse, Responder};
use futures_util::future::LocalBoxFuture;
use sea_orm::{DatabaseConnection, EntityTrait};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{auth::Admin, entity::{payroll_period, prelude::*, user}, error::PayrollError, payroll::{ItemDetail, PeriodResolver}};

use model::*;

mod extractor;
mod model;

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(get_or_create_period)
        .service(get_period)
        .service(list_items)
        .service(get_payslip)
        .service(approve_period)
        .service(release_period);
}

#[post("")]
async fn get_or_create_period(db: web::Data<DatabaseConnection>, admin: Admin, payload: web::Json<CreatePeriod>) -> Result<impl Responder, PayrollError> {
    let resolution = PeriodResolver::resolve(db.as_ref(), payload.start_date, payload.end_date, admin.actor()).await?;

    let mut response = if resolution.created {
        HttpResponse::Created()
    } else {
        HttpResponse::Ok()
    };

    Ok(response.json(resolution))
}

#[get("/{period_id}")]
async fn get_period(_admin: Admin, period: payroll_period::Model) -> impl Responder {
    web::Json(period)
}

#[get("/{period_id}/items")]
async fn list_items(db: web::Data<DatabaseConnection>, _admin: Admin, period: payroll_period::Model) -> Result<impl Responder, PayrollError> {
    let items = ItemDetail::list(db.as_ref(), period.id).await?;

    Ok(web::Json(PeriodItems { period, items }))
}

#[get("/{period_id}/payslip")]
async fn get_payslip(db: web::Data<DatabaseConnection>, employee: user::Model, period: payroll_period::Model) -> Result<impl Responder, PayrollError> {
    let Some(item) = ItemDetail::for_employee(db.as_ref(), period.id, employee.id).await? else {
        return Ok(HttpResponse::NotFound().body("no payslip for this period"));
    };

    Ok(HttpResponse::Ok().json(Payslip { period, item }))
}

#[post("/{period_id}/approve")]
async fn approve_period(db: web::Data<DatabaseConnection>, admin: Admin, period: payroll_period::Model) -> Result<impl Responder, PayrollError> {
    let period = PeriodResolver::approve(db.as_ref(), period.id, admin.actor()).await?;

    Ok(web::Json(period))
}

#[post("/{period_id}/release")]
async fn release_period(db: web::Data<DatabaseConnection>, admin: Admin, period: payroll_period::Model) -> Result<impl Responder, PayrollError> {
    let period = PeriodResolver::release(db.as_ref(), period.id, admin.actor()).await?;

    Ok(web::Json(period))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::{Method, StatusCode}, test, App};
    use sea_orm::{DatabaseBackend, MockDatabase};

    use crate::{auth::Authority, entity::sea_orm_active_enums::{PeriodStatus, RoleType}, fixtures::{self, date}};

    use super::*;

    #[actix_web::test]
    async fn test_create_period_rejects_inverted_range() {
        let secret = b"secret";
        let admin = fixtures::user(RoleType::Admin);
        let token = Authority::new(secret).issue_for(&admin);

        let db = MockDatabase::new(DatabaseBackend::Postgres);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(secret)))
                .app_data(web::Data::new(db.into_connection()))
                .service(web::scope("/payroll").service(get_or_create_period))
        ).await;

        let req = test::TestRequest::default()
            .uri("/payroll")
            .method(Method::POST)
            .insert_header(("Authorization", format!("JWT {token}")))
            .set_json(CreatePeriod {
                start_date: date(2024, 6, 30),
                end_date: date(2024, 6, 1),
            })
            .to_request();

        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_create_period_returns_existing() {
        let secret = b"secret";
        let admin = fixtures::user(RoleType::Admin);
        let token = Authority::new(secret).issue_for(&admin);

        let period = fixtures::period(date(2024, 6, 1), date(2024, 6, 30), PeriodStatus::Processing);

        // Still processing, so missing items are looked for. There are none
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                vec![ period.clone() ],
            ])
            .append_query_results([
                Vec::<crate::entity::payroll_item::Model>::new(),
            ])
            .append_query_results([
                Vec::<user::Model>::new(),
            ]);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(secret)))
                .app_data(web::Data::new(db.into_connection()))
                .service(web::scope("/payroll").service(get_or_create_period))
        ).await;

        let req = test::TestRequest::default()
            .uri("/payroll")
            .method(Method::POST)
            .insert_header(("Authorization", format!("JWT {token}")))
            .set_json(CreatePeriod {
                start_date: period.start_date,
                end_date: period.end_date,
            })
            .to_request();

        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_approve_paid_period_conflicts() {
        let secret = b"secret";
        let admin = fixtures::user(RoleType::Admin);
        let token = Authority::new(secret).issue_for(&admin);

        let period = fixtures::period(date(2024, 6, 1), date(2024, 6, 30), PeriodStatus::Paid);

        // Once for the path extractor, once for the transition
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                vec![ period.clone() ],
                vec![ period.clone() ],
            ]);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(secret)))
                .app_data(web::Data::new(db.into_connection()))
                .service(approve_period)
        ).await;

        let req = test::TestRequest::default()
            .uri(&format!("/{}/approve", period.id))
            .method(Method::POST)
            .insert_header(("Authorization", format!("JWT {token}")))
            .to_request();

        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn test_employee_cannot_release() {
        let secret = b"secret";
        let employee = fixtures::user(RoleType::Employee);
        let token = Authority::new(secret).issue_for(&employee);

        let db = MockDatabase::new(DatabaseBackend::Postgres);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(secret)))
                .app_data(web::Data::new(db.into_connection()))
                .service(release_period)
        ).await;

        let req = test::TestRequest::default()
            .uri(&format!("/{}/release", Uuid::new_v4()))
            .method(Method::POST)
            .insert_header(("Authorization", format!("JWT {token}")))
            .to_request();

        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
