use actix_web::{post, web, HttpResponse, Responder};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::{auth::Admin, error::PayrollError, payroll::{KpiAchievementRecorder, KpiObservation}};

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(record_observation);
}

#[post("/assignments/{assignment_id}/records")]
async fn record_observation(db: web::Data<DatabaseConnection>, admin: Admin, assignment_id: web::Path<Uuid>, payload: web::Json<KpiObservation>) -> Result<impl Responder, PayrollError> {
    let record = KpiAchievementRecorder::record(db.as_ref(), assignment_id.into_inner(), payload.into_inner(), admin.actor()).await?;

    Ok(HttpResponse::Created().json(record))
}
