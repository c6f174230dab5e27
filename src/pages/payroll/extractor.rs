use super::*;

impl FromRequest for payroll_period::Model {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let period_id = req.match_info().get("period_id").expect("This extractor must be used under `period_id` path");
            let Ok(period_id) = Uuid::from_str(period_id) else {
                return Err(actix_web::error::ErrorBadRequest("invalid `period_id`"))
            };

            let db = req.app_data::<web::Data<DatabaseConnection>>().expect("DatabaseConnection must be attached");

            let period = PayrollPeriod::find_by_id(period_id)
                .one(db.as_ref()).await
                .map_err(PayrollError::from)?;

            let Some(period) = period else {
                return Err(PayrollError::PeriodNotFound(period_id).into())
            };

            Ok(period)
        })
    }
}
