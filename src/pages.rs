use actix_web::web;

mod auth;
mod kpi;
mod payroll;
mod salary;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(web::scope("/auth")
            .configure(auth::config))
        .service(web::scope("/payroll")
            .configure(payroll::config))
        .service(web::scope("/kpi")
            .configure(kpi::config))
        .service(web::scope("/salary")
            .configure(salary::config));
}
