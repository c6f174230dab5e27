use actix_web::{get, post, web, Responder};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{auth::Authority, entity::{prelude::*, sea_orm_active_enums::RoleType, user}};

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(login)
        .service(whoami);
}

#[derive(Debug, Serialize, Deserialize)]
struct Login {
    username: String,
    password: String,
}

#[post("/login")]
async fn login(db: web::Data<DatabaseConnection>, authority: web::Data<Authority>, credentials: web::Json<Login>) -> impl Responder {
    let hashed_password = &Sha256::digest(&format!("{}:{}", credentials.password, credentials.username))[..];

    let Some(user) = User::find()
        .filter(user::Column::Username.eq(&credentials.username))
        .filter(user::Column::Password.eq(hashed_password))
        .one(db.get_ref()).await
        .map_err(actix_web::error::ErrorInternalServerError)?
    else {
        return Err(actix_web::error::ErrorForbidden("invalid credentials"));
    };

    if !user.is_active {
        return Err(actix_web::error::ErrorForbidden("account is inactive"));
    }

    Ok(
        authority.issue_for(&user)
    )
}

#[derive(Debug, Serialize, Deserialize)]
struct WhoAmI {
    id: uuid::Uuid,
    username: String,
    role: RoleType,
    hire_date: chrono::NaiveDate,
}

#[get("")]
async fn whoami(user: user::Model) -> impl Responder {
    web::Json(WhoAmI {
        id: user.id,
        username: user.username,
        role: user.role,
        hire_date: user.hire_date,
    })
}
