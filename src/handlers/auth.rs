use actix_web::{HttpResponse, Responder};

use crate::auth::middleware::AuthenticatedUser;

/// GET /api/auth/me: return the identity behind the bearer token.
pub async fn me(user: AuthenticatedUser) -> impl Responder {
    HttpResponse::Ok().json(user.0)
}
