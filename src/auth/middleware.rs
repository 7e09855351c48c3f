use actix_web::FromRequest;
use actix_web::{Error, HttpRequest, dev::Payload, web};
use serde::Serialize;
use std::future::Future;
use std::pin::Pin;
use uuid::Uuid;

use crate::auth::{AuthError, TokenVerifier};

/// The caller behind a verified bearer token.
#[derive(Debug, Clone, Serialize)]
pub struct Identity {
    pub id: Uuid,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

pub struct AuthenticatedUser(pub Identity);

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let token = bearer_token(&req).map_err(actix_web::error::ErrorUnauthorized)?;

            let verifier = req.app_data::<web::Data<TokenVerifier>>().ok_or_else(|| {
                actix_web::error::ErrorInternalServerError("Token verifier not configured")
            })?;

            let identity = authenticate(verifier.get_ref(), token)
                .await
                .map_err(actix_web::error::ErrorUnauthorized)?;

            Ok(AuthenticatedUser(identity))
        })
    }
}

fn bearer_token(req: &HttpRequest) -> Result<&str, AuthError> {
    req.headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingHeader)?
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MalformedHeader)
}

/// Verify `token` and turn its claims into an [`Identity`].
pub async fn authenticate(verifier: &TokenVerifier, token: &str) -> Result<Identity, AuthError> {
    let claims = verifier.verify(token).await?;

    Ok(Identity {
        id: claims.user_id()?,
        display_name: claims.display_name(),
        email: claims.email,
    })
}
