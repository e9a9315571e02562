use crate::domain::DomainError;
use crate::infrastructure::jwt::JwtService;
use actix_web::{dev::ServiceRequest, web, Error, HttpMessage, HttpRequest};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use std::sync::Arc;

/// Id of the authenticated user, stored in request extensions.
#[derive(Debug, Clone, Copy)]
pub struct Requester(pub i64);

/// Optional bearer authentication: requests without credentials pass
/// through as anonymous, requests with an invalid token are rejected.
pub async fn authenticate(
    req: ServiceRequest,
    credentials: Option<BearerAuth>,
) -> Result<ServiceRequest, (Error, ServiceRequest)> {
    let Some(credentials) = credentials else {
        return Ok(req);
    };

    let jwt_service = match req.app_data::<web::Data<Arc<JwtService>>>() {
        Some(service) => service.get_ref().clone(),
        None => {
            return Err((
                DomainError::InternalError("JWT service not configured".to_string()).into(),
                req,
            ));
        }
    };

    match jwt_service.verify_token(credentials.token()) {
        Ok(user_id) => {
            req.extensions_mut().insert(Requester(user_id));
            Ok(req)
        }
        Err(_) => Err((
            DomainError::Unauthorized("Given token not valid for any token type".to_string())
                .into(),
            req,
        )),
    }
}

pub fn requester(req: &HttpRequest) -> Option<i64> {
    req.extensions().get::<Requester>().map(|requester| requester.0)
}
