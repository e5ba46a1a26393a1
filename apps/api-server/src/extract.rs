//! Request extractors.

use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures::future::LocalBoxFuture;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::middleware::error::AppError;

/// Extractor that deserializes a JSON body and validates it.
///
/// Malformed JSON is a 400; a body that parses but breaks a field rule is a
/// 422 listing the offending fields.
pub struct ValidatedJson<T>(pub T);

impl<T> ValidatedJson<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> FromRequest for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + 'static,
{
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let json = web::Json::<T>::from_request(req, payload);

        Box::pin(async move {
            let value = json
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?
                .into_inner();

            value.validate().map_err(AppError::from)?;
            Ok(Self(value))
        })
    }
}
