use axum::{
    extract::Request,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};

use crate::auth::{validate_jwt, AuthUser};
use crate::error::ApiError;

/// Bearer-token middleware that installs the requester's identity.
///
/// Identity is optional here: public pages serve anonymous requests, so a
/// missing Authorization header just means no `AuthUser` extension. A
/// header that is present but malformed or carries an invalid token is
/// still rejected with 401.
pub async fn auth_context_middleware(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, impl IntoResponse> {
    let token = match extract_bearer_token(&headers) {
        Ok(token) => token,
        Err(msg) => {
            let api_error = ApiError::unauthorized(msg);
            return Err((
                StatusCode::from_u16(api_error.status_code()).unwrap_or(StatusCode::UNAUTHORIZED),
                Json(api_error.to_json()),
            ));
        }
    };

    if let Some(token) = token {
        let claims = match validate_jwt(&token) {
            Ok(claims) => claims,
            Err(msg) => {
                let api_error = ApiError::unauthorized(msg);
                return Err((
                    StatusCode::from_u16(api_error.status_code())
                        .unwrap_or(StatusCode::UNAUTHORIZED),
                    Json(api_error.to_json()),
                ));
            }
        };
        request.extensions_mut().insert(AuthUser::from(claims));
    }

    Ok(next.run(request).await)
}

/// Extract the bearer token when an Authorization header is present
fn extract_bearer_token(headers: &HeaderMap) -> Result<Option<String>, String> {
    let auth_header = match headers
        .get("authorization")
        .or_else(|| headers.get("Authorization"))
    {
        Some(header) => header,
        None => return Ok(None),
    };

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty bearer token".to_string());
        }
        Ok(Some(token.to_string()))
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_header_means_anonymous() {
        let headers = HeaderMap::new();
        assert_eq!(extract_bearer_token(&headers).unwrap(), None);
    }

    #[test]
    fn non_bearer_scheme_is_an_error() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", "Basic abc123".parse().unwrap());
        assert!(extract_bearer_token(&headers).is_err());
    }

    #[test]
    fn bearer_token_is_extracted() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", "Bearer sometoken".parse().unwrap());
        assert_eq!(
            extract_bearer_token(&headers).unwrap(),
            Some("sometoken".to_string())
        );
    }
}
