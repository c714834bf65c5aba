use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

/// Standard envelope for created resources
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
        }
    }
}

/// 201 with the created resource in an `ApiResponse`
pub struct Created<T: Serialize>(pub T);

impl<T: Serialize> IntoResponse for Created<T> {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::CREATED, Json(ApiResponse::success(self.0))).into_response()
    }
}

/// 204 for deletes
pub struct NoContent;

impl IntoResponse for NoContent {
    fn into_response(self) -> axum::response::Response {
        StatusCode::NO_CONTENT.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_omits_missing_data() {
        let empty: ApiResponse<u8> = ApiResponse {
            success: false,
            data: None,
        };
        assert_eq!(serde_json::to_string(&empty).unwrap(), r#"{"success":false}"#);
        assert_eq!(
            serde_json::to_string(&ApiResponse::success(3)).unwrap(),
            r#"{"success":true,"data":3}"#
        );
    }
}
