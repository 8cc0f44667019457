use serde::{Deserialize, Serialize};

/// Single-resource envelope: `{ "data": ..., "message": ... }`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// One page of a list endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

/// Page selection sent as query parameters. Unset fields are left to the
/// backend's defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl PaginationParams {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
        }
    }
}

/// Error body of a failed request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_message_is_optional() {
        let response: ApiResponse<Vec<u32>> =
            serde_json::from_str(r#"{"data":[1,2,3]}"#).unwrap();
        assert_eq!(response.data, vec![1, 2, 3]);
        assert_eq!(response.message, None);
    }

    #[test]
    fn empty_pagination_serializes_to_empty_object() {
        let params = serde_json::to_value(PaginationParams::default()).unwrap();
        assert_eq!(params, serde_json::json!({}));

        let params = serde_json::to_value(PaginationParams::new(2, 50)).unwrap();
        assert_eq!(params, serde_json::json!({"page": 2, "limit": 50}));
    }
}
