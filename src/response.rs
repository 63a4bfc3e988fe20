use axum::Json;
use serde::Serialize;

/// `{ success: true, [count,] data }`
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    pub data: T,
}

pub fn data<T: Serialize>(data: T) -> Json<Envelope<T>> {
    Json(Envelope {
        success: true,
        count: None,
        data,
    })
}

pub fn list<T: Serialize>(items: Vec<T>) -> Json<Envelope<Vec<T>>> {
    Json(Envelope {
        success: true,
        count: Some(items.len()),
        data: items,
    })
}

/// `{ success: true, data: {} }`
pub fn empty() -> Json<Envelope<serde_json::Value>> {
    data(serde_json::json!({}))
}

#[derive(Debug, serde::Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    100
}

impl Pagination {
    pub fn clamped(&self) -> (i64, i64) {
        (self.limit.clamp(1, 500), self.offset.max(0))
    }
}
