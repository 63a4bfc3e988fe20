use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Session token payload. Times are unix seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub iat: usize,
    pub exp: usize,
}
