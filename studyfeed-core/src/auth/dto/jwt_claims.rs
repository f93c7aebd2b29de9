use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct JwtClaims {
    pub sub: Uuid,
}
