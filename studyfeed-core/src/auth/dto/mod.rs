mod jwt_claims;
mod user;

pub(crate) use jwt_claims::JwtClaims;
pub use user::User;
