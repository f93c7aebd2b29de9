use uuid::Uuid;

///
/// User information retrieved from their JWT.
///
/// Role and permission computation happen in the identity provider,
/// this service only ever needs the acting user's id.
///
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
}
