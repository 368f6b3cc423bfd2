pub mod access_jwt;
pub mod gate;
pub mod scopes;

pub use access_jwt::AuthService;
pub use gate::{AuthContext, AuthError, authorize};
