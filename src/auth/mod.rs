// Authentication: JWT token pair, bcrypt hashing, bearer middleware, role gates

pub mod errors;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod service;

pub use errors::AuthError;
pub use jwt::{extract_bearer_token, JwtService};
pub use middleware::{
    admin_only_middleware, coach_or_admin_middleware, cors_layer, jwt_auth_middleware,
    security_headers_layer,
};
pub use models::{
    AuthResponse, Claims, LoginRequest, MessageResponse, RefreshToken, RefreshTokenRequest,
    RegisterRequest, TokenResponse, UserRole, UserSession,
};
pub use service::AuthService;
