pub mod admin_middleware;
pub mod admin_policy;

pub use admin_middleware::admin_authorization;
pub use admin_policy::{AdminPolicy, AdminUser};
