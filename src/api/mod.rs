pub mod auth;
pub mod logs;
pub mod settings;
pub mod shared_state;
pub mod users;

pub use auth::auth_routes;
pub use logs::log_routes;
pub use settings::setting_routes;
pub use users::user_routes;
