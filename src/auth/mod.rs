//! Bearer token authentication, registration and log-in.

mod log_in;
mod me;
mod middleware;
mod register;
mod token;

pub use log_in::log_in_endpoint;
pub use me::get_me;
pub use middleware::auth_guard;
pub use register::register_endpoint;
pub use token::DEFAULT_TOKEN_DURATION;

#[cfg(test)]
pub use middleware::AuthState;
