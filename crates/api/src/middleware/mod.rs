//! Request guards for protected routes.
//!
//! - [`api_key::RequireApiKey`] -- Requires the shared secret in `x-api-key`.

pub mod api_key;
