pub mod optional_auth;
