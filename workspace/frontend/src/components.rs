pub mod auth_gate;
pub mod family_code;
pub mod user_header;
