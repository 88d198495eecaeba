pub mod loading;
pub mod status;
