pub mod platform_api;
pub mod rest_platform;
