pub mod list;
pub mod status;
pub mod user;

pub const WEB_HOST: &str = "https://twitter.com";
