pub mod blog;
pub mod contact;
pub mod exclusive;
pub mod health;
pub mod newsletter;
pub mod properties;
pub mod sitemap;
