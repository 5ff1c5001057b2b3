pub mod driver;
pub mod page;
pub mod stealth;
pub mod wait;
