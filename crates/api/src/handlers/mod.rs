pub mod auth;
pub mod locker;
pub mod pages;
pub mod spreadsheet;
