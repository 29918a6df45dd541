pub mod artist;
pub mod error;
pub mod listing;
pub mod profile;
pub mod show;
pub mod venue;
