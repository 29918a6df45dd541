pub mod home;
pub mod profiles;
pub mod shows;
