pub mod admin;
pub mod contact;
pub mod home;
pub mod site;
pub mod system;
