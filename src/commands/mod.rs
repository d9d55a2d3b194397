pub mod cache;
pub mod load;
pub mod verify;
