pub mod activities;
pub mod categories;
pub mod trips;
pub mod users;
