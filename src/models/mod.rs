pub mod activity;
pub mod category;
pub mod trip;
pub mod user;

pub use activity::{Activity, ActivityChanges, NewActivity};
pub use category::Category;
pub use trip::{NewTrip, Trip, TripChanges};
pub use user::{NewUser, User, UserChanges};
