pub mod organization;
pub mod profile;
pub mod session;
pub mod user;
pub mod vehicle;
pub mod voter;

pub use organization::Organization;
pub use profile::{CreateProfile, DirigenteWithVehicles, Profile, UpdateProfile};
pub use session::{CreateSession, Session};
pub use user::{CreateUser, User};
pub use vehicle::{CreateVehicle, UpdateVehicle, Vehicle, VehicleWithDirigente};
pub use voter::{CreateVoter, MobilizedVoter};
