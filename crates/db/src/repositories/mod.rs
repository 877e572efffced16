pub mod profile_repo;
pub mod session_repo;
pub mod user_repo;
pub mod vehicle_repo;
pub mod voter_repo;

pub use profile_repo::ProfileRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
pub use vehicle_repo::VehicleRepo;
pub use voter_repo::VoterRepo;
