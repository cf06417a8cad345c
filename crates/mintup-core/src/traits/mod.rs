mod repositories;

pub use repositories::{
    ConnectionRepository, EventRepository, MemberRepository, RegistrationRepository, RepoResult,
};
