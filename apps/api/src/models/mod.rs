pub mod posting;
pub mod profile;

pub use posting::{JobPosting, Listing};
pub use profile::UserProfile;
