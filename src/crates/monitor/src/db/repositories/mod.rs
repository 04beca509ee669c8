//! Database repositories

pub mod attempt_repo;
pub mod ip_block_repo;

pub use attempt_repo::AttemptRepository;
pub use ip_block_repo::IpBlockRepository;
