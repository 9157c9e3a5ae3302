// Privileged endpoints: bearer auth plus the admin check on the caller's
// profile before anything is written.
pub mod bonus;
pub mod quest;
