mod role_limits;
mod validators;

pub use role_limits::RoleLimitsStore;
pub use validators::{spec_for, LimitSpec, LIMIT_SPECS};

#[cfg(test)]
mod tests;
