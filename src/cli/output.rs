//! Global output flags, propagated via environment variables so every
//! module can check them without plumbing.

/// Whether `--quiet` was passed.
pub fn is_quiet() -> bool {
    std::env::var("ACROHARVEST_QUIET").is_ok()
}

/// Whether `--verbose` was passed.
pub fn is_verbose() -> bool {
    std::env::var("ACROHARVEST_VERBOSE").is_ok()
}
