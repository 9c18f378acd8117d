//! Command: print version information.

/// The build-time version, or the crate version for local builds.
#[must_use]
pub const fn version() -> &'static str {
    match option_env!("DOTS_VERSION") {
        Some(version) => version,
        None => env!("CARGO_PKG_VERSION"),
    }
}

/// Print the dots version to stdout.
#[allow(clippy::print_stdout)]
pub fn run() {
    println!("dots {}", version());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_not_empty() {
        assert!(!version().is_empty());
    }
}
