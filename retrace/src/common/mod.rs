mod database;
mod engine;

pub use self::database::Database;
pub(crate) use self::engine::{engine, Engine};
pub use self::engine::{init, init_count};

/// The current retrace version information.
pub fn version() -> semver::Version {
    semver::Version::parse(version_str()).expect("crate version is valid semver")
}

/// Utility function for identifying this release version.
pub fn version_str() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let _ = pretty_env_logger::try_init();

        let version = version();

        assert_eq!(version.to_string(), version_str());
        assert_eq!(version.major, env!("CARGO_PKG_VERSION_MAJOR").parse::<u64>().unwrap());
    }
}
