//! Exit codes for the definition-build binary.
//!
//! Exit codes communicate build outcome without requiring output parsing.

use ds_common::Error;

/// Exit codes for definition builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Definition set built and written
    Clean = 0,

    /// Configuration error
    ConfigError = 10,

    /// Dataset table error
    TableError = 11,

    /// I/O or encoding error
    IoError = 13,

    /// Internal/unknown error
    InternalError = 99,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Exit code for a build error.
    pub fn for_error(err: &Error) -> Self {
        match err {
            Error::Config(_) | Error::ConfigValue { .. } | Error::LocationCount { .. } => {
                ExitCode::ConfigError
            }
            Error::Table(_) | Error::TableRow { .. } => ExitCode::TableError,
            Error::Io(_) | Error::Json(_) => ExitCode::IoError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_mapping() {
        assert_eq!(
            ExitCode::for_error(&Error::LocationCount { count: 0 }),
            ExitCode::ConfigError
        );
        assert_eq!(
            ExitCode::for_error(&Error::Table("bad".into())),
            ExitCode::TableError
        );
        assert_eq!(ExitCode::TableError.as_i32(), 11);
    }
}
