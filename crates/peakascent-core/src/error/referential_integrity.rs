use super::Error;

/// Error when a deletion would leave rows pointing at nothing through a
/// non-nullable foreign key and the configured policy forbids cascading.
#[derive(Debug)]
pub(super) struct ReferentialIntegrity {
    message: Box<str>,
}

impl std::error::Error for ReferentialIntegrity {}

impl core::fmt::Display for ReferentialIntegrity {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "referential integrity violated: {}", self.message)
    }
}

impl Error {
    pub fn referential_integrity(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::ReferentialIntegrity(
            ReferentialIntegrity {
                message: message.into().into(),
            },
        ))
    }

    pub fn is_referential_integrity(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::ReferentialIntegrity(_))
    }
}
