use std::fmt;

use promptpix_imagegen::ImageGenError;

/// Sequencing token assigned to every accepted submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(pub(crate) u64);

impl RequestId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle status of the controller
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Status {
    /// Nothing in flight
    #[default]
    Idle,
    /// Waiting for the upstream to answer the given request
    Loading(RequestId),
    /// The last request failed; stays until the next submission
    Failed(Failure),
}

/// A failed request and why it failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub request: RequestId,
    pub error: ImageGenError,
}

/// Everything a presentation layer needs to render the controller
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// Most recent successfully generated image, kept across failures
    pub image_url: Option<String>,
    pub status: Status,
}

impl Snapshot {
    pub fn is_loading(&self) -> bool {
        matches!(self.status, Status::Loading(_))
    }

    pub fn failure(&self) -> Option<&Failure> {
        match &self.status {
            Status::Failed(failure) => Some(failure),
            Status::Idle | Status::Loading(_) => None,
        }
    }
}
