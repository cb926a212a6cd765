use uuid::Uuid;

use crate::backend::DeviceBuffer;
use crate::identity::ModelIdentity;

/// One sample staged into a batch: a device view of its input plus the
/// linkage back to the request it came from.
#[derive(Debug, Clone)]
pub struct SampleInput<B> {
    buffer: B,
    session: ModelIdentity,
    request_id: Uuid,
    request_index: usize,
}

impl<B: DeviceBuffer> SampleInput<B> {
    /// Stages `buffer` as the input of the request identified by
    /// `request_id` / `request_index`.
    pub fn new(buffer: B, session: ModelIdentity, request_id: Uuid, request_index: usize) -> Self {
        Self {
            buffer,
            session,
            request_id,
            request_index,
        }
    }

    /// The device view of this sample's input.
    pub fn buffer(&self) -> &B {
        &self.buffer
    }

    /// The variant the originating request is bound to.
    pub fn session(&self) -> &ModelIdentity {
        &self.session
    }

    /// Id of the originating request.
    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// The originating request's index at staging time.
    pub fn request_index(&self) -> usize {
        self.request_index
    }
}

/// A named output tensor slice tied back to its originating request.
///
/// This linkage is the only way to match a produced output to a
/// request: a batch's result list is not guaranteed to be in submission
/// order, so consumers address results by request id and index, never by
/// list position.
#[derive(Debug, Clone)]
pub struct SampleResult<B> {
    name: String,
    output: B,
    session: ModelIdentity,
    request_id: Uuid,
    request_index: usize,
}

impl<B: DeviceBuffer> SampleResult<B> {
    /// Records `output` (a view of the producing stage's output buffer)
    /// as the result of the request identified by `request_id` /
    /// `request_index`.
    pub fn new(
        name: impl Into<String>,
        output: B,
        session: ModelIdentity,
        request_id: Uuid,
        request_index: usize,
    ) -> Self {
        Self {
            name: name.into(),
            output,
            session,
            request_id,
            request_index,
        }
    }

    /// Name of the output tensor this result slices.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The device view of this request's output.
    pub fn output(&self) -> &B {
        &self.output
    }

    /// The variant the originating request is bound to.
    pub fn session(&self) -> &ModelIdentity {
        &self.session
    }

    /// Id of the originating request.
    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// The originating request's index at production time.
    pub fn request_index(&self) -> usize {
        self.request_index
    }
}
