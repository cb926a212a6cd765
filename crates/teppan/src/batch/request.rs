use uuid::Uuid;

use crate::backend::DeviceBuffer;
use crate::batch::SampleResult;
use crate::identity::ModelIdentity;

/// One end-to-end inference call, bound to a single model variant.
///
/// A request is created by the admission layer, preprocessed into a
/// device input, staged into a batch, and destroyed after its result is
/// postprocessed. Its id and session never change across that lifetime.
#[derive(Debug)]
pub struct Request<B> {
    id: Uuid,
    session: ModelIdentity,
    input: Option<B>,
    result: Option<SampleResult<B>>,
}

impl<B: DeviceBuffer> Request<B> {
    /// A fresh request for `session` with a unique id.
    pub fn new(session: ModelIdentity) -> Self {
        Self {
            id: Uuid::new_v4(),
            session,
            input: None,
            result: None,
        }
    }

    /// The request's unique id.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The variant this request is bound to.
    pub fn session(&self) -> &ModelIdentity {
        &self.session
    }

    /// Installs the preprocessed device input.
    pub fn set_input(&mut self, input: B) {
        self.input = Some(input);
    }

    /// The preprocessed device input, if preprocessing ran.
    pub fn input(&self) -> Option<&B> {
        self.input.as_ref()
    }

    /// Installs the request's result.
    pub fn set_result(&mut self, result: SampleResult<B>) {
        self.result = Some(result);
    }

    /// The result, if the request has been forwarded.
    pub fn result(&self) -> Option<&SampleResult<B>> {
        self.result.as_ref()
    }

    /// Consumes the result for postprocessing.
    pub fn take_result(&mut self) -> Option<SampleResult<B>> {
        self.result.take()
    }
}
