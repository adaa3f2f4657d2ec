// Resume analysis: upload gate, mocked ATS scoring, canned feedback text.
// The score is a fixed formula over the form inputs; no document content is read.

pub mod document;
pub mod estimator;
pub mod feedback;
pub mod handlers;
pub mod notice;
