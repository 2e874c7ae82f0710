pub mod content_flow;
pub mod messages;
pub mod patch;
pub mod session;

pub use content_flow::ContentFlow;
pub use messages::{AnswerRequest, PageEvent};
pub use patch::{PresentationPatch, RowPatch};
pub use session::{AnnotationState, PageSession};
