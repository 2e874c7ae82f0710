pub mod answer;
pub mod question;
pub mod settings;

pub use answer::{CompletionAnswer, PanelState};
pub use question::{Question, QuestionBody, QuestionType, Transcript};
pub use settings::{AnswerSource, DisplayMode, Provider, Settings, SettingsChange, HIGHLIGHT_COLOR};
