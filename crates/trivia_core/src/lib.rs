pub mod cache;
pub mod dedup;
pub mod domain;
pub mod ports;
pub mod text;

pub use cache::QuestionCache;
pub use dedup::DedupWindow;
pub use domain::{
    AnswerResult, Notice, NoticeAction, PollInterval, PresentationOptions, QuestionId,
    QuestionPrompt, Sound, TriviaQuestion, UserResponse, DEFAULT_ACTION_IDENTIFIER,
    DISMISS_ACTION_IDENTIFIER,
};
pub use ports::{
    FetchError, NotificationGateway, PortError, PortResult, ResponseStream, SettingsStore,
    TriviaSource,
};
