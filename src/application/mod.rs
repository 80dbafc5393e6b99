pub mod tutor_engine;

pub use tutor_engine::{ReplyKind, TutorEngine, TutorReply};
