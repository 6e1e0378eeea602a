//! Service layer: persistence, submission recording and outbound notifications.

pub mod notifications;
pub mod recorder;
pub mod storage;

pub use notifications::{LogOnlyNotifier, Notifier, ResendNotifier};
pub use recorder::{SubmissionError, SubmissionRecorder};
pub use storage::{PgStorage, Storage, StorageError};
