mod auth;
mod export;
mod session;

pub use auth::TokenManager;
pub use export::ExportSink;
pub use export::RAW_EXPORT_FILE;
pub use export::RECORDS_EXPORT_FILE;
pub use session::SessionId;
pub use session::SessionStore;
