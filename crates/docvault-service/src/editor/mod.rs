//! Editor integration: session brokering, save-callback ingestion, and the
//! structured spreadsheet path.

pub mod fetch;
pub mod persist;
pub mod session;
pub mod workbook;

pub use fetch::HttpContentFetcher;
pub use persist::ContentPersister;
pub use session::{EditorSession, EditorSessionService, SaveCallback, SaveOutcome};
pub use workbook::{SheetUpdate, WorkbookService};
