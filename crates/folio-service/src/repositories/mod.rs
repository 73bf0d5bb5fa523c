pub mod documents;
pub mod paging;
pub mod traits;

pub use documents::SqliteDocumentStore;
pub use paging::paginate_documents;
pub use traits::{DocumentCursor, DocumentQuery, DocumentStore};
