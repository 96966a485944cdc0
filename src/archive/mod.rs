pub mod loader;
pub mod resolver;

pub use loader::HarArchive;
pub use resolver::{ContentBlock, ContentSize, EntryResolver, ResolvedEntry, TransferEncoding};
