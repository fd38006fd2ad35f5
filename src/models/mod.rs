pub mod component;
pub mod export;
pub mod snippet;
pub mod storage;

pub use component::{SnippetCollection, SnippetComponent};
pub use export::{Exporter, import_records};
pub use snippet::{Snippet, SnippetId, normalize_tag};
pub use storage::{
    JsonCodec, MemoryStorage, RecordCodec, SnippetPersistence, SnippetRecord, StorageFormat,
    StorageManager, YamlCodec,
};
