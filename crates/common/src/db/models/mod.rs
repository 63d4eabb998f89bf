//! SeaORM entity models
//!
//! Database entities for PaperDesk

mod paper;
mod user_library;
mod library_paper;
mod model_provider;

pub use paper::{
    Entity as PaperEntity,
    Model as Paper,
    ActiveModel as PaperActiveModel,
    Column as PaperColumn,
};

pub use user_library::{
    Entity as UserLibraryEntity,
    Model as UserLibrary,
    ActiveModel as UserLibraryActiveModel,
    Column as UserLibraryColumn,
    DEFAULT_LIBRARY_NAME,
};

pub use library_paper::{
    Entity as LibraryPaperEntity,
    ActiveModel as LibraryPaperActiveModel,
    Column as LibraryPaperColumn,
};

pub use model_provider::{
    Entity as ModelProviderEntity,
    Model as ModelProvider,
    ActiveModel as ModelProviderActiveModel,
    Column as ModelProviderColumn,
};
