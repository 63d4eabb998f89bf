//! Business services
//!
//! Each service owns a [`Repository`] handle and exposes the operations the
//! HTTP layer delegates to. Services are cheap to clone.

pub mod library;
pub mod pagination;
pub mod papers;
pub mod providers;
pub mod recommend;
pub mod tags;

use crate::db::Repository;
use std::sync::Arc;

pub use library::{AddOutcome, LibraryService, RemoveOutcome};
pub use pagination::{PageRequest, Pagination};
pub use papers::PaperService;
pub use providers::{
    CreateModelProviderInput, ModelProviderService, ModelProviderView, UpdateModelProviderInput,
    API_KEY_PLACEHOLDER,
};
pub use recommend::{InteractionKind, RecommendService, Recommendation, Strategy};

/// A container for all services to be injected into routes
#[derive(Clone)]
pub struct Services {
    pub papers: Arc<PaperService>,
    pub library: Arc<LibraryService>,
    pub recommend: Arc<RecommendService>,
    pub providers: Arc<ModelProviderService>,
}

impl Services {
    pub fn new(repo: Repository) -> Self {
        // Repository clones share the same connection pool
        Self {
            papers: Arc::new(PaperService::new(repo.clone())),
            library: Arc::new(LibraryService::new(repo.clone())),
            recommend: Arc::new(RecommendService::new(repo.clone())),
            providers: Arc::new(ModelProviderService::new(repo)),
        }
    }
}
