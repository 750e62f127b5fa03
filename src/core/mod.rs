// Core interaction exports
pub mod controller;
pub mod dispatcher;
pub mod error;
pub mod feed;
pub mod introductions;
pub mod search;
pub mod sequence;
pub mod store;

pub use controller::{MatchController, ReadPath};
pub use dispatcher::{DispatchOutcome, InteractionDispatcher, UserAction};
pub use error::{ErrorKind, InteractionError};
pub use feed::CuratedFeed;
pub use introductions::IntroductionTracker;
pub use search::DiscoverySearch;
pub use sequence::{FetchOutcome, RequestSequence};
pub use store::{CandidateListStore, RemovalSnapshot, SharedStore};
