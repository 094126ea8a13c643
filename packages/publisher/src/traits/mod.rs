//! Collaborator trait abstractions.
//!
//! Everything the pipeline talks to over a network sits behind one of
//! these seams, so a batch can run against mocks in tests.

pub mod ai;
pub mod index;
pub mod notify;
pub mod publish;
pub mod source;

pub use ai::AI;
pub use index::Indexer;
pub use notify::{LogNotifier, Notifier, NullNotifier};
pub use publish::Publisher;
pub use source::JobSource;
