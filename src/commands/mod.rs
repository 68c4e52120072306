pub mod adopt;
pub mod discover;
pub mod scaffold;

pub use adopt::AdoptCommand;
pub use discover::DiscoverCommand;
pub use scaffold::ScaffoldCommand;
