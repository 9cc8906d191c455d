//! Repository implementations for all Docq entities.

pub mod message;
pub mod settings;
pub mod space;
pub mod thread;

pub use message::MessageRepository;
pub use settings::SettingsRepository;
pub use space::SpaceRepository;
pub use thread::ThreadRepository;
