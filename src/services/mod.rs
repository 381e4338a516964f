// Service exports
pub mod chat;
pub mod documents;
pub mod location;
pub mod storage;

pub use chat::{language_name, ChatClient, ChatError, FALLBACK_REPLY, LANGUAGES};
pub use documents::{render_bail_application, BailApplicationFields, DocumentError};
pub use location::{IpGeolocationSensor, LocationProvider, LocationSensor, SensorError};
pub use storage::{StorageError, StoredState, TranscriptStore};
