pub mod backend;
pub mod file;
pub mod wav;

pub use backend::{AudioBackend, AudioBackendConfig, AudioFrame};
pub use file::AudioFile;
pub use wav::encode_wav;
