//! Resource namespaces of the async client. Each one borrows the client's
//! transport and maps one or more endpoints to typed calls.

mod audio;
mod characters;
mod chat;
mod embeddings;
mod images;
mod models;
mod video;

pub use audio::{Audio, Speech, Transcriptions};
pub use characters::Characters;
pub use chat::{Chat, Completions};
pub use embeddings::Embeddings;
pub use images::Images;
pub use models::Models;
pub use video::Video;
