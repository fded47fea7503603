pub mod chat;
pub mod products;
pub mod symptoms;

pub use chat::{ChatError, ChatReply, ChatService};
pub use products::{ProductService, SearchType};
pub use symptoms::{SymptomChecker, SymptomError, SymptomReport};
