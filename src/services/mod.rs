// Service exports
pub mod appwrite;
pub mod classifier;
pub mod history;
pub mod inventory;

pub use appwrite::AppwriteInventory;
pub use classifier::{QueryClassifier, ChatCompletionsClassifier, ValidationServiceClient, ClassifierError};
pub use history::{HistoryStore, PostgresHistory, HistoryError};
pub use inventory::{InventorySource, StaticInventory, InventoryError};
