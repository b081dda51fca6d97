/// Shared types, traits, and errors for the storefront admin core.
///
/// This crate is the foundation the other storefront crates depend on.
/// It contains:
/// - **Trait contracts** (`traits`) for the dialog host and the user backend
/// - **Shared data types** (`models`) for confirmations and the aggregate read model
/// - **Error types** (`errors`) and the degrade-on-failure `Outcome`
/// - **Config types** (`config`, `config_loader`) for `storefront.yaml`
pub mod config;
pub mod config_loader;
pub mod errors;
pub mod models;
pub mod outcome;
pub mod traits;

// Re-export commonly used types at the crate root for convenience.
pub use errors::StorefrontError;
pub use models::*;
pub use outcome::Outcome;
pub use traits::*;
