/// User administration core for the storefront admin screens.
///
/// - **Cache**: the single-subject aggregate read model with in-place patching
/// - **Coalesce**: single-flight guard so concurrent reads share one fetch
/// - **Backend**: reqwest client for the `/users` REST endpoints
/// - **Session**: logout / expiry broadcast that clears the cache
pub mod backend;
pub mod cache;
pub mod coalesce;
pub mod session;

pub use backend::HttpUserBackend;
pub use cache::AggregateCache;
pub use coalesce::FetchCoalescer;
pub use session::SessionBus;
