//! External retrieval tools used by the research engine.
//!
//! # Module Structure
//!
//! - [`search`](crate::tools::search) - Web search with page content (Firecrawl)
//!
//! # Web Search
//!
//! ```ignore
//! let client = FirecrawlClient::new(options)?;
//! for hit in client.search("rust async runtimes", 5).await {
//!     println!("{:?}", hit.url);
//! }
//! ```

/// Web search returning page content.
pub mod search;

pub use search::{FirecrawlClient, FirecrawlOptions, SearchProvider};
