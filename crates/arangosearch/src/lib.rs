//! Structured search for a single ArangoDB collection.
//!
//! Search terms, sorts and limits are compiled into AQL, then run through an
//! [`AqlDatabase`] implementation by one of three builders:
//!
//! - [`count`]: number of matching documents,
//! - [`find`]: first matching document,
//! - [`search`]: total count, matching documents and the query that fetched them.
//!
//! ```no_run
//! use arangosearch::{search, AqlDatabase, Filter, Limit, Terms};
//!
//! async fn adults<DB: AqlDatabase>(db: &DB) -> Result<u64, arangosearch::SearchError<DB::Error>> {
//!     let terms = Terms::new().filter("age", Filter::new().gte(18));
//!     let result = search(db, "people")
//!         .run(Some(&terms), Some(Limit::new(10)), None, None)
//!         .await?;
//!     Ok(result.total)
//! }
//! ```
//!
//! The compilers are usable on their own:
//!
//! ```
//! use arangosearch::{parse_terms, Filter, Terms};
//!
//! let terms = Terms::new().group("address", Terms::new().filter("city", Filter::new().eq("Rome")));
//! assert_eq!(parse_terms(&terms, "i"), vec!["i.address.city == \"Rome\""]);
//! ```

pub mod aql;
pub mod config;
pub mod db;
pub mod error;
pub mod filter;
pub mod limit;
pub mod query;
pub mod sort;
pub mod terms;
pub mod value;

pub use aql::{Aql, AqlQuery};
pub use config::SearchConfig;
pub use db::{all_values, cursor_from_rows, next_value, AqlDatabase, Cursor};
pub use error::{CompileError, ConfigError, SearchError};
pub use filter::{operator_map, operators, parse_filter, Filter, Mode, Operator};
pub use limit::{parse_limit, Limit};
pub use query::{count, find, search, Count, Find, Inject, Search, SearchResult};
pub use sort::{parse_sort, Direction, Sort, SortField};
pub use terms::{parse_terms, Term, Terms};
pub use value::{format_data, format_value, Data, Scalar};
