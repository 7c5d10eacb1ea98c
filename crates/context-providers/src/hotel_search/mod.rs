//! Hotel search: prompt -> structured query -> autocomplete -> search.

mod parser;
mod provider;
mod query;

pub use parser::{hotel_query_system_prompt, HotelQueryParser, HotelQueryParsing};
pub use provider::{HotelSearchProvider, HOTEL_SEARCH_CONTEXT};
pub use query::HotelSearchQuery;
