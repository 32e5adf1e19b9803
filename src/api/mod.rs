pub mod nominatim;
pub mod table;

#[cfg(test)]
pub(crate) mod test_support;

pub use nominatim::{BoundaryError, BoundarySource, fetch_boundary, resolve_boundary};
pub use table::{TableOutcome, submit_points};
