pub mod coerce;
pub mod dates;
pub mod field_map;
pub mod pagination;
pub mod pii;

pub use coerce::{parse_float, parse_int, to_bool};
pub use field_map::{normalize, pick, FieldKind, FieldRule, FlatRecord, FormValue};
pub use pagination::unwrap_list;
pub use pii::Masked;
