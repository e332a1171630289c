pub mod length;
pub mod parsers;
pub mod var;

pub use length::{Length, LengthUnit};
pub use parsers::{StyleParseError, parse_int_prefix};
pub use var::{VarReference, contains_var, substitute_vars};
