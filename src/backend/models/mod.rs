pub mod arguments;
pub mod thunk;
pub mod value;

pub use arguments::{Kwargs, Values, CC};
pub use thunk::Thunk;
pub use value::Value;

/// Collapse a positional value list the way the identity continuation returns
/// it: one value stays bare, anything else becomes a tuple.
pub fn collapse(values: Values) -> Value {
    if values.len() == 1 {
        values.into_iter().next().unwrap_or(Value::Nil)
    } else {
        Value::Tuple(values.into_vec())
    }
}
