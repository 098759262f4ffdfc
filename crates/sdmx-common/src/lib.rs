pub mod polars_utils;

pub use polars_utils::{
    any_to_f64, any_to_string, any_to_string_non_empty, format_numeric, is_missing_value,
    is_numeric_dtype, parse_f64,
};
