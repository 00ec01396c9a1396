//! Data models for optionsync

mod option;
mod option_set;

pub use option::{
    negate_toggle, parse_toggle, FieldSpec, OptionGroup, OptionKey, WritePolicy, FIELD_TABLE,
};
pub use option_set::{OptionEntry, OptionSet};
