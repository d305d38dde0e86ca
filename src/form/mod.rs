//! Form binding - maps page fields to the pricing calculator and back

pub mod binding;
pub mod fields;
pub mod snapshot;

pub use binding::{read_inputs, recalculate, write_outputs, FormSink, FormSource, FormUpdate};
pub use fields::{FieldId, FieldKind};
pub use snapshot::{FieldText, FormError, FormSnapshot, GearItem};
