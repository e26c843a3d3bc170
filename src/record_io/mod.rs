//! Record-level assembly and decode (spec §4.3), sitting between raw event
//! bytes (from `tree::EventTree::serialize`) and the file-level writer and
//! reader.

pub mod record_input;
pub mod record_output;

pub use record_input::RecordInput;
pub use record_output::RecordOutput;
