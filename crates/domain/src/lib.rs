pub mod annotation;
pub mod command;
pub mod comment;
pub mod datetime;
pub mod error;
pub mod flatten;
pub mod geo;
pub mod mapping;
pub mod pipeline;
pub mod record;

pub use crate::annotation::{merge_frame_annotation, merge_roll_annotation, Annotation};
pub use crate::command::{CommandOptions, FileExtension};
pub use crate::error::ConvertError;
pub use crate::geo::{Coordinate, Dms, Hemisphere};
pub use crate::mapping::{Assignment, TagMapping, Transform};
pub use crate::pipeline::{ExiftoolPipeline, PersonalData};
pub use crate::record::{Fields, Frame, Roll, RollRecord};
