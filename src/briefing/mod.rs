//! Briefing pipeline
//!
//! - Assembler: concurrent data gathering, prompt construction, generator call
//! - Sections: coercion of generated markup into the three-section layout

pub mod assembler;
pub mod sections;

pub use assembler::{BriefingAssembler, LookbackWindows, briefing_prompt};
pub use sections::SectionNormalizer;
