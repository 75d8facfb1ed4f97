pub mod document;
pub mod entities;
pub mod enums;
pub mod patient;

pub use document::*;
pub use entities::*;
pub use enums::*;
pub use patient::*;
