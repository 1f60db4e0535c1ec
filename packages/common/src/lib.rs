pub mod error;
pub mod issue;
pub mod result;
pub mod section;
pub mod slug;
pub mod tags;

pub use error::*;
pub use issue::*;
pub use result::*;
pub use section::*;
pub use slug::*;
pub use tags::*;
