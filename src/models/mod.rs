pub mod grade;
pub mod result;
pub mod row;

pub use grade::*;
pub use result::*;
pub use row::*;
