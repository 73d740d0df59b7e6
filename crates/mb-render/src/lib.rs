pub mod copy;
pub mod dump;

pub use copy::{checked_composite_copy, composite_copy, copy_region, copy_with};
pub use dump::{DumpConfig, ascii_rows, to_ascii, to_pbm};
