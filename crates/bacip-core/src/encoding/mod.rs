pub mod primitives;
pub mod reader;
pub mod tag;
pub mod writer;

pub use reader::Reader;
pub use writer::Writer;
