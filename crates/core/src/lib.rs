pub mod archive;
pub mod content;
pub mod error;
pub mod export;
pub mod human;
pub mod materialize;
pub mod model;
pub mod parser;
pub mod render;
pub mod serialize;

pub use archive::*;
pub use content::*;
pub use error::*;
pub use materialize::*;
pub use model::*;
pub use parser::*;
pub use render::*;
pub use serialize::*;
