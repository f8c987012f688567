pub mod dictionary;

pub use dictionary::{PRIORITY_ORDER_KEY, RenderUnit, TemplateDictionary};
