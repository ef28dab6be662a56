//! Tag construction: element descriptions, the live Node Factory and the
//! static string renderer.

pub mod el;
pub mod factory;
pub mod options;
pub mod static_tags;

pub use el::{el, Arg, Child, El, Markup, Prop, Ref};
pub use factory::Tags;
pub use options::{AttrHook, TagsOptions};
pub use static_tags::{use_static_tags, StaticTags};
