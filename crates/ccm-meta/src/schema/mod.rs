//! Schema definitions for content models, editor interfaces, and locales
//!
//! These types mirror the management API's JSON representation (camelCase
//! keys), so model files can be hand-written or produced by a sync.

pub mod editor;
pub mod locale;
pub mod model;

pub use editor::{Control, EditorInterfaceConfig};
pub use locale::Locale;
pub use model::{ContentModel, Field, FieldType, Items, LinkType};
