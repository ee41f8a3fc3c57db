//! Entity model: categories, templates, and the timed records under them.
//!
//! ## Schema
//!
//! ```text
//! Category (1) ──owns──< TemplateSet ──< Template (N)
//!     │
//!     ├──< Comparison  (by Name)   ──ref──> Template
//!     ├──< Performance (by Moment) ──ref──> Template
//!     └──< Practice    (by Moment) ──ref──> Template
//! ```
//!
//! Dependent records hold a [`TemplateId`] handle rather than a reference;
//! deleting a template leaves dependents with a stale handle that resolution
//! reports as [`Error::KeyNotFound`](crate::Error::KeyNotFound).
//!
//! ## Serialization
//!
//! Every entity speaks the two-phase [`Entity`] contract: identity fields
//! (key, size, template reference by name) are written and read only when a
//! brand-new object is being built; content fields (sequence bodies, the
//! practice sample) are handled on every pass. Template names inside a
//! serialized category resolve through a borrow-scoped [`ImportCx`] holding
//! the template set of the category under construction.

mod category;
mod comparison;
mod keyed;
mod name;
mod performance;
mod practice;
mod template;

pub use category::Category;
pub use comparison::Comparison;
pub use keyed::{Keyed, KeyedMap};
pub use name::Name;
pub use performance::Performance;
pub use practice::Practice;
pub use template::{Template, TemplateId, TemplateSet};

use std::io::{BufRead, Write};

use crate::codec::{TokenReader, TokenWriter};
use crate::Result;

/// Borrow-scoped view of the template set of the category being exported.
///
/// Dependent records serialize their template reference as the template's
/// name, which only the owning category can supply.
pub struct ExportCx<'a> {
    /// Templates of the category being exported.
    pub templates: &'a TemplateSet,
}

/// Borrow-scoped view of the template set of the category being imported.
///
/// Nested records reference templates by name only; while the owning
/// category is still under construction this context is the single path to
/// the already-imported templates. It lives exactly as long as the import
/// call chain, so it is released on success and failure alike, and nested
/// imports of independent categories are legal.
pub struct ImportCx<'a> {
    /// Templates imported so far for the category under construction.
    pub templates: &'a TemplateSet,
}

/// Two-phase serialization contract shared by every entity.
pub trait Entity: Sized {
    /// Write this entity to the token stream.
    ///
    /// When `new_object` is true the identity fields (key, declared size,
    /// template reference by name) are written first; content fields are
    /// always written.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`](crate::Error::KeyNotFound) for a stale
    /// template handle and [`Error::Io`](crate::Error::Io) on write failure.
    fn export_full<W: Write>(
        &self,
        w: &mut TokenWriter<W>,
        cx: &ExportCx<'_>,
        new_object: bool,
    ) -> Result<()>;

    /// Read identity fields and build a brand-new entity, then read content.
    ///
    /// # Errors
    ///
    /// Fails if identity tokens are missing or malformed, if a referenced
    /// template is not present in `cx`, or if content parsing fails.
    fn import_new<R: BufRead>(r: &mut TokenReader<R>, cx: &ImportCx<'_>) -> Result<Self>;

    /// Read only content fields into this existing entity, leaving its key
    /// and template reference untouched.
    ///
    /// # Errors
    ///
    /// Fails if content tokens are missing or malformed; the entity is
    /// unchanged in that case.
    fn import_into<R: BufRead>(&mut self, r: &mut TokenReader<R>) -> Result<()>;
}
