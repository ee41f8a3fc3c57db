//! Category - the root aggregate holding one game/category's data.

use std::io::{BufRead, Write};

use crate::codec::{TokenReader, TokenWriter};
use crate::Result;

use super::{
    Comparison, ExportCx, ImportCx, KeyedMap, Name, Performance, Practice, Template, TemplateId,
    TemplateSet,
};

/// Root aggregate: a named category owning its templates and every record
/// made against them.
///
/// The category is the serialization unit. Export writes the name, the
/// template set, then the three dependent containers; import rebuilds them in
/// the same order so template references always resolve against templates
/// read earlier in the stream.
#[derive(Debug, Clone)]
pub struct Category {
    name: Name,
    templates: TemplateSet,
    comparisons: KeyedMap<Comparison>,
    performances: KeyedMap<Performance>,
    practices: KeyedMap<Practice>,
}

impl Category {
    /// Empty category.
    #[must_use]
    pub fn new(name: Name) -> Self {
        Self {
            name,
            templates: TemplateSet::new(),
            comparisons: KeyedMap::new(),
            performances: KeyedMap::new(),
            practices: KeyedMap::new(),
        }
    }

    /// The category's name.
    #[must_use]
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// The owned templates.
    #[must_use]
    pub fn templates(&self) -> &TemplateSet {
        &self.templates
    }

    /// Exclusive access to the owned templates.
    pub fn templates_mut(&mut self) -> &mut TemplateSet {
        &mut self.templates
    }

    /// The named comparisons.
    #[must_use]
    pub fn comparisons(&self) -> &KeyedMap<Comparison> {
        &self.comparisons
    }

    /// Exclusive access to the named comparisons.
    pub fn comparisons_mut(&mut self) -> &mut KeyedMap<Comparison> {
        &mut self.comparisons
    }

    /// The recorded performances.
    #[must_use]
    pub fn performances(&self) -> &KeyedMap<Performance> {
        &self.performances
    }

    /// Exclusive access to the recorded performances.
    pub fn performances_mut(&mut self) -> &mut KeyedMap<Performance> {
        &mut self.performances
    }

    /// The practice samples.
    #[must_use]
    pub fn practices(&self) -> &KeyedMap<Practice> {
        &self.practices
    }

    /// Exclusive access to the practice samples.
    pub fn practices_mut(&mut self) -> &mut KeyedMap<Practice> {
        &mut self.practices
    }

    /// Write the whole category to the token stream.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`](crate::Error::Io) on write failure and
    /// [`Error::KeyNotFound`](crate::Error::KeyNotFound) if a dependent
    /// record holds a stale template handle.
    pub fn export_full<W: Write>(&self, w: &mut TokenWriter<W>) -> Result<()> {
        w.token(&self.name)?;
        w.end_line()?;
        let cx = ExportCx {
            templates: &self.templates,
        };
        self.templates.export_full(w, &cx)?;
        self.comparisons.export_full(w, &cx)?;
        self.performances.export_full(w, &cx)?;
        self.practices.export_full(w, &cx)?;
        Ok(())
    }

    /// Read a whole category from the token stream.
    ///
    /// Phase order mirrors export: the template set is fully built before any
    /// dependent container reads, so every template reference resolves
    /// against templates already in hand.
    ///
    /// # Errors
    ///
    /// Propagates container and entity import errors; the partially built
    /// category is discarded on failure.
    pub fn import_full<R: BufRead>(r: &mut TokenReader<R>) -> Result<Self> {
        let name: Name = r.next_parsed("category name")?;
        let templates = TemplateSet::import_full(r)?;
        let cx = ImportCx {
            templates: &templates,
        };
        let comparisons = KeyedMap::import_full(r, &cx)?;
        let performances = KeyedMap::import_full(r, &cx)?;
        let practices = KeyedMap::import_full(r, &cx)?;
        Ok(Self {
            name,
            templates,
            comparisons,
            performances,
            practices,
        })
    }
}

fn template_name(set: &TemplateSet, id: TemplateId) -> Option<&Name> {
    set.resolve(id).ok().map(Template::name)
}

// Handle values are arena-local, so equality goes through resolved template
// names instead of raw handles.
impl PartialEq for Category {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.templates == other.templates
            && self.comparisons.len() == other.comparisons.len()
            && self
                .comparisons
                .values()
                .zip(other.comparisons.values())
                .all(|(a, b)| {
                    a.name() == b.name()
                        && a.times() == b.times()
                        && template_name(&self.templates, a.template())
                            == template_name(&other.templates, b.template())
                })
            && self.performances.len() == other.performances.len()
            && self
                .performances
                .values()
                .zip(other.performances.values())
                .all(|(a, b)| {
                    a.moment() == b.moment()
                        && a.times() == b.times()
                        && template_name(&self.templates, a.template())
                            == template_name(&other.templates, b.template())
                })
            && self.practices.len() == other.practices.len()
            && self
                .practices
                .values()
                .zip(other.practices.values())
                .all(|(a, b)| {
                    a.moment() == b.moment()
                        && a.index() == b.index()
                        && a.time() == b.time()
                        && template_name(&self.templates, a.template())
                            == template_name(&other.templates, b.template())
                })
    }
}
