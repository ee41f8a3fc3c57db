//! Templates and the generational set that owns them.

use std::collections::BTreeMap;
use std::fmt;
use std::io::{BufRead, Write};

use crate::codec::{TokenReader, TokenWriter};
use crate::seq::LabelSeq;
use crate::{Error, Result};

use super::{Entity, ExportCx, ImportCx, Keyed, Name};

/// Route definition: a name plus a fixed-length sequence of checkpoint labels.
///
/// The size is set at construction and never changes; every dependent record
/// created against this template allocates its arrays at the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    name: Name,
    labels: LabelSeq,
}

impl Template {
    /// New template with `size` sentinel labels.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NonPositiveSize`] for a zero size.
    pub fn new(name: Name, size: usize) -> Result<Self> {
        if size == 0 {
            return Err(Error::NonPositiveSize {
                context: format!("template {name}"),
                size: 0,
            });
        }
        Ok(Self {
            name,
            labels: LabelSeq::defaulted(size),
        })
    }

    /// The template's name.
    #[must_use]
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// Number of checkpoints.
    #[must_use]
    pub fn size(&self) -> usize {
        self.labels.len()
    }

    /// The checkpoint labels.
    #[must_use]
    pub fn labels(&self) -> &LabelSeq {
        &self.labels
    }

    /// Exclusive access to the checkpoint labels.
    pub fn labels_mut(&mut self) -> &mut LabelSeq {
        &mut self.labels
    }

    /// Rename one checkpoint.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index >= size`.
    pub fn rename_at(&mut self, index: usize, label: Name) -> Result<()> {
        self.labels.set(index, label)
    }
}

impl Keyed for Template {
    type Key = Name;

    fn key(&self) -> &Name {
        &self.name
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.size())?;
        for label in self.labels.iter() {
            write!(f, " {label}")?;
        }
        Ok(())
    }
}

impl Entity for Template {
    fn export_full<W: Write>(
        &self,
        w: &mut TokenWriter<W>,
        _cx: &ExportCx<'_>,
        new_object: bool,
    ) -> Result<()> {
        if new_object {
            w.token(&self.name)?;
            w.token(self.size())?;
        }
        self.labels.write_content(w)?;
        Ok(())
    }

    fn import_new<R: BufRead>(r: &mut TokenReader<R>, _cx: &ImportCx<'_>) -> Result<Self> {
        let name: Name = r.next_parsed("template name")?;
        let size = r.next_size("template size")?;
        let mut template = Self::new(name, size)?;
        template.import_into(r)?;
        Ok(template)
    }

    fn import_into<R: BufRead>(&mut self, r: &mut TokenReader<R>) -> Result<()> {
        self.labels.read_content(r, "template split label")
    }
}

/// Stable handle to a template slot.
///
/// A handle survives unrelated insertions and removals; it goes stale only
/// when its own template is removed, and a stale handle is reported at
/// [`TemplateSet::resolve`] time rather than at removal time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TemplateId {
    slot: usize,
    generation: u64,
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.slot, self.generation)
    }
}

#[derive(Debug, Clone, Default)]
struct Slot {
    generation: u64,
    template: Option<Template>,
}

/// Arena of templates addressed by handle, with a by-name index.
///
/// Removal bumps the slot generation, so a handle taken before the removal
/// can never silently alias a template that later reuses the slot.
#[derive(Debug, Clone, Default)]
pub struct TemplateSet {
    slots: Vec<Slot>,
    by_name: BTreeMap<Name, TemplateId>,
}

impl TemplateSet {
    /// Empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live templates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Whether the set holds no templates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Whether a template with this name is present.
    #[must_use]
    pub fn contains(&self, name: &Name) -> bool {
        self.by_name.contains_key(name)
    }

    /// Insert a template, returning its handle.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyConflict`] if the name is taken; the set is
    /// unchanged in that case.
    pub fn add(&mut self, template: Template) -> Result<TemplateId> {
        if self.by_name.contains_key(template.name()) {
            return Err(Error::KeyConflict(template.name().to_string()));
        }
        let name = template.name().clone();
        let id = match self.slots.iter().position(|slot| slot.template.is_none()) {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.template = Some(template);
                TemplateId {
                    slot: index,
                    generation: slot.generation,
                }
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    template: Some(template),
                });
                TemplateId {
                    slot: self.slots.len() - 1,
                    generation: 0,
                }
            }
        };
        self.by_name.insert(name, id);
        Ok(id)
    }

    /// Handle for a template by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the name is absent.
    pub fn id_of(&self, name: &Name) -> Result<TemplateId> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| Error::KeyNotFound(name.to_string()))
    }

    /// Shared lookup by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the name is absent.
    pub fn get(&self, name: &Name) -> Result<&Template> {
        self.resolve(self.id_of(name)?)
    }

    /// Exclusive lookup by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the name is absent.
    pub fn get_mut(&mut self, name: &Name) -> Result<&mut Template> {
        self.resolve_mut(self.id_of(name)?)
    }

    /// Shared lookup by handle.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] for a stale or foreign handle.
    pub fn resolve(&self, id: TemplateId) -> Result<&Template> {
        self.slots
            .get(id.slot)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.template.as_ref())
            .ok_or_else(|| Error::KeyNotFound(format!("template handle {id}")))
    }

    /// Exclusive lookup by handle.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] for a stale or foreign handle.
    pub fn resolve_mut(&mut self, id: TemplateId) -> Result<&mut Template> {
        self.slots
            .get_mut(id.slot)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.template.as_mut())
            .ok_or_else(|| Error::KeyNotFound(format!("template handle {id}")))
    }

    /// Remove a template by name.
    ///
    /// Handles held by dependents are not chased down here; they go stale
    /// and fail at their next resolution.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the name is absent.
    pub fn remove(&mut self, name: &Name) -> Result<Template> {
        let id = self.id_of(name)?;
        self.by_name.remove(name);
        let slot = &mut self.slots[id.slot];
        slot.generation += 1;
        slot.template
            .take()
            .ok_or_else(|| Error::KeyNotFound(name.to_string()))
    }

    /// Fold every template of `other` into this set.
    ///
    /// All-or-nothing: every incoming name is checked before anything is
    /// inserted. Handles into `other` do not carry over.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyConflict`] naming the first colliding name.
    pub fn merge_from(&mut self, other: Self) -> Result<()> {
        if let Some(dup) = other.by_name.keys().find(|name| self.contains(name)) {
            return Err(Error::KeyConflict(dup.to_string()));
        }
        for template in other.into_templates() {
            self.add(template)?;
        }
        Ok(())
    }

    /// Templates in ascending name order.
    pub fn iter(&self) -> impl Iterator<Item = &Template> {
        self.by_name.values().map(|id| {
            self.slots[id.slot]
                .template
                .as_ref()
                .unwrap_or_else(|| unreachable!("by-name index points at empty slot"))
        })
    }

    fn into_templates(mut self) -> Vec<Template> {
        self.by_name
            .values()
            .map(|id| id.slot)
            .collect::<Vec<_>>()
            .into_iter()
            .filter_map(|slot| self.slots[slot].template.take())
            .collect()
    }

    /// Write the template count, then every template, in name order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] on write failure.
    pub fn export_full<W: Write>(&self, w: &mut TokenWriter<W>, cx: &ExportCx<'_>) -> Result<()> {
        w.token(self.len())?;
        w.end_line()?;
        for template in self.iter() {
            template.export_full(w, cx, true)?;
            w.end_line()?;
        }
        Ok(())
    }

    /// Read the template count, then every template as a brand-new object.
    ///
    /// # Errors
    ///
    /// Propagates template import errors; duplicate names inside one
    /// serialized blob surface as [`Error::KeyConflict`].
    pub fn import_full<R: BufRead>(r: &mut TokenReader<R>) -> Result<Self> {
        let count = r.next_count("template count")?;
        let mut set = Self::new();
        for _ in 0..count {
            let template = {
                let cx = ImportCx { templates: &set };
                Template::import_new(r, &cx)?
            };
            set.add(template)?;
        }
        Ok(set)
    }
}

impl PartialEq for TemplateSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(raw: &str) -> Name {
        Name::new(raw).unwrap()
    }

    fn template(raw: &str, size: usize) -> Template {
        Template::new(name(raw), size).unwrap()
    }

    #[test]
    fn test_new_rejects_zero_size() {
        assert!(matches!(
            Template::new(name("Any%"), 0).unwrap_err(),
            Error::NonPositiveSize { size: 0, .. }
        ));
    }

    #[test]
    fn test_rename_at() {
        let mut t = template("Any%", 2);
        t.rename_at(1, name("Boss")).unwrap();
        assert_eq!(t.labels()[1].as_str(), "Boss");
        assert!(t.rename_at(2, name("Late")).is_err());
    }

    #[test]
    fn test_set_add_and_lookup() {
        let mut set = TemplateSet::new();
        let id = set.add(template("Any%", 3)).unwrap();
        assert_eq!(set.resolve(id).unwrap().size(), 3);
        assert_eq!(set.get(&name("Any%")).unwrap().size(), 3);
        assert_eq!(set.id_of(&name("Any%")).unwrap(), id);

        assert!(matches!(
            set.add(template("Any%", 5)).unwrap_err(),
            Error::KeyConflict(_)
        ));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_stale_handle_detected_after_removal() {
        let mut set = TemplateSet::new();
        let id = set.add(template("Any%", 3)).unwrap();
        set.remove(&name("Any%")).unwrap();

        assert!(matches!(
            set.resolve(id).unwrap_err(),
            Error::KeyNotFound(_)
        ));

        // slot reuse must not revive the old handle
        let fresh = set.add(template("100%", 4)).unwrap();
        assert_eq!(fresh.slot, id.slot);
        assert!(set.resolve(id).is_err());
        assert_eq!(set.resolve(fresh).unwrap().name().as_str(), "100%");
    }

    #[test]
    fn test_iter_in_name_order() {
        let mut set = TemplateSet::new();
        set.add(template("c", 1)).unwrap();
        set.add(template("a", 1)).unwrap();
        set.add(template("b", 1)).unwrap();
        let names: Vec<&str> = set.iter().map(|t| t.name().as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn test_merge_from_all_or_nothing() {
        let mut left = TemplateSet::new();
        left.add(template("a", 1)).unwrap();

        let mut right = TemplateSet::new();
        right.add(template("a", 2)).unwrap();
        right.add(template("b", 2)).unwrap();
        assert!(left.merge_from(right).is_err());
        assert_eq!(left.len(), 1);
        assert_eq!(left.get(&name("a")).unwrap().size(), 1);

        let mut disjoint = TemplateSet::new();
        disjoint.add(template("b", 2)).unwrap();
        left.merge_from(disjoint).unwrap();
        assert_eq!(left.len(), 2);
    }

    #[test]
    fn test_serialized_round_trip() {
        let mut set = TemplateSet::new();
        let mut any = template("Any%", 2);
        any.rename_at(0, name("Start")).unwrap();
        any.rename_at(1, name("End")).unwrap();
        set.add(any).unwrap();
        set.add(template("100%", 3)).unwrap();

        let mut w = TokenWriter::new(Vec::new());
        let cx = ExportCx { templates: &set };
        set.export_full(&mut w, &cx).unwrap();
        let written = w.into_inner();

        let mut r = TokenReader::new(written.as_slice());
        let copy = TemplateSet::import_full(&mut r).unwrap();
        assert_eq!(copy, set);
    }
}
