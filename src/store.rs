//! Store - the operation surface over one active category.
//!
//! Every mutating operation validates its inputs before touching the
//! category, so a failed call leaves the store exactly as it was.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use tracing::{debug, info};

use crate::codec::{TokenReader, TokenWriter};
use crate::model::{
    Category, Comparison, Entity, Name, Performance, Practice, Template, TemplateId,
};
use crate::time::{Moment, Period};
use crate::{Error, Result};

/// Name given to the category a fresh store starts with.
const EMPTY_CATEGORY: &str = "EMPTY";

/// In-memory store holding one active category and exposing every operation
/// on it.
#[derive(Debug, Clone, PartialEq)]
pub struct Store {
    category: Category,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    /// Store with an empty placeholder category.
    #[must_use]
    pub fn new() -> Self {
        Self {
            category: Category::new(Name::from_trusted(EMPTY_CATEGORY.to_string())),
        }
    }

    /// The active category.
    #[must_use]
    pub fn category(&self) -> &Category {
        &self.category
    }

    /// Exclusive access to the active category.
    pub fn category_mut(&mut self) -> &mut Category {
        &mut self.category
    }

    /// Discard the active category and start a fresh one under `name`.
    pub fn replace_category(&mut self, name: Name) {
        info!(category = %name, "replacing active category");
        self.category = Category::new(name);
    }

    /// Parse a moment token, honoring the case-insensitive `now` shorthand.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedToken`] for anything else that does not
    /// parse as a timestamp.
    pub fn parse_moment(token: &str) -> Result<Moment> {
        Moment::parse_with_now(token)
    }

    // --- templates ---

    /// Create a template with `size` checkpoints.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NonPositiveSize`] for `size <= 0` and
    /// [`Error::KeyConflict`] if the name is taken.
    pub fn create_template(&mut self, name: Name, size: i64) -> Result<TemplateId> {
        if size <= 0 {
            return Err(Error::NonPositiveSize {
                context: format!("template {name}"),
                size,
            });
        }
        #[allow(clippy::cast_sign_loss)]
        let template = Template::new(name, size as usize)?;
        debug!(template = %template.name(), size, "creating template");
        self.category.templates_mut().add(template)
    }

    /// Look up a template by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the name is absent.
    pub fn template(&self, name: &Name) -> Result<&Template> {
        self.category.templates().get(name)
    }

    /// Remove a template by name.
    ///
    /// Dependent records keep their handles; they go stale and fail at the
    /// next resolution.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the name is absent.
    pub fn remove_template(&mut self, name: &Name) -> Result<Template> {
        debug!(template = %name, "removing template");
        self.category.templates_mut().remove(name)
    }

    /// Replace all checkpoint labels of a template from the token stream.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the name is absent; a malformed
    /// stream leaves the template untouched.
    pub fn fill_template<R: BufRead>(&mut self, name: &Name, r: &mut TokenReader<R>) -> Result<()> {
        self.category.templates_mut().get_mut(name)?.import_into(r)
    }

    /// Rename one checkpoint of a template.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the name is absent and
    /// [`Error::IndexOutOfRange`] if `index` is out of bounds.
    pub fn rename_template_at(&mut self, name: &Name, index: usize, label: Name) -> Result<()> {
        self.category
            .templates_mut()
            .get_mut(name)?
            .rename_at(index, label)
    }

    /// Copy all checkpoint labels from one template onto another.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if either name is absent and
    /// [`Error::SizeMismatch`] if the sizes differ; nothing is written in
    /// those cases.
    pub fn copy_template(&mut self, from: &Name, to: &Name) -> Result<()> {
        let labels = self.category.templates().get(from)?.labels().clone();
        self.category
            .templates_mut()
            .get_mut(to)?
            .labels_mut()
            .copy_from(&labels)
    }

    // --- comparisons ---

    /// Create a zero-timed comparison against a template.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the template is absent and
    /// [`Error::KeyConflict`] if the comparison name is taken.
    pub fn create_comparison(&mut self, name: Name, template: &Name) -> Result<()> {
        let id = self.category.templates().id_of(template)?;
        let size = self.category.templates().resolve(id)?.size();
        debug!(comparison = %name, template = %template, "creating comparison");
        self.category
            .comparisons_mut()
            .add(Comparison::new(name, id, size))?;
        Ok(())
    }

    /// Look up a comparison by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the name is absent.
    pub fn comparison(&self, name: &Name) -> Result<&Comparison> {
        self.category.comparisons().get(name)
    }

    /// Remove a comparison by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the name is absent.
    pub fn remove_comparison(&mut self, name: &Name) -> Result<Comparison> {
        self.category.comparisons_mut().remove(name)
    }

    /// Replace all times of a comparison from the token stream.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the name is absent; a malformed
    /// stream leaves the comparison untouched.
    pub fn fill_comparison<R: BufRead>(
        &mut self,
        name: &Name,
        r: &mut TokenReader<R>,
    ) -> Result<()> {
        self.category
            .comparisons_mut()
            .get_mut(name)?
            .import_into(r)
    }

    /// Overwrite one checkpoint time of a comparison.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the name is absent and
    /// [`Error::IndexOutOfRange`] if `index` is out of bounds.
    pub fn retime_comparison_at(&mut self, name: &Name, index: usize, time: Period) -> Result<()> {
        self.category
            .comparisons_mut()
            .get_mut(name)?
            .retime_at(index, time)
    }

    /// Copy all times from one comparison onto another.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if either name is absent and
    /// [`Error::SizeMismatch`] if the sizes differ; nothing is written in
    /// those cases.
    pub fn copy_comparison(&mut self, from: &Name, to: &Name) -> Result<()> {
        let times = self.category.comparisons().get(from)?.times().clone();
        self.category
            .comparisons_mut()
            .get_mut(to)?
            .copy_times_from(&times)
    }

    // --- performances ---

    /// Create a zero-timed performance against a template.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the template is absent and
    /// [`Error::KeyConflict`] if the moment is taken.
    pub fn create_performance(&mut self, moment: Moment, template: &Name) -> Result<()> {
        let id = self.category.templates().id_of(template)?;
        let size = self.category.templates().resolve(id)?.size();
        debug!(moment = %moment, template = %template, "creating performance");
        self.category
            .performances_mut()
            .add(Performance::new(moment, id, size))?;
        Ok(())
    }

    /// Look up a performance by moment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the moment is absent.
    pub fn performance(&self, moment: &Moment) -> Result<&Performance> {
        self.category.performances().get(moment)
    }

    /// Remove a performance by moment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the moment is absent.
    pub fn remove_performance(&mut self, moment: &Moment) -> Result<Performance> {
        self.category.performances_mut().remove(moment)
    }

    /// Replace all times of a performance from the token stream.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the moment is absent; a malformed
    /// stream leaves the performance untouched.
    pub fn fill_performance<R: BufRead>(
        &mut self,
        moment: &Moment,
        r: &mut TokenReader<R>,
    ) -> Result<()> {
        self.category
            .performances_mut()
            .get_mut(moment)?
            .import_into(r)
    }

    /// Overwrite one checkpoint time of a performance.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the moment is absent and
    /// [`Error::IndexOutOfRange`] if `index` is out of bounds.
    pub fn retime_performance_at(
        &mut self,
        moment: &Moment,
        index: usize,
        time: Period,
    ) -> Result<()> {
        self.category
            .performances_mut()
            .get_mut(moment)?
            .retime_at(index, time)
    }

    /// Copy all times from one performance onto another.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if either moment is absent and
    /// [`Error::SizeMismatch`] if the sizes differ; nothing is written in
    /// those cases.
    pub fn copy_performance(&mut self, from: &Moment, to: &Moment) -> Result<()> {
        let times = self.category.performances().get(from)?.times().clone();
        self.category
            .performances_mut()
            .get_mut(to)?
            .copy_times_from(&times)
    }

    // --- practices ---

    /// Create a zero-timed practice sample for one checkpoint of a template.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the template is absent,
    /// [`Error::IndexOutOfRange`] if `index` is beyond the template, and
    /// [`Error::KeyConflict`] if the moment is taken.
    pub fn create_practice(&mut self, moment: Moment, template: &Name, index: usize) -> Result<()> {
        let id = self.category.templates().id_of(template)?;
        let size = self.category.templates().resolve(id)?.size();
        debug!(moment = %moment, template = %template, index, "creating practice");
        self.category
            .practices_mut()
            .add(Practice::new(moment, id, index, size)?)?;
        Ok(())
    }

    /// Look up a practice sample by moment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the moment is absent.
    pub fn practice(&self, moment: &Moment) -> Result<&Practice> {
        self.category.practices().get(moment)
    }

    /// Remove a practice sample by moment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the moment is absent.
    pub fn remove_practice(&mut self, moment: &Moment) -> Result<Practice> {
        self.category.practices_mut().remove(moment)
    }

    /// Overwrite the sampled period of a practice.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the moment is absent.
    pub fn retime_practice(&mut self, moment: &Moment, time: Period) -> Result<()> {
        self.category.practices_mut().get_mut(moment)?.retime(time);
        Ok(())
    }

    /// Copy the sampled period from one practice onto another.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if either moment is absent.
    pub fn copy_practice(&mut self, from: &Moment, to: &Moment) -> Result<()> {
        let time = self.category.practices().get(from)?.time();
        self.category.practices_mut().get_mut(to)?.retime(time);
        Ok(())
    }

    // --- persistence ---

    /// Write the active category to a token stream.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] on write failure.
    pub fn export_category<W: Write>(&self, w: &mut TokenWriter<W>) -> Result<()> {
        self.category.export_full(w)?;
        w.flush()
    }

    /// Read a category from a token stream and make it active.
    ///
    /// The active category is replaced only on success; any import failure
    /// leaves the store untouched.
    ///
    /// # Errors
    ///
    /// Propagates category import errors.
    pub fn import_category<R: BufRead>(&mut self, r: &mut TokenReader<R>) -> Result<()> {
        let category = Category::import_full(r)?;
        info!(category = %category.name(), "imported category");
        self.category = category;
        Ok(())
    }

    /// Write the active category to a file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnopenableFile`] if the file cannot be created and
    /// [`Error::Io`] on write failure.
    pub fn export_to_path(&self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|source| Error::UnopenableFile {
            path: path.display().to_string(),
            source,
        })?;
        let mut w = TokenWriter::new(BufWriter::new(file));
        self.export_category(&mut w)?;
        info!(path = %path.display(), category = %self.category.name(), "exported category");
        Ok(())
    }

    /// Read a category from a file and make it active.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnopenableFile`] if the file cannot be opened;
    /// import failures leave the store untouched.
    pub fn import_from_path(&mut self, path: &Path) -> Result<()> {
        let file = File::open(path).map_err(|source| Error::UnopenableFile {
            path: path.display().to_string(),
            source,
        })?;
        let mut r = TokenReader::new(BufReader::new(file));
        self.import_category(&mut r)?;
        info!(path = %path.display(), category = %self.category.name(), "imported category");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(raw: &str) -> Name {
        Name::new(raw).unwrap()
    }

    fn moment(raw: &str) -> Moment {
        raw.parse().unwrap()
    }

    fn seeded() -> Store {
        let mut store = Store::new();
        store.replace_category(name("Celeste"));
        store.create_template(name("Any%"), 3).unwrap();
        store.create_comparison(name("PB"), &name("Any%")).unwrap();
        store
            .create_performance(moment("06/15/2024@14:30:00.0"), &name("Any%"))
            .unwrap();
        store
            .create_practice(moment("06/16/2024@09:00:00.0"), &name("Any%"), 1)
            .unwrap();
        store
    }

    #[test]
    fn test_fresh_store_has_placeholder_category() {
        let store = Store::new();
        assert_eq!(store.category().name().as_str(), EMPTY_CATEGORY);
        assert!(store.category().templates().is_empty());
    }

    #[test]
    fn test_create_template_rejects_nonpositive_size() {
        let mut store = Store::new();
        assert!(matches!(
            store.create_template(name("Any%"), 0).unwrap_err(),
            Error::NonPositiveSize { size: 0, .. }
        ));
        assert!(matches!(
            store.create_template(name("Any%"), -4).unwrap_err(),
            Error::NonPositiveSize { size: -4, .. }
        ));
        assert!(store.category().templates().is_empty());
    }

    #[test]
    fn test_duplicate_template_leaves_store_unchanged() {
        let mut store = seeded();
        let before = store.clone();
        assert!(matches!(
            store.create_template(name("Any%"), 5).unwrap_err(),
            Error::KeyConflict(_)
        ));
        assert_eq!(store, before);
    }

    #[test]
    fn test_comparison_lifecycle() {
        let mut store = seeded();
        store
            .retime_comparison_at(&name("PB"), 0, Period::from_seconds(90.0))
            .unwrap();
        store
            .retime_comparison_at(&name("PB"), 1, Period::from_seconds(195.0))
            .unwrap();
        assert_eq!(
            store
                .comparison(&name("PB"))
                .unwrap()
                .times()
                .sum_as_prefix(0, 1)
                .unwrap(),
            Period::from_seconds(105.0)
        );

        store.create_comparison(name("Gold"), &name("Any%")).unwrap();
        store.copy_comparison(&name("PB"), &name("Gold")).unwrap();
        assert_eq!(
            store.comparison(&name("Gold")).unwrap().times(),
            store.comparison(&name("PB")).unwrap().times()
        );

        store.remove_comparison(&name("Gold")).unwrap();
        assert!(store.comparison(&name("Gold")).is_err());
    }

    #[test]
    fn test_fill_comparison_from_tokens() {
        let mut store = seeded();
        let mut r = TokenReader::new("00:01:30.0 00:03:15.0 00:05:00.0".as_bytes());
        store.fill_comparison(&name("PB"), &mut r).unwrap();
        assert_eq!(
            store.comparison(&name("PB")).unwrap().times()[2],
            Period::from_seconds(300.0)
        );
    }

    #[test]
    fn test_practice_index_validated_against_template() {
        let mut store = seeded();
        assert!(matches!(
            store
                .create_practice(moment("06/17/2024@09:00:00.0"), &name("Any%"), 5)
                .unwrap_err(),
            Error::IndexOutOfRange { index: 5, size: 3 }
        ));
    }

    #[test]
    fn test_removed_template_dangles_dependents() {
        let mut store = seeded();
        store.remove_template(&name("Any%")).unwrap();
        assert!(store.template(&name("Any%")).is_err());

        // comparison still present but its handle no longer resolves
        let c = store.comparison(&name("PB")).unwrap();
        assert!(store.category().templates().resolve(c.template()).is_err());

        // exporting now fails instead of writing a broken reference
        let mut w = TokenWriter::new(Vec::new());
        assert!(store.export_category(&mut w).is_err());
    }

    #[test]
    fn test_stream_round_trip() {
        let mut store = seeded();
        store
            .retime_performance_at(
                &moment("06/15/2024@14:30:00.0"),
                2,
                Period::from_seconds(298.1),
            )
            .unwrap();

        let mut w = TokenWriter::new(Vec::new());
        store.export_category(&mut w).unwrap();
        let written = w.into_inner();

        let mut copy = Store::new();
        let mut r = TokenReader::new(written.as_slice());
        copy.import_category(&mut r).unwrap();
        assert_eq!(copy.category(), store.category());
    }

    #[test]
    fn test_failed_import_keeps_active_category() {
        let mut store = seeded();
        let before = store.clone();
        let mut r = TokenReader::new("Broken 1 Any% not-a-size".as_bytes());
        assert!(store.import_category(&mut r).is_err());
        assert_eq!(store, before);
    }

    #[test]
    fn test_parse_moment_now_shorthand() {
        assert!(Store::parse_moment("NOW").is_ok());
        assert!(Store::parse_moment("now").is_ok());
        assert!(Store::parse_moment("06/15/2024@14:30:00.0").is_ok());
        assert!(Store::parse_moment("yesterday").is_err());
    }
}
