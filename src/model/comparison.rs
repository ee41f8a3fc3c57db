//! Named reference runs against a template.

use std::fmt;
use std::io::{BufRead, Write};

use crate::codec::{TokenReader, TokenWriter};
use crate::seq::IntervalSeq;
use crate::time::Period;
use crate::Result;

use super::{Entity, ExportCx, ImportCx, Keyed, Name, TemplateId};

/// Named target run: cumulative checkpoint times against one template.
///
/// The times array stores the cumulative interpretation, so segment and span
/// queries go through [`IntervalSeq::sum_as_prefix`] and friends.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    name: Name,
    template: TemplateId,
    times: IntervalSeq,
}

impl Comparison {
    /// New comparison with zeroed times, sized to the template.
    #[must_use]
    pub fn new(name: Name, template: TemplateId, size: usize) -> Self {
        Self {
            name,
            template,
            times: IntervalSeq::zeroed(size),
        }
    }

    /// The comparison's name.
    #[must_use]
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// Handle to the template this comparison runs against.
    #[must_use]
    pub fn template(&self) -> TemplateId {
        self.template
    }

    /// The cumulative checkpoint times.
    #[must_use]
    pub fn times(&self) -> &IntervalSeq {
        &self.times
    }

    /// Exclusive access to the cumulative checkpoint times.
    pub fn times_mut(&mut self) -> &mut IntervalSeq {
        &mut self.times
    }

    /// Overwrite the time at one checkpoint.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`](crate::Error::IndexOutOfRange) if
    /// `index >= size`.
    pub fn retime_at(&mut self, index: usize, time: Period) -> Result<()> {
        self.times.set(index, time)
    }

    /// Replace all times from another same-length sequence.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SizeMismatch`](crate::Error::SizeMismatch) if the
    /// lengths differ; nothing is written in that case.
    pub fn copy_times_from(&mut self, times: &IntervalSeq) -> Result<()> {
        self.times.copy_from(times)
    }
}

impl Keyed for Comparison {
    type Key = Name;

    fn key(&self) -> &Name {
        &self.name
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for time in self.times.iter() {
            write!(f, " {time}")?;
        }
        Ok(())
    }
}

impl Entity for Comparison {
    fn export_full<W: Write>(
        &self,
        w: &mut TokenWriter<W>,
        cx: &ExportCx<'_>,
        new_object: bool,
    ) -> Result<()> {
        if new_object {
            w.token(&self.name)?;
            w.token(cx.templates.resolve(self.template)?.name())?;
        }
        self.times.write_content(w)?;
        Ok(())
    }

    fn import_new<R: BufRead>(r: &mut TokenReader<R>, cx: &ImportCx<'_>) -> Result<Self> {
        let name: Name = r.next_parsed("comparison name")?;
        let template_name: Name = r.next_parsed("comparison template name")?;
        let template = cx.templates.id_of(&template_name)?;
        let size = cx.templates.resolve(template)?.size();
        let mut comparison = Self::new(name, template, size);
        comparison.import_into(r)?;
        Ok(comparison)
    }

    fn import_into<R: BufRead>(&mut self, r: &mut TokenReader<R>) -> Result<()> {
        self.times.read_content(r, "comparison split time")
    }
}

#[cfg(test)]
mod tests {
    use super::super::{Template, TemplateSet};
    use super::*;
    use crate::Error;

    fn set_with(raw: &str, size: usize) -> (TemplateSet, TemplateId) {
        let mut set = TemplateSet::new();
        let id = set
            .add(Template::new(Name::new(raw).unwrap(), size).unwrap())
            .unwrap();
        (set, id)
    }

    #[test]
    fn test_new_is_zeroed_at_template_size() {
        let (_, id) = set_with("Any%", 3);
        let c = Comparison::new(Name::new("PB").unwrap(), id, 3);
        assert_eq!(c.times().len(), 3);
        assert!(c.times().iter().all(|t| *t == Period::ZERO));
    }

    #[test]
    fn test_retime_at_bounds() {
        let (_, id) = set_with("Any%", 2);
        let mut c = Comparison::new(Name::new("PB").unwrap(), id, 2);
        c.retime_at(1, Period::from_seconds(95.5)).unwrap();
        assert_eq!(c.times()[1], Period::from_seconds(95.5));
        assert!(matches!(
            c.retime_at(2, Period::ZERO).unwrap_err(),
            Error::IndexOutOfRange { index: 2, size: 2 }
        ));
    }

    #[test]
    fn test_serialized_round_trip() {
        let (set, id) = set_with("Any%", 2);
        let mut c = Comparison::new(Name::new("PB").unwrap(), id, 2);
        c.retime_at(0, Period::from_seconds(90.0)).unwrap();
        c.retime_at(1, Period::from_seconds(195.5)).unwrap();

        let mut w = TokenWriter::new(Vec::new());
        let export = ExportCx { templates: &set };
        c.export_full(&mut w, &export, true).unwrap();
        let written = w.into_inner();

        let mut r = TokenReader::new(written.as_slice());
        let import = ImportCx { templates: &set };
        let copy = Comparison::import_new(&mut r, &import).unwrap();
        assert_eq!(copy, c);
    }

    #[test]
    fn test_import_fails_on_unknown_template() {
        let (set, _) = set_with("Any%", 2);
        let mut r = TokenReader::new("PB 100% 00:01:30.0 00:03:15.5".as_bytes());
        let import = ImportCx { templates: &set };
        assert!(matches!(
            Comparison::import_new(&mut r, &import).unwrap_err(),
            Error::KeyNotFound(_)
        ));
    }

    #[test]
    fn test_import_into_leaves_identity_untouched_on_failure() {
        let (_, id) = set_with("Any%", 2);
        let mut c = Comparison::new(Name::new("PB").unwrap(), id, 2);
        c.retime_at(0, Period::from_seconds(10.0)).unwrap();
        let snapshot = c.clone();

        let mut r = TokenReader::new("00:00:05.0 garbage".as_bytes());
        assert!(c.import_into(&mut r).is_err());
        assert_eq!(c, snapshot);
    }
}
