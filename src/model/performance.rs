//! Recorded full runs, keyed by the moment they happened.

use std::fmt;
use std::io::{BufRead, Write};

use crate::codec::{TokenReader, TokenWriter};
use crate::seq::IntervalSeq;
use crate::time::{Moment, Period};
use crate::Result;

use super::{Entity, ExportCx, ImportCx, Keyed, Name, TemplateId};

/// One recorded full run: cumulative checkpoint times stamped with the moment
/// the run happened.
///
/// Shape matches [`Comparison`](super::Comparison) except for the key; the
/// moment makes a natural unique key because two runs cannot finish in the
/// same second.
#[derive(Debug, Clone, PartialEq)]
pub struct Performance {
    moment: Moment,
    template: TemplateId,
    times: IntervalSeq,
}

impl Performance {
    /// New performance with zeroed times, sized to the template.
    #[must_use]
    pub fn new(moment: Moment, template: TemplateId, size: usize) -> Self {
        Self {
            moment,
            template,
            times: IntervalSeq::zeroed(size),
        }
    }

    /// The moment this run was recorded.
    #[must_use]
    pub fn moment(&self) -> &Moment {
        &self.moment
    }

    /// Handle to the template this run was made against.
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

impl Keyed for Performance {
    type Key = Moment;

    fn key(&self) -> &Moment {
        &self.moment
    }
}

impl fmt::Display for Performance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.moment)?;
        for time in self.times.iter() {
            write!(f, " {time}")?;
        }
        Ok(())
    }
}

impl Entity for Performance {
    fn export_full<W: Write>(
        &self,
        w: &mut TokenWriter<W>,
        cx: &ExportCx<'_>,
        new_object: bool,
    ) -> Result<()> {
        if new_object {
            w.token(&self.moment)?;
            w.token(cx.templates.resolve(self.template)?.name())?;
        }
        self.times.write_content(w)?;
        Ok(())
    }

    fn import_new<R: BufRead>(r: &mut TokenReader<R>, cx: &ImportCx<'_>) -> Result<Self> {
        let moment: Moment = r.next_parsed("performance moment")?;
        let template_name: Name = r.next_parsed("performance template name")?;
        let template = cx.templates.id_of(&template_name)?;
        let size = cx.templates.resolve(template)?.size();
        let mut performance = Self::new(moment, template, size);
        performance.import_into(r)?;
        Ok(performance)
    }

    fn import_into<R: BufRead>(&mut self, r: &mut TokenReader<R>) -> Result<()> {
        self.times.read_content(r, "performance split time")
    }
}
