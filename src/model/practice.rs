//! Single-checkpoint practice samples.

use std::fmt;
use std::io::{BufRead, Write};

use crate::codec::{TokenReader, TokenWriter};
use crate::time::{Moment, Period};
use crate::Result;

use super::{Entity, ExportCx, ImportCx, Keyed, Name, TemplateId};

/// One timed attempt at a single checkpoint of a template.
///
/// The checkpoint index is identity, fixed at creation; only the sampled
/// period is content and can be rewritten afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Practice {
    moment: Moment,
    template: TemplateId,
    index: usize,
    time: Period,
}

impl Practice {
    /// New zero-time sample for checkpoint `index` of a template with
    /// `template_size` checkpoints.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`](crate::Error::IndexOutOfRange) if
    /// `index >= template_size`.
    pub fn new(
        moment: Moment,
        template: TemplateId,
        index: usize,
        template_size: usize,
    ) -> Result<Self> {
        if index >= template_size {
            return Err(crate::Error::IndexOutOfRange {
                index: index as i64,
                size: template_size,
            });
        }
        Ok(Self {
            moment,
            template,
            index,
            time: Period::ZERO,
        })
    }

    /// The moment this sample was recorded.
    #[must_use]
    pub fn moment(&self) -> &Moment {
        &self.moment
    }

    /// Handle to the template the checkpoint belongs to.
    #[must_use]
    pub fn template(&self) -> TemplateId {
        self.template
    }

    /// The practiced checkpoint index.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// The sampled period.
    #[must_use]
    pub fn time(&self) -> Period {
        self.time
    }

    /// Overwrite the sampled period.
    pub fn retime(&mut self, time: Period) {
        self.time = time;
    }
}

impl Keyed for Practice {
    type Key = Moment;

    fn key(&self) -> &Moment {
        &self.moment
    }
}

impl fmt::Display for Practice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.moment, self.index, self.time)
    }
}

impl Entity for Practice {
    fn export_full<W: Write>(
        &self,
        w: &mut TokenWriter<W>,
        cx: &ExportCx<'_>,
        new_object: bool,
    ) -> Result<()> {
        if new_object {
            w.token(&self.moment)?;
            w.token(cx.templates.resolve(self.template)?.name())?;
            w.token(self.index)?;
        }
        w.token(self.time)?;
        Ok(())
    }

    fn import_new<R: BufRead>(r: &mut TokenReader<R>, cx: &ImportCx<'_>) -> Result<Self> {
        let moment: Moment = r.next_parsed("practice moment")?;
        let template_name: Name = r.next_parsed("practice template name")?;
        let template = cx.templates.id_of(&template_name)?;
        let size = cx.templates.resolve(template)?.size();
        let index = r.next_index(size, "practice split index")?;
        let mut practice = Self::new(moment, template, index, size)?;
        practice.import_into(r)?;
        Ok(practice)
    }

    fn import_into<R: BufRead>(&mut self, r: &mut TokenReader<R>) -> Result<()> {
        self.time = r.next_parsed("practice split time")?;
        Ok(())
    }
}
