/// Events emitted while a batch of peptides is being localized.
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    BatchStart { peptides: u64 },
    PeptideDone { name: String, placed: usize },
    PeptideFailed { name: String, reason: String },
    BatchFinish { succeeded: usize, failed: usize },
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }
}
