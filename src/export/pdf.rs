use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, trace, warn};

use crate::error::ChartResult;

use super::{CancelToken, ExportOutcome, pdf_file_name, slugify};

pub const A4_LANDSCAPE_WIDTH_PT: f64 = 841.89;
pub const A4_LANDSCAPE_HEIGHT_PT: f64 = 595.28;

const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(500);

/// Interactive control on a slide (tab group, toggle, select).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Control {
    pub id: String,
    pub options: Vec<String>,
}

impl Control {
    #[must_use]
    pub fn new(id: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            id: id.into(),
            options,
        }
    }
}

/// Host owning the live slide: it switches variants and rasterizes them.
///
/// The slide is a single mutable resource, so the job drives it strictly
/// sequentially.
pub trait SlideCaptureHost {
    type Page;

    fn controls(&self) -> Vec<Control>;
    fn activate(&mut self, control: &Control, option_index: usize) -> ChartResult<()>;
    /// Waits until the activated variant is visually settled.
    fn settle(&mut self, delay: Duration) -> ChartResult<()>;
    fn capture(&mut self) -> ChartResult<Self::Page>;
}

/// Receives captured pages in order.
pub trait PageSink {
    type Page;

    fn append_page(&mut self, page: &Self::Page) -> ChartResult<()>;
    /// Called once after the last page; not called on cancellation.
    fn finish(&mut self) -> ChartResult<()>;
}

/// Every combination of option indices, first control outermost.
///
/// Controls without options are ignored. No controls yields one empty
/// combination (the slide as it is).
#[must_use]
pub fn control_combinations(controls: &[Control]) -> Vec<Vec<(usize, usize)>> {
    controls
        .iter()
        .enumerate()
        .filter(|(_, control)| !control.options.is_empty())
        .fold(vec![Vec::new()], |acc, (control_index, control)| {
            acc.iter()
                .flat_map(|prefix| {
                    (0..control.options.len()).map(move |option_index| {
                        let mut next = prefix.clone();
                        next.push((control_index, option_index));
                        next
                    })
                })
                .collect()
        })
}

/// Cancellable multi-page capture of one slide.
#[derive(Debug, Clone)]
pub struct PdfExportJob {
    slide_id: String,
    settle_delay: Duration,
    cancel: CancelToken,
}

impl PdfExportJob {
    #[must_use]
    pub fn new(slide_id: impl Into<String>) -> Self {
        Self {
            slide_id: slide_id.into(),
            settle_delay: DEFAULT_SETTLE_DELAY,
            cancel: CancelToken::new(),
        }
    }

    #[must_use]
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    #[must_use]
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    #[must_use]
    pub fn file_name(&self) -> String {
        pdf_file_name(&slugify(&self.slide_id))
    }

    /// Token a navigation handler can use to stop this job.
    #[must_use]
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Activates every control combination, captures one page each and
    /// appends it to `sink`.
    ///
    /// Cancellation is checked before every step. A cancelled job leaves
    /// the sink unfinished.
    pub fn run<H, S>(&self, host: &mut H, sink: &mut S) -> ExportOutcome
    where
        H: SlideCaptureHost,
        S: PageSink<Page = H::Page>,
    {
        let mut pages = 0;
        match self.capture_all(host, sink, &mut pages) {
            Ok(true) => {
                debug!(slide = %self.slide_id, pages, "pdf export finished");
                ExportOutcome::Completed { pages }
            }
            Ok(false) => {
                warn!(slide = %self.slide_id, pages, "pdf export cancelled");
                ExportOutcome::Cancelled { pages }
            }
            Err(err) => {
                error!(slide = %self.slide_id, pages, error = %err, "pdf export failed");
                ExportOutcome::Failed(err.to_string())
            }
        }
    }

    fn capture_all<H, S>(&self, host: &mut H, sink: &mut S, pages: &mut usize) -> ChartResult<bool>
    where
        H: SlideCaptureHost,
        S: PageSink<Page = H::Page>,
    {
        let controls = host.controls();
        let mut current: Vec<Option<usize>> = vec![None; controls.len()];

        for combination in control_combinations(&controls) {
            for (control_index, option_index) in combination {
                if current[control_index] == Some(option_index) {
                    continue;
                }
                if self.cancel.is_cancelled() {
                    return Ok(false);
                }
                let control = &controls[control_index];
                trace!(control = %control.id, option_index, "activating control");
                host.activate(control, option_index)?;
                current[control_index] = Some(option_index);
            }

            if self.cancel.is_cancelled() {
                return Ok(false);
            }
            host.settle(self.settle_delay)?;

            if self.cancel.is_cancelled() {
                return Ok(false);
            }
            let page = host.capture()?;

            if self.cancel.is_cancelled() {
                return Ok(false);
            }
            sink.append_page(&page)?;
            *pages += 1;
        }

        if self.cancel.is_cancelled() {
            return Ok(false);
        }
        sink.finish()?;
        Ok(true)
    }
}

#[cfg(feature = "cairo-backend")]
pub use cairo_sink::CairoPdfSink;

#[cfg(feature = "cairo-backend")]
mod cairo_sink {
    use std::path::Path;

    use cairo::{Context, ImageSurface, PdfSurface};

    use crate::error::{ChartError, ChartResult};

    use super::{A4_LANDSCAPE_HEIGHT_PT, A4_LANDSCAPE_WIDTH_PT, PageSink};

    /// Landscape A4 PDF; each captured image is centered and scaled to fit.
    pub struct CairoPdfSink {
        surface: PdfSurface,
        context: Context,
    }

    impl CairoPdfSink {
        pub fn create(path: impl AsRef<Path>) -> ChartResult<Self> {
            let surface = PdfSurface::new(A4_LANDSCAPE_WIDTH_PT, A4_LANDSCAPE_HEIGHT_PT, path)
                .map_err(|err| pdf_error("failed to create pdf surface", err))?;
            let context = Context::new(&surface)
                .map_err(|err| pdf_error("failed to create pdf context", err))?;
            Ok(Self { surface, context })
        }
    }

    impl PageSink for CairoPdfSink {
        type Page = ImageSurface;

        fn append_page(&mut self, page: &ImageSurface) -> ChartResult<()> {
            let width = f64::from(page.width());
            let height = f64::from(page.height());
            if width <= 0.0 || height <= 0.0 {
                return Err(ChartError::Export("captured page is empty".to_owned()));
            }
            let scale = (A4_LANDSCAPE_WIDTH_PT / width).min(A4_LANDSCAPE_HEIGHT_PT / height);
            let offset_x = (A4_LANDSCAPE_WIDTH_PT - width * scale) / 2.0;
            let offset_y = (A4_LANDSCAPE_HEIGHT_PT - height * scale) / 2.0;

            let ctx = &self.context;
            ctx.save().map_err(|err| pdf_error("failed to save state", err))?;
            ctx.translate(offset_x, offset_y);
            ctx.scale(scale, scale);
            ctx.set_source_surface(page, 0.0, 0.0)
                .map_err(|err| pdf_error("failed to set page source", err))?;
            ctx.paint()
                .map_err(|err| pdf_error("failed to paint page", err))?;
            ctx.restore()
                .map_err(|err| pdf_error("failed to restore state", err))?;
            ctx.show_page()
                .map_err(|err| pdf_error("failed to emit page", err))?;
            Ok(())
        }

        fn finish(&mut self) -> ChartResult<()> {
            self.surface.finish();
            self.surface
                .status()
                .map_err(|err| pdf_error("failed to finish pdf", err))
        }
    }

    fn pdf_error(context: &str, err: cairo::Error) -> ChartError {
        ChartError::Export(format!("{context}: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combinations_walk_first_control_outermost() {
        let controls = vec![
            Control::new("tab", vec!["a".into(), "b".into()]),
            Control::new("empty", Vec::new()),
            Control::new("toggle", vec!["on".into(), "off".into(), "both".into()]),
        ];
        let combos = control_combinations(&controls);
        assert_eq!(combos.len(), 6);
        assert_eq!(combos[0], vec![(0, 0), (2, 0)]);
        assert_eq!(combos[1], vec![(0, 0), (2, 1)]);
        assert_eq!(combos[5], vec![(0, 1), (2, 2)]);
    }

    #[test]
    fn no_controls_is_a_single_capture() {
        assert_eq!(control_combinations(&[]), vec![Vec::<(usize, usize)>::new()]);
    }
}
