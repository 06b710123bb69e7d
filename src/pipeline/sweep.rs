// ABOUTME: Best-effort stale image sweep for a single repository.
// ABOUTME: Removal failures are recorded, never propagated.

use crate::runtime::{ImageError, ImageOps, ImageSummary};
use crate::types::ImageId;

/// One image the sweep attempted but could not remove.
#[derive(Debug)]
pub struct SweepFailure {
    pub image: ImageId,
    pub tags: Vec<String>,
    pub error: ImageError,
}

/// Outcome of a cleanup sweep.
///
/// `attempted` counts every image the sweep tried to remove; `removed` the
/// subset that succeeded. The difference is itemized in `failures`. The image
/// backing the container just started is expected to show up there when
/// `retain` is zero; that is normal operation, not an error.
#[derive(Debug, Default)]
pub struct SweepReport {
    pub attempted: usize,
    pub removed: usize,
    pub skipped: usize,
    pub failures: Vec<SweepFailure>,
}

impl SweepReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Remove local images for `repository`, keeping the `retain` newest.
///
/// Enumerates images matching the repository, orders them newest first, and
/// attempts removal of everything past the retention window. Each removal is
/// independent: one failure does not stop the rest. Enumeration failure
/// produces an empty report with a warning, because cleanup must never fail
/// the run that just activated a healthy container.
pub(crate) async fn sweep_repository<R: ImageOps>(
    runtime: &R,
    repository: &str,
    retain: usize,
) -> SweepReport {
    let mut images = match runtime.list_images(repository).await {
        Ok(images) => images,
        Err(e) => {
            tracing::warn!(repository, "image enumeration failed, skipping sweep: {e}");
            return SweepReport::default();
        }
    };

    images.sort_by(|a, b| b.created.cmp(&a.created));

    let mut report = SweepReport {
        skipped: retain.min(images.len()),
        ..SweepReport::default()
    };

    for image in images.into_iter().skip(retain) {
        report.attempted += 1;
        match runtime.remove_image(&image.id, false).await {
            Ok(()) => {
                tracing::debug!(image = %image.id, tags = ?image.tags, "removed stale image");
                report.removed += 1;
            }
            Err(e) => {
                record_failure(&mut report, image, e);
            }
        }
    }

    report
}

fn record_failure(report: &mut SweepReport, image: ImageSummary, error: ImageError) {
    match &error {
        ImageError::InUse(_) => {
            tracing::debug!(image = %image.id, "image in use, left in place");
        }
        ImageError::NotFound(_) => {
            tracing::debug!(image = %image.id, "image already gone");
        }
        ImageError::Runtime(msg) => {
            tracing::warn!(image = %image.id, "image removal failed: {msg}");
        }
    }
    report.failures.push(SweepFailure {
        image: image.id,
        tags: image.tags,
        error,
    });
}
