//! Scale derivation from the measured width of the preview surface.
//!
//! A [`RenderSurface`] stands for the mounted preview: it owns the sender side of a
//! width channel and reports every resize. [`DimensionScaler`]s observe that channel
//! and turn widths into a [`Scale`] through the pure `width / REFERENCE_WIDTH`
//! mapping. Dropping the surface unmounts it; scalers then report `NotMounted`
//! instead of waiting forever.
//!
//! Preview and save read [`DimensionScaler::current`] on demand. The tracker task
//! spawned per mount only logs rescale events.

use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::layout::page::{page_height, REFERENCE_WIDTH};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("render surface is not mounted")]
    NotMounted,
    #[error("render surface has not been measured yet")]
    NotMeasured,
}

/// Uniform factor between design units and surface units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Scale(f32);

impl Scale {
    /// Design units as-is.
    pub const UNIT: Scale = Scale(1.0);

    /// `None` for widths that cannot be a measurement (zero, negative, NaN).
    pub fn from_width(width: f32) -> Option<Scale> {
        (width.is_finite() && width > 0.0).then(|| Scale(width / REFERENCE_WIDTH))
    }

    pub fn factor(self) -> f32 {
        self.0
    }

    /// Surface width this scale corresponds to.
    pub fn width(self) -> f32 {
        REFERENCE_WIDTH * self.0
    }

    pub fn page_height(self) -> f32 {
        page_height(self.width())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Surface and observers
// ────────────────────────────────────────────────────────────────────────────

/// A mounted preview surface. `None` until the first usable measurement.
pub struct RenderSurface {
    tx: watch::Sender<Option<f32>>,
}

impl RenderSurface {
    pub fn mount() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    /// Reports a new measured width. Unusable widths keep the last good one.
    pub fn resize(&self, width: f32) -> bool {
        if Scale::from_width(width).is_none() {
            debug!(width, "ignoring unusable surface width");
            return false;
        }
        self.tx.send_if_modified(|current| {
            if *current == Some(width) {
                return false;
            }
            *current = Some(width);
            true
        })
    }

    pub fn scaler(&self) -> DimensionScaler {
        DimensionScaler {
            rx: self.tx.subscribe(),
        }
    }
}

/// Observes one surface's width for as long as the surface is mounted.
#[derive(Clone)]
pub struct DimensionScaler {
    rx: watch::Receiver<Option<f32>>,
}

impl DimensionScaler {
    pub fn current(&self) -> Result<Scale, SurfaceError> {
        if self.rx.has_changed().is_err() {
            return Err(SurfaceError::NotMounted);
        }
        (*self.rx.borrow())
            .and_then(Scale::from_width)
            .ok_or(SurfaceError::NotMeasured)
    }

    /// Waits for the next usable width. Fails once the surface is unmounted.
    pub async fn next(&mut self) -> Result<Scale, SurfaceError> {
        loop {
            self.rx
                .changed()
                .await
                .map_err(|_| SurfaceError::NotMounted)?;
            if let Some(scale) = (*self.rx.borrow_and_update()).and_then(Scale::from_width) {
                return Ok(scale);
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Preview pane: the session's mount point
// ────────────────────────────────────────────────────────────────────────────

/// Holds the session's surface while a preview is mounted.
#[derive(Default)]
pub struct PreviewPane {
    surface: Mutex<Option<RenderSurface>>,
}

impl PreviewPane {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mounts the surface on first use, then reports `width`.
    pub fn mount_or_resize(&self, width: f32) -> Result<Scale, SurfaceError> {
        let mut slot = self.surface.lock().unwrap_or_else(PoisonError::into_inner);
        let surface = slot.get_or_insert_with(|| {
            let surface = RenderSurface::mount();
            spawn_tracker(surface.scaler());
            info!("preview surface mounted");
            surface
        });
        surface.resize(width);
        surface.scaler().current()
    }

    pub fn unmount(&self) -> bool {
        let removed = self
            .surface
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .is_some();
        if removed {
            info!("preview surface unmounted");
        }
        removed
    }

    pub fn scaler(&self) -> Result<DimensionScaler, SurfaceError> {
        self.surface
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(RenderSurface::scaler)
            .ok_or(SurfaceError::NotMounted)
    }

    /// Current scale of the mounted surface.
    pub fn scale(&self) -> Result<Scale, SurfaceError> {
        self.scaler()?.current()
    }
}

/// Logs resizes until the surface goes away.
fn spawn_tracker(mut scaler: DimensionScaler) {
    let Ok(handle) = tokio::runtime::Handle::try_current() else {
        return;
    };
    handle.spawn(async move {
        while let Ok(scale) = scaler.next().await {
            debug!(
                width = scale.width(),
                factor = scale.factor(),
                "preview rescaled"
            );
        }
        debug!("scale tracking stopped");
    });
}
