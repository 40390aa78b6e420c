//! Four-quadrant comparison workspace.
//!
//! One canvas per modality quadrant: fundus photo, angiography, OCT, and a
//! fourth quadrant that doubles as the slot for uncategorized and compare
//! images. The workspace keeps the image roster and routes every image to
//! its modality's quadrant; each quadrant keeps its own viewport and
//! annotations.

use crate::canvas::ImageCanvas;
use crate::config::AppConfig;
use crate::model::{ImageRef, Modality};

/// The full annotation surface: an image roster and four canvases.
#[derive(Debug, Clone, Default)]
pub struct Workspace {
    canvases: [ImageCanvas; 4],
    images: Vec<ImageRef>,
    active: Modality,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a workspace with a configuration already applied.
    pub fn with_config(config: &AppConfig) -> Self {
        let mut workspace = Self::new();
        workspace.apply_config(config);
        workspace
    }

    /// Push configuration down into every canvas: crosshair preference,
    /// history cap, and the first label preset as the drawing label.
    pub fn apply_config(&mut self, config: &AppConfig) {
        let draw_label = config
            .labels
            .first()
            .map(|preset| preset.name.clone())
            .unwrap_or_default();
        for canvas in &mut self.canvases {
            canvas.set_show_crosshair(config.preferences.show_crosshair);
            canvas.set_draw_label(draw_label.clone());
            canvas
                .editor_mut()
                .set_history_limit(config.preferences.max_history);
        }
    }

    /// Images currently in the roster, in arrival order.
    pub fn images(&self) -> &[ImageRef] {
        &self.images
    }

    /// The modality whose quadrant currently has focus.
    pub fn active(&self) -> Modality {
        self.active
    }

    pub fn set_active(&mut self, modality: Modality) {
        self.active = modality;
    }

    pub fn view(&self, modality: Modality) -> &ImageCanvas {
        &self.canvases[modality.quadrant()]
    }

    pub fn view_mut(&mut self, modality: Modality) -> &mut ImageCanvas {
        &mut self.canvases[modality.quadrant()]
    }

    pub fn active_view(&self) -> &ImageCanvas {
        self.view(self.active)
    }

    pub fn active_view_mut(&mut self) -> &mut ImageCanvas {
        self.view_mut(self.active)
    }

    /// Add an image to the roster and display it in its modality's
    /// quadrant. An image arriving again under the same id refreshes the
    /// roster entry instead of duplicating it.
    pub fn add_image(&mut self, image: ImageRef) {
        log::info!("➕ Added image '{}' ({})", image.id, image.modality.as_str());
        match self.images.iter_mut().find(|img| img.id == image.id) {
            Some(existing) => *existing = image.clone(),
            None => self.images.push(image.clone()),
        }
        let quadrant = image.modality.quadrant();
        self.canvases[quadrant].set_image(Some(image));
    }

    /// Bring a roster image into view: display it in its quadrant and focus
    /// that quadrant. Unknown ids are ignored.
    pub fn select_image(&mut self, id: &str) {
        let Some(image) = self.images.iter().find(|img| img.id == id).cloned() else {
            log::debug!("Select ignored: unknown image '{id}'");
            return;
        };
        log::info!("👁️ Selected image '{id}'");
        self.active = image.modality;
        let quadrant = image.modality.quadrant();
        self.canvases[quadrant].set_image(Some(image));
    }

    /// Drop an image from the roster, clearing any quadrant that displays
    /// it.
    pub fn remove_image(&mut self, id: &str) {
        let Some(position) = self.images.iter().position(|img| img.id == id) else {
            return;
        };
        self.images.remove(position);
        log::info!("🗑️ Removed image '{id}'");
        for canvas in &mut self.canvases {
            if canvas.image().is_some_and(|img| img.id == id) {
                canvas.set_image(None);
            }
        }
    }

    /// Show an image in the fourth quadrant for side-by-side comparison,
    /// regardless of its modality. `None` clears the slot.
    pub fn set_compare_image(&mut self, image: Option<ImageRef>) {
        self.canvases[Modality::Other.quadrant()].set_image(image);
    }
}
