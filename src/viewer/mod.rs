//! The viewer: document lifecycle, page rendering and field authoring.
//!
//! A [`Viewer`] owns its [`RenderSurface`] and shares a [`DocumentEngine`]
//! with background load workers. All mutation happens through `&mut self` on
//! the thread that owns the viewer; only parsing runs elsewhere.
//!
//! ## Modules
//!
//! - `state` - `ViewerState` lifecycle enum
//! - `options` - `ViewerOptions` and `DocumentSource`
//! - `loader` - Background loads with generation-based stale suppression
//!
//! Pointer handling and zoom/pan live in `crate::input`.

mod loader;
mod options;
mod state;

pub use loader::LoadTicket;
pub use options::{DocumentSource, ViewerOptions};
pub use state::ViewerState;

use crate::canvas::{DrawableSpec, RenderSurface};
use crate::constants::{DEFAULT_FONT_SIZE, MAX_FONT_SIZE, MIN_FONT_SIZE};
use crate::document::{DocumentEngine, FormWriter, LoadedDocument, PageContent, PageRasterizer};
use crate::error::{DocumentResult, FieldError, ViewerError, ViewerResult};
use crate::export::{self, FieldLayoutEntry};
use crate::field::{PdfField, TrackedFields};
use crate::input::{InputState, ViewTransform};
use crate::profile_scope;
use crate::types::{CanvasObject, FieldId, FieldType, Placement};
use loader::{BackgroundLoader, read_and_parse};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct Viewer<S: RenderSurface> {
    engine: Arc<dyn DocumentEngine>,
    rasterizer: Option<Box<dyn PageRasterizer>>,
    pub(crate) surface: S,
    options: ViewerOptions,
    pub(crate) state: ViewerState,
    document: Option<Box<dyn LoadedDocument>>,
    pub(crate) fields: TrackedFields,
    pub(crate) transform: ViewTransform,
    pub(crate) current_page: Option<usize>,
    pub(crate) input: InputState,
    pub(crate) selected: Option<FieldId>,
    loader: BackgroundLoader,
}

impl<S: RenderSurface> Viewer<S> {
    pub fn new(engine: Arc<dyn DocumentEngine>, surface: S, options: ViewerOptions) -> Self {
        Self {
            engine,
            rasterizer: None,
            surface,
            options,
            state: ViewerState::Empty,
            document: None,
            fields: TrackedFields::new(),
            transform: ViewTransform::default(),
            current_page: None,
            input: InputState::default(),
            selected: None,
            loader: BackgroundLoader::default(),
        }
    }

    /// Rasterize pages through `rasterizer` instead of drawing vector content.
    pub fn with_rasterizer(mut self, rasterizer: Box<dyn PageRasterizer>) -> Self {
        self.rasterizer = Some(rasterizer);
        self
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    pub fn options(&self) -> &ViewerOptions {
        &self.options
    }

    pub fn is_read_only(&self) -> bool {
        self.options.read_only
    }

    /// Toggle authoring. Switching to read-only abandons any drag in progress.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.options.read_only = read_only;
        if read_only {
            self.input.reset();
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn document(&self) -> Option<&dyn LoadedDocument> {
        self.document.as_deref()
    }

    pub fn page_count(&self) -> Option<usize> {
        self.document.as_ref().map(|d| d.page_count())
    }

    /// Size in points of a page of the loaded document
    pub fn page_size(&self, page: usize) -> Option<(f32, f32)> {
        self.document.as_deref().and_then(|d| d.page_size(page))
    }

    /// Page most recently rendered
    pub fn current_page(&self) -> Option<usize> {
        self.current_page
    }

    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    pub fn input_state(&self) -> &InputState {
        &self.input
    }

    pub fn selected_field(&self) -> Option<&FieldId> {
        self.selected.as_ref()
    }

    /// Loads started in the background whose results have not been polled
    pub fn pending_loads(&self) -> usize {
        self.loader.pending_count()
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    /// Load the document named by `options.source`, if any.
    pub fn open(&mut self) -> ViewerResult<()> {
        match self.options.source.clone() {
            Some(source) => self.load(source),
            None => Ok(()),
        }
    }

    /// Read and parse `source` synchronously.
    pub fn load(&mut self, source: DocumentSource) -> ViewerResult<()> {
        let ticket = self.begin_load()?;
        info!(source = %source.describe(), "loading document");
        let result = read_and_parse(self.engine.as_ref(), source);
        self.finish_load(ticket, result).map(|_| ())
    }

    /// Adopt a document the host already parsed.
    pub fn load_document(&mut self, document: Box<dyn LoadedDocument>) -> ViewerResult<()> {
        let ticket = self.begin_load()?;
        self.finish_load(ticket, Ok(document)).map(|_| ())
    }

    /// Start a load and enter `Loading`. Any earlier ticket becomes stale.
    ///
    /// The current document, its fields and their drawables are discarded.
    pub fn begin_load(&mut self) -> ViewerResult<LoadTicket> {
        if self.state.is_closed() {
            return Err(self.not_ready());
        }
        let ticket = self.loader.next_ticket();
        self.reset_session();
        self.state = ViewerState::Loading;
        debug!(generation = ticket.generation(), "load started");
        Ok(ticket)
    }

    /// Apply the outcome of the load identified by `ticket`.
    ///
    /// Returns `Ok(false)` without touching any state when the ticket is
    /// stale. On success the viewer is `Loaded` and `initial_page` is
    /// rendered; an out-of-range initial page is reported but leaves the
    /// document loaded.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: DocumentResult<Box<dyn LoadedDocument>>,
    ) -> ViewerResult<bool> {
        if !self.loader.is_current(ticket) || !self.state.is_loading() {
            debug!(generation = ticket.generation(), "dropping stale load result");
            return Ok(false);
        }

        match result {
            Ok(document) => {
                info!(pages = document.page_count(), "document loaded");
                self.document = Some(document);
                self.state = ViewerState::Loaded;
                self.render_page(self.options.initial_page)?;
                Ok(true)
            }
            Err(e) => {
                warn!("document load failed: {}", e);
                self.state = ViewerState::Error(e.to_string());
                Err(ViewerError::DocumentLoad(e))
            }
        }
    }

    /// Read and parse `source` on a worker thread. Call [`Viewer::poll_load`]
    /// from the owning thread to apply the result.
    pub fn load_in_background(&mut self, source: DocumentSource) -> ViewerResult<LoadTicket> {
        let ticket = self.begin_load()?;
        info!(source = %source.describe(), generation = ticket.generation(), "loading document in background");
        self.loader.spawn(ticket, Arc::clone(&self.engine), source);
        Ok(ticket)
    }

    /// Apply finished background loads. Only the newest load takes effect.
    ///
    /// Returns whether a load was applied.
    pub fn poll_load(&mut self) -> ViewerResult<bool> {
        let mut applied = false;
        for completion in self.loader.drain() {
            applied |= self.finish_load(completion.ticket, completion.result)?;
        }
        Ok(applied)
    }

    /// Close the viewer. Fields and drawables are dropped and any in-flight
    /// load is discarded when it completes.
    pub fn dispose(&mut self) {
        if self.state.is_closed() {
            return;
        }
        self.loader.invalidate();
        self.reset_session();
        self.state = ViewerState::Closed;
        info!("viewer disposed");
    }

    fn reset_session(&mut self) {
        self.document = None;
        self.fields.clear();
        self.surface.clear();
        self.current_page = None;
        self.input.reset();
        self.selected = None;
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    /// Draw page `index` at the current zoom and pan.
    pub fn render_page(&mut self, index: usize) -> ViewerResult<()> {
        profile_scope!("render_page");

        self.ensure_ready()?;
        let Some(document) = self.document.as_deref() else {
            return Err(self.not_ready());
        };
        let page_count = document.page_count();
        if index >= page_count {
            return Err(ViewerError::OutOfRange {
                index: index as i64,
                page_count,
            });
        }

        let scale = self.transform.zoom;
        let mut render = document
            .render_page(index, scale)
            .map_err(|source| ViewerError::Render { index, source })?;
        if let Some(rasterizer) = &self.rasterizer {
            match rasterizer.rasterize(document.bytes(), index, scale) {
                Ok(image) => render.content = PageContent::Raster(Arc::new(image)),
                Err(e) => warn!(index, "rasterization failed, drawing vector content: {}", e),
            }
        }

        self.surface.draw_page(&render, self.transform);
        self.current_page = Some(index);
        debug!(index, zoom = scale, "rendered page");
        Ok(())
    }

    /// [`Viewer::render_page`] for hosts that use signed page indices.
    pub fn render_page_signed(&mut self, index: i64) -> ViewerResult<()> {
        self.ensure_ready()?;
        match usize::try_from(index) {
            Ok(index) => self.render_page(index),
            Err(_) => Err(ViewerError::OutOfRange {
                index,
                page_count: self.page_count().unwrap_or(0),
            }),
        }
    }

    /// Re-render the current page after a view change.
    pub(crate) fn refresh(&mut self) -> ViewerResult<()> {
        match self.current_page {
            Some(page) if self.state.is_ready() => self.render_page(page),
            _ => Ok(()),
        }
    }

    // ------------------------------------------------------------------
    // Field authoring
    // ------------------------------------------------------------------

    /// Place a new field. The viewer assigns its id.
    ///
    /// The rectangle must lie on its page.
    pub fn add_field(&mut self, field_type: FieldType, placement: Placement) -> ViewerResult<PdfField> {
        self.ensure_writable()?;
        placement.validate_within(self.page_bounds(placement.page)?)?;

        let drawable = self.surface.add_drawable(DrawableSpec {
            kind: field_type.drawable_kind(),
            page: placement.page,
            position: placement.position,
            size: placement.size,
            text: String::new(),
            font_size: DEFAULT_FONT_SIZE,
        });

        let field = PdfField::new(
            FieldId::generate(),
            field_type,
            CanvasObject::Drawable(drawable),
            placement,
        )
        .and_then(|field| self.fields.insert(field.clone()).map(|_| field));

        match field {
            Ok(field) => {
                self.state = ViewerState::Editing;
                info!(id = %field.id, page = field.page(), "field added");
                Ok(field)
            }
            Err(e) => {
                self.surface.remove_drawable(drawable.handle);
                Err(e.into())
            }
        }
    }

    /// Remove a field and its drawable. Unknown ids are a no-op returning
    /// `Ok(false)`.
    pub fn remove_field(&mut self, id: &FieldId) -> ViewerResult<bool> {
        self.ensure_writable()?;

        let Some(field) = self.fields.remove(id) else {
            debug!(%id, "remove of untracked field ignored");
            return Ok(false);
        };
        if let Some(handle) = field.object.handle() {
            self.surface.remove_drawable(handle);
        }
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
        if self.input.active_field() == Some(id) {
            self.input.reset();
        }
        self.state = ViewerState::Editing;
        info!(%id, "field removed");
        Ok(true)
    }

    /// Move a field's top-left corner. The field must stay on its page.
    pub fn move_field(&mut self, id: &FieldId, position: (f32, f32)) -> ViewerResult<()> {
        self.edit_field(id, |field, page_size| {
            let placement = Placement {
                position,
                ..field.placement
            };
            placement.validate_within(page_size)?;
            field.placement = placement;
            Ok(())
        })
    }

    pub fn resize_field(&mut self, id: &FieldId, size: (f32, f32)) -> ViewerResult<()> {
        self.edit_field(id, |field, page_size| {
            let placement = Placement {
                size,
                ..field.placement
            };
            placement.validate_within(page_size)?;
            field.placement = placement;
            Ok(())
        })
    }

    pub fn set_field_value(&mut self, id: &FieldId, value: impl Into<String>) -> ViewerResult<()> {
        let value = value.into();
        self.edit_field(id, move |field, _| {
            field.value = value;
            Ok(())
        })
    }

    pub fn set_field_name(&mut self, id: &FieldId, name: impl Into<String>) -> ViewerResult<()> {
        let name = name.into();
        self.edit_field(id, move |field, _| {
            field.name = name;
            Ok(())
        })
    }

    /// Set the font size, clamped to the supported range.
    pub fn set_field_font_size(&mut self, id: &FieldId, font_size: f32) -> ViewerResult<()> {
        self.edit_field(id, |field, _| {
            field.font_size = font_size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
            Ok(())
        })
    }

    /// Apply `edit` to a tracked field, handing it the size of the field's
    /// page, then sync the drawable.
    fn edit_field<F>(&mut self, id: &FieldId, edit: F) -> ViewerResult<()>
    where
        F: FnOnce(&mut PdfField, (f32, f32)) -> Result<(), FieldError>,
    {
        self.ensure_writable()?;
        let not_found = || FieldError::NotFound(id.clone());
        let page = self.fields.get(id).ok_or_else(not_found)?.page();
        let page_size = self.page_bounds(page)?;

        let updated = self
            .fields
            .edit(id, |field| edit(&mut *field, page_size).map(|()| field.clone()))
            .ok_or_else(not_found)??;
        if let Some(handle) = updated.object.handle() {
            self.surface.update_drawable(handle, drawable_spec(&updated));
        }
        self.state = ViewerState::Editing;
        debug!(%id, "field updated");
        Ok(())
    }

    pub fn field(&self, id: &FieldId) -> Option<&PdfField> {
        self.fields.get(id)
    }

    pub fn fields(&self) -> &TrackedFields {
        &self.fields
    }

    // ------------------------------------------------------------------
    // Export
    // ------------------------------------------------------------------

    /// All tracked fields in placement order.
    pub fn export_field_layout(&self) -> ViewerResult<Vec<FieldLayoutEntry>> {
        self.ensure_ready()?;
        Ok(self.fields.iter().map(FieldLayoutEntry::from).collect())
    }

    /// Tracked fields on one page.
    pub fn export_page_layout(&self, page: usize) -> ViewerResult<Vec<FieldLayoutEntry>> {
        self.ensure_page(page)?;
        Ok(self.fields.on_page(page).map(FieldLayoutEntry::from).collect())
    }

    /// Write the current layout into a copy of the loaded document.
    pub fn write_document(&self, writer: &dyn FormWriter) -> ViewerResult<Vec<u8>> {
        let layout = self.export_field_layout()?;
        let Some(document) = self.document.as_deref() else {
            return Err(self.not_ready());
        };
        Ok(export::write_fields(writer, document.bytes(), &layout)?)
    }

    /// [`Viewer::write_document`] followed by an atomic write to `path`.
    pub fn save_document(&self, writer: &dyn FormWriter, path: &Path) -> ViewerResult<()> {
        let bytes = self.write_document(writer)?;
        export::write_pdf_atomically(path, &bytes)?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Preconditions
    // ------------------------------------------------------------------

    pub(crate) fn not_ready(&self) -> ViewerError {
        ViewerError::NotReady {
            state: self.state.clone(),
        }
    }

    pub(crate) fn ensure_ready(&self) -> ViewerResult<()> {
        if self.state.is_ready() && self.document.is_some() {
            Ok(())
        } else {
            Err(self.not_ready())
        }
    }

    pub(crate) fn ensure_writable(&self) -> ViewerResult<()> {
        self.ensure_ready()?;
        if self.options.read_only {
            return Err(ViewerError::ReadOnly);
        }
        Ok(())
    }

    /// Size of `page`, or `OutOfRange` when the document has no such page.
    pub(crate) fn page_bounds(&self, page: usize) -> ViewerResult<(f32, f32)> {
        self.ensure_page(page)?;
        self.page_size(page).ok_or_else(|| ViewerError::OutOfRange {
            index: page as i64,
            page_count: self.page_count().unwrap_or(0),
        })
    }

    fn ensure_page(&self, page: usize) -> ViewerResult<()> {
        self.ensure_ready()?;
        let page_count = self.page_count().unwrap_or(0);
        if page >= page_count {
            return Err(ViewerError::OutOfRange {
                index: page as i64,
                page_count,
            });
        }
        Ok(())
    }
}

pub(crate) fn drawable_spec(field: &PdfField) -> DrawableSpec {
    DrawableSpec {
        kind: field.field_type.drawable_kind(),
        page: field.placement.page,
        position: field.placement.position,
        size: field.placement.size,
        text: field.value.clone(),
        font_size: field.font_size,
    }
}
