//! gpui widget hosting a [`Viewer`] over a [`SceneCanvas`].
//!
//! Paints the current page frame and one overlay per field drawable, and
//! routes mouse events into the viewer's input machine. Event positions are
//! taken relative to `origin`, the widget's top-left corner in the window.
//!
//! Rasterized pages are painted as images. The gpui copy of a bitmap is
//! cached until the canvas draws a different one.

use crate::canvas::{PageFrame, SceneCanvas};
use crate::constants::RESIZE_HANDLE_SIZE;
use crate::profile_scope;
use crate::types::{CanvasPoint, DrawableKind};
use crate::viewer::Viewer;
use ::image::{Frame, RgbaImage};
use gpui::prelude::FluentBuilder;
use gpui::*;
use std::sync::Arc;
use tracing::warn;

/// Zoom factor applied per pixel of vertical scroll with the modifier held
const SCROLL_ZOOM_DIVISOR: f32 = 500.0;
/// Pixels panned per scrolled line
const LINE_SCROLL_PIXELS: f32 = 20.0;
/// Smallest zoom factor a single scroll event can apply
const MIN_SCROLL_ZOOM_FACTOR: f32 = 0.5;

pub struct ViewerView {
    viewer: Viewer<SceneCanvas>,
    origin: Point<Pixels>,
    page_image: Option<(Arc<RgbaImage>, Arc<RenderImage>)>,
}

/// gpui stores image pixels as BGRA.
fn to_render_image(bitmap: &RgbaImage) -> Arc<RenderImage> {
    let mut bgra = bitmap.clone();
    for pixel in bgra.pixels_mut() {
        pixel.0.swap(0, 2);
    }
    Arc::new(RenderImage::new(vec![Frame::new(bgra)]))
}

impl ViewerView {
    pub fn new(viewer: Viewer<SceneCanvas>) -> Self {
        Self {
            viewer,
            origin: point(px(0.0), px(0.0)),
            page_image: None,
        }
    }

    pub fn viewer(&self) -> &Viewer<SceneCanvas> {
        &self.viewer
    }

    pub fn viewer_mut(&mut self) -> &mut Viewer<SceneCanvas> {
        &mut self.viewer
    }

    /// Window position of the widget's top-left corner.
    pub fn set_origin(&mut self, origin: Point<Pixels>) {
        self.origin = origin;
    }

    fn local(&self, position: Point<Pixels>) -> CanvasPoint {
        CanvasPoint::new(
            f32::from(position.x - self.origin.x),
            f32::from(position.y - self.origin.y),
        )
    }

    /// The gpui image for the frame's bitmap, converted once per bitmap.
    fn page_image(&mut self, frame: &PageFrame) -> Option<Arc<RenderImage>> {
        let Some(bitmap) = frame.bitmap() else {
            self.page_image = None;
            return None;
        };
        match &self.page_image {
            Some((cached, image)) if Arc::ptr_eq(cached, bitmap) => Some(Arc::clone(image)),
            _ => {
                let image = to_render_image(bitmap);
                self.page_image = Some((Arc::clone(bitmap), Arc::clone(&image)));
                Some(image)
            }
        }
    }

    fn handle_mouse_down(&mut self, event: &MouseDownEvent, _window: &mut Window, cx: &mut Context<Self>) {
        match self.viewer.pointer_down(self.local(event.position)) {
            Ok(_) => cx.notify(),
            Err(e) => warn!("pointer down ignored: {}", e),
        }
    }

    fn handle_mouse_move(&mut self, event: &MouseMoveEvent, _window: &mut Window, cx: &mut Context<Self>) {
        if self.viewer.input_state().is_idle() {
            return;
        }
        match self.viewer.pointer_move(self.local(event.position)) {
            Ok(true) => cx.notify(),
            Ok(false) => {}
            Err(e) => warn!("pointer move ignored: {}", e),
        }
    }

    fn handle_mouse_up(&mut self, _event: &MouseUpEvent, _window: &mut Window, cx: &mut Context<Self>) {
        if self.viewer.pointer_up().is_some() {
            cx.notify();
        }
    }

    fn handle_scroll(&mut self, event: &ScrollWheelEvent, _window: &mut Window, cx: &mut Context<Self>) {
        let result = if event.modifiers.platform || event.modifiers.control {
            let factor = match event.delta {
                ScrollDelta::Pixels(delta) => 1.0 - f32::from(delta.y) / SCROLL_ZOOM_DIVISOR,
                ScrollDelta::Lines(delta) => 1.0 - delta.y / 50.0,
            }
            .max(MIN_SCROLL_ZOOM_FACTOR);
            self.viewer.zoom_at(factor, self.local(event.position)).map(|_| ())
        } else {
            let (dx, dy) = match event.delta {
                ScrollDelta::Pixels(delta) => (f32::from(delta.x), f32::from(delta.y)),
                ScrollDelta::Lines(delta) => (delta.x * LINE_SCROLL_PIXELS, delta.y * LINE_SCROLL_PIXELS),
            };
            self.viewer.pan_by(dx, dy)
        };
        match result {
            Ok(()) => cx.notify(),
            Err(e) => warn!("scroll ignored: {}", e),
        }
    }
}

impl Render for ViewerView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        profile_scope!("viewer_view_render");

        let transform = self.viewer.transform();
        let zoom = transform.zoom;
        let (offset_x, offset_y) = transform.offset;
        let selected_handle = self
            .viewer
            .selected_field()
            .and_then(|id| self.viewer.field(id))
            .and_then(|field| field.object.handle());

        let frame = self.viewer.surface().current_page().cloned();
        let page = frame.map(|frame| {
            let image = self.page_image(&frame);
            div()
                .absolute()
                .left(px(offset_x))
                .top(px(offset_y))
                .w(px(frame.size.0 * zoom))
                .h(px(frame.size.1 * zoom))
                .bg(rgb(0xffffff))
                .shadow_md()
                .when_some(image, |d, image| {
                    d.child(img(image).size_full().object_fit(ObjectFit::Fill))
                })
        });

        let overlays: Vec<Div> = self
            .viewer
            .surface()
            .visible_drawables()
            .into_iter()
            .map(|(handle, spec)| {
                let selected = selected_handle == Some(handle);
                let border = if selected {
                    hsla(210.0 / 360.0, 0.8, 0.5, 1.0)
                } else {
                    hsla(210.0 / 360.0, 0.5, 0.6, 0.8)
                };
                div()
                    .absolute()
                    .left(px(offset_x + spec.position.0 * zoom))
                    .top(px(offset_y + spec.position.1 * zoom))
                    .w(px(spec.size.0 * zoom))
                    .h(px(spec.size.1 * zoom))
                    .border_1()
                    .border_color(border)
                    .bg(hsla(210.0 / 360.0, 0.6, 0.9, 0.35))
                    .text_size(px(spec.font_size * zoom))
                    .text_color(rgb(0x1a1a1a))
                    .when(matches!(spec.kind, DrawableKind::TextBox), |d| {
                        d.px(px(2.0 * zoom)).child(spec.text.clone())
                    })
                    .when(selected, |d| {
                        d.border_2().child(
                            div()
                                .absolute()
                                .right(px(-RESIZE_HANDLE_SIZE / 2.0))
                                .bottom(px(-RESIZE_HANDLE_SIZE / 2.0))
                                .size(px(RESIZE_HANDLE_SIZE))
                                .bg(border),
                        )
                    })
            })
            .collect();

        div()
            .size_full()
            .relative()
            .overflow_hidden()
            .bg(rgb(0x3c3c3c))
            .children(page)
            .children(overlays)
            .on_mouse_down(MouseButton::Left, cx.listener(Self::handle_mouse_down))
            .on_mouse_move(cx.listener(Self::handle_mouse_move))
            .on_mouse_up(MouseButton::Left, cx.listener(Self::handle_mouse_up))
            .on_scroll_wheel(cx.listener(Self::handle_scroll))
    }
}
