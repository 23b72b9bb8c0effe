use crate::device_display::interface::{DeviceDisplay, DisplayError, DisplayEvent, Status};
use crate::device_display::surface::{take_receiver, Surface};
use crate::overlay::shape::{Color, Rect, Shape, StrokeStyle, TextStyle};
use eframe::egui;
use image::RgbImage;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const VIEW_WIDTH: f32 = 500.0;
const REPAINT_INTERVAL: Duration = Duration::from_millis(33);

fn to_color32(color: Color) -> egui::Color32 {
    egui::Color32::from_rgb(color.r, color.g, color.b)
}

struct OverlayWindow {
    surface: Arc<Mutex<Surface>>,
    events_tx: mpsc::Sender<DisplayEvent>,
    texture: Option<egui::TextureHandle>,
    texture_revision: u64,
}

impl OverlayWindow {
    fn sync_texture(&mut self, ctx: &egui::Context, surface: &Surface) {
        if self.texture.is_some() && self.texture_revision == surface.frame_revision {
            return;
        }
        let Some(frame) = &surface.frame else {
            return;
        };

        let size = [frame.width() as usize, frame.height() as usize];
        let image = egui::ColorImage::from_rgb(size, frame.as_raw());
        match &mut self.texture {
            Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
            None => {
                self.texture =
                    Some(ctx.load_texture("video-frame", image, egui::TextureOptions::LINEAR))
            }
        }
        self.texture_revision = surface.frame_revision;
    }

    fn paint_video(&self, ui: &mut egui::Ui, surface: &Surface) {
        let (width, height) = (surface.width.max(1) as f32, surface.height.max(1) as f32);
        let scale = VIEW_WIDTH / width;
        let (rect, _) = ui.allocate_exact_size(
            egui::vec2(VIEW_WIDTH, height * scale),
            egui::Sense::hover(),
        );
        let painter = ui.painter_at(rect);

        match &self.texture {
            Some(texture) => painter.image(
                texture.id(),
                rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            ),
            None => painter.rect_filled(rect, 0.0, egui::Color32::BLACK),
        };

        let to_screen = |x: f32, y: f32| rect.min + egui::vec2(x * scale, y * scale);

        for shape in &surface.shapes {
            match shape {
                Shape::Rect { rect: r, style } => {
                    painter.rect_stroke(
                        egui::Rect::from_min_max(
                            to_screen(r.x, r.y),
                            to_screen(r.x + r.width, r.y + r.height),
                        ),
                        0.0,
                        egui::Stroke::new(style.line_width, to_color32(style.color)),
                    );
                }
                Shape::Text { text, x, y, style } => {
                    painter.text(
                        to_screen(*x, *y),
                        egui::Align2::LEFT_BOTTOM,
                        text,
                        egui::FontId::proportional(style.font_size),
                        to_color32(style.color),
                    );
                }
            }
        }
    }
}

impl eframe::App for OverlayWindow {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let surface = {
            let shared = self.surface.clone();
            let surface = shared.lock().unwrap_or_else(|e| e.into_inner());
            self.sync_texture(ctx, &surface);
            surface.without_frame()
        };

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading("Live Object Detection");

                let label = if surface.status.streaming {
                    "Stop Camera"
                } else {
                    "Start Camera"
                };
                if ui.button(label).clicked() {
                    let _ = self.events_tx.send(DisplayEvent::ToggleStreaming);
                }

                if surface.status.loading {
                    ui.label("Detecting...");
                }
                if let Some(error) = &surface.status.error {
                    ui.colored_label(egui::Color32::RED, error);
                }

                ui.add_space(8.0);
                self.paint_video(ui, &surface);
            });
        });

        ctx.request_repaint_after(REPAINT_INTERVAL);
    }
}

pub struct GuiWindow {
    surface: Arc<Mutex<Surface>>,
    events_tx: mpsc::Sender<DisplayEvent>,
}

impl GuiWindow {
    /// Blocks until the window is closed, then reports [`DisplayEvent::Closed`].
    pub fn run(self) -> Result<(), eframe::Error> {
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default().with_inner_size([560.0, 520.0]),
            ..Default::default()
        };

        let window = OverlayWindow {
            surface: self.surface,
            events_tx: self.events_tx.clone(),
            texture: None,
            texture_revision: 0,
        };

        let result =
            eframe::run_native("Live Object Detection", options, Box::new(|_cc| Box::new(window)));

        let _ = self.events_tx.send(DisplayEvent::Closed);
        result
    }
}

/// Desktop window showing the live video with the detection overlay on top.
/// The window has to run on the main thread, see [`DeviceDisplayGui::window`].
pub struct DeviceDisplayGui {
    surface: Arc<Mutex<Surface>>,
    events_tx: mpsc::Sender<DisplayEvent>,
    events_rx: Mutex<Option<mpsc::Receiver<DisplayEvent>>>,
}

impl DeviceDisplayGui {
    pub fn new() -> Self {
        let (events_tx, events_rx) = mpsc::channel();
        Self {
            surface: Arc::new(Mutex::new(Surface::default())),
            events_tx,
            events_rx: Mutex::new(Some(events_rx)),
        }
    }

    /// The window side of this display, to be run on the main thread.
    pub fn window(&self) -> GuiWindow {
        GuiWindow {
            surface: self.surface.clone(),
            events_tx: self.events_tx.clone(),
        }
    }

    fn with_surface(&self, f: impl FnOnce(&mut Surface)) -> Result<(), DisplayError> {
        let mut surface = self
            .surface
            .lock()
            .map_err(|e| DisplayError(e.to_string()))?;
        f(&mut surface);
        Ok(())
    }
}

impl DeviceDisplay for DeviceDisplayGui {
    fn resize(&mut self, width: u32, height: u32) -> Result<(), DisplayError> {
        self.with_surface(|s| s.resize(width, height))
    }

    fn show_frame(&mut self, frame: &RgbImage) -> Result<(), DisplayError> {
        self.with_surface(|s| s.show_frame(frame))
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.with_surface(Surface::clear)
    }

    fn stroke_rect(&mut self, rect: Rect, style: StrokeStyle) -> Result<(), DisplayError> {
        self.with_surface(|s| s.draw(Shape::Rect { rect, style }))
    }

    fn fill_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        style: TextStyle,
    ) -> Result<(), DisplayError> {
        self.with_surface(|s| {
            s.draw(Shape::Text {
                text: text.to_string(),
                x,
                y,
                style,
            })
        })
    }

    fn set_status(&mut self, status: &Status) -> Result<(), DisplayError> {
        self.with_surface(|s| s.status = status.clone())
    }

    fn events(&self) -> mpsc::Receiver<DisplayEvent> {
        take_receiver(&self.events_rx)
    }
}
