use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use eframe::egui;

use crate::store::{ThresholdState, ThresholdStore};

/// The control surface: six bounded sliders and a reset action.
///
/// Every slider change pushes the full six-value state to the store, so the
/// capture loop never observes a partial update at this layer either.
pub struct TunerPanel {
    store: Arc<ThresholdStore>,
    cancel_token: Arc<AtomicBool>,
    fps_bits: Arc<AtomicU32>,
    bounds: ThresholdState,
}

impl TunerPanel {
    /// Create the panel, seeding the widgets from the store's current state.
    pub fn new(
        store: Arc<ThresholdStore>,
        cancel_token: Arc<AtomicBool>,
        fps_bits: Arc<AtomicU32>,
    ) -> Self {
        let bounds = store.snapshot();
        Self {
            store,
            cancel_token,
            fps_bits,
            bounds,
        }
    }

    fn bound_row(ui: &mut egui::Ui, label: &str, bound: &mut [u8; 3]) -> bool {
        let mut changed = false;
        ui.horizontal(|ui| {
            ui.label(label);
            changed |= ui
                .add(egui::Slider::new(&mut bound[0], 0..=180).text("H"))
                .changed();
            changed |= ui
                .add(egui::Slider::new(&mut bound[1], 0..=255).text("S"))
                .changed();
            changed |= ui
                .add(egui::Slider::new(&mut bound[2], 0..=255).text("V"))
                .changed();
        });
        changed
    }
}

impl eframe::App for TunerPanel {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // designated quit key; the capture loop observes the token
        if ctx.input(|i| i.key_pressed(egui::Key::Q) || i.key_pressed(egui::Key::Escape)) {
            self.cancel_token.store(true, Ordering::SeqCst);
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("HSV range");

            let mut changed = Self::bound_row(ui, "Lower:", &mut self.bounds.lower);
            changed |= Self::bound_row(ui, "Upper:", &mut self.bounds.upper);

            if ui.button("Reset").clicked() {
                self.bounds = ThresholdState::default();
                self.store.reset();
            }

            if changed {
                // always push the full state, even on a single-slider change
                self.store.set(self.bounds);
            }

            ui.separator();

            let fps = f32::from_bits(self.fps_bits.load(Ordering::Relaxed));
            ui.label(format!("capture: {fps:.1} fps"));
            ui.label("press Q or Escape to quit");
        });

        // keep the fps readout fresh without user input
        ctx.request_repaint_after(Duration::from_millis(100));
    }
}
