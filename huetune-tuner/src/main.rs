mod panel;
mod pipeline;
mod store;

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use argh::FromArgs;
use eframe::egui;

use huetune::image::ImageSize;
use huetune::io::v4l::{V4lCameraConfig, V4lVideoCapture};

use crate::store::ThresholdStore;

#[derive(FromArgs)]
/// Tune an HSV color range against a live camera feed.
struct Args {
    /// the camera device index to read from
    #[argh(positional)]
    camera_id: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    // open the camera first so an invalid index fails before anything starts
    let camera = V4lVideoCapture::new(V4lCameraConfig {
        camera_id: args.camera_id,
        size: ImageSize {
            width: 640,
            height: 480,
        },
        fps: 30,
    })?;
    log::info!("camera {} opened at {}", args.camera_id, camera.size());

    // display sink for the raw and masked streams
    let rec = rerun::RecordingStreamBuilder::new("huetune_tuner").spawn()?;

    let store = Arc::new(ThresholdStore::default());
    let cancel_token = Arc::new(AtomicBool::new(false));
    let fps_bits = Arc::new(AtomicU32::new(0));

    ctrlc::set_handler({
        let cancel_token = cancel_token.clone();
        move || {
            log::info!("received ctrl-c, stopping capture");
            cancel_token.store(true, Ordering::SeqCst);
        }
    })?;

    let capture_thread = std::thread::Builder::new().name("capture".to_string()).spawn({
        let store = store.clone();
        let cancel_token = cancel_token.clone();
        let fps_bits = fps_bits.clone();
        move || pipeline::run(camera, rec, store, cancel_token, fps_bits)
    })?;

    // the control panel runs on the main thread until closed or quit
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([460.0, 220.0]),
        ..Default::default()
    };
    eframe::run_native(
        "huetune tuner",
        options,
        Box::new({
            let store = store.clone();
            let cancel_token = cancel_token.clone();
            move |_cc| Ok(Box::new(panel::TunerPanel::new(store, cancel_token, fps_bits)))
        }),
    )?;

    // the panel is gone; stop the loop and wait for the device release
    cancel_token.store(true, Ordering::SeqCst);
    match capture_thread.join() {
        Ok(result) => result?,
        Err(_) => return Err("capture thread panicked".into()),
    }

    Ok(())
}
