use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use huetune::image::{Image, ImageError, ImageSize};
use huetune::imgproc::resize::{self, InterpolationMode};
use huetune::imgproc::{color, core, threshold};
use huetune::io::fps_counter::FpsCounter;
use huetune::io::v4l::{decode_yuyv_rgb8, V4lError, V4lVideoCapture};

use crate::store::{ThresholdState, ThresholdStore};

/// Factor applied to both display streams before presenting them.
const DISPLAY_SCALE: (usize, usize) = (7, 10);

/// How often the loop reports its frame rate and active bounds.
const LOG_INTERVAL_FRAMES: u64 = 120;

/// Error type for the capture-and-mask loop.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// An image operation failed
    #[error(transparent)]
    Image(#[from] ImageError),

    /// The camera failed
    #[error(transparent)]
    Capture(#[from] V4lError),

    /// The display sink failed
    #[error(transparent)]
    Record(#[from] rerun::RecordingStreamError),
}

/// The two states of the capture loop.
enum LoopState {
    Running,
    Stopped,
}

/// Threshold one RGB frame against the given bounds.
///
/// Converts to HSV, builds the range mask and composites the masked output.
/// Every pixel is tested against the same bounds.
fn mask_frame(
    rgb: &Image<u8, 3>,
    bounds: &ThresholdState,
    hsv: &mut Image<u8, 3>,
    mask: &mut Image<u8, 1>,
    masked: &mut Image<u8, 3>,
) -> Result<(), PipelineError> {
    color::hsv_from_rgb(rgb, hsv)?;
    threshold::in_range(hsv, mask, &bounds.lower, &bounds.upper)?;
    core::bitwise_and(rgb, rgb, masked, mask)?;
    Ok(())
}

/// Run the capture-and-mask loop until the camera stops yielding frames or
/// the cancel token is set.
///
/// Owns the camera handle and the recording stream; both are released
/// exactly once when the loop stops, regardless of how it stopped.
pub fn run(
    mut camera: V4lVideoCapture,
    rec: rerun::RecordingStream,
    store: Arc<ThresholdStore>,
    cancel_token: Arc<AtomicBool>,
    fps_bits: Arc<AtomicU32>,
) -> Result<(), PipelineError> {
    let size = camera.size();
    let display_size = ImageSize {
        width: size.width * DISPLAY_SCALE.0 / DISPLAY_SCALE.1,
        height: size.height * DISPLAY_SCALE.0 / DISPLAY_SCALE.1,
    };

    // preallocate every per-frame buffer once
    let mut rgb = Image::from_size_val(size, 0u8)?;
    let mut hsv = Image::from_size_val(size, 0u8)?;
    let mut mask = Image::<u8, 1>::from_size_val(size, 0u8)?;
    let mut masked = Image::from_size_val(size, 0u8)?;
    let mut rgb_small = Image::from_size_val(display_size, 0u8)?;
    let mut masked_small = Image::from_size_val(display_size, 0u8)?;

    let mut fps_counter = FpsCounter::new();
    let mut frames = 0u64;

    let mut state = LoopState::Running;
    while matches!(state, LoopState::Running) {
        // acquire one frame; no further frames means end of stream
        let Some(frame) = camera.grab() else {
            log::info!("camera stream ended");
            state = LoopState::Stopped;
            continue;
        };

        decode_yuyv_rgb8(&frame, &mut rgb)?;

        // one consistent snapshot per iteration; a slider change mid-frame
        // applies starting with the next frame
        let bounds = store.snapshot();
        mask_frame(&rgb, &bounds, &mut hsv, &mut mask, &mut masked)?;

        // downscale both streams for display and present them
        resize::resize_fast(&rgb, &mut rgb_small, InterpolationMode::Bilinear)?;
        resize::resize_fast(&masked, &mut masked_small, InterpolationMode::Bilinear)?;

        rec.log(
            "camera/input",
            &rerun::Image::from_elements(
                rgb_small.as_slice(),
                rgb_small.size().into(),
                rerun::ColorModel::RGB,
            ),
        )?;
        rec.log(
            "camera/masked",
            &rerun::Image::from_elements(
                masked_small.as_slice(),
                masked_small.size().into(),
                rerun::ColorModel::RGB,
            ),
        )?;

        fps_counter.update();
        fps_bits.store(fps_counter.fps().to_bits(), Ordering::Relaxed);

        frames += 1;
        if frames % LOG_INTERVAL_FRAMES == 0 {
            log::debug!(
                "fps: {:.1}, lower: {:?}, upper: {:?}",
                fps_counter.fps(),
                bounds.lower,
                bounds.upper
            );
        }

        // quit signal, observed within one frame interval
        if cancel_token.load(Ordering::SeqCst) {
            log::info!("received quit signal, stopping capture");
            state = LoopState::Stopped;
        }
    }

    // dropping the capture releases the device exactly once, even when
    // acquisition failed; flush the sink before returning
    drop(camera);
    rec.flush_blocking();
    log::info!("capture loop stopped after {frames} frames");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::mask_frame;
    use crate::store::ThresholdState;
    use huetune::image::{Image, ImageSize};

    const SIZE: ImageSize = ImageSize {
        width: 4,
        height: 3,
    };

    fn buffers() -> (Image<u8, 3>, Image<u8, 1>, Image<u8, 3>) {
        (
            Image::from_size_val(SIZE, 0u8).unwrap(),
            Image::from_size_val(SIZE, 0u8).unwrap(),
            Image::from_size_val(SIZE, 0u8).unwrap(),
        )
    }

    /// A solid color whose HSV representation is (112, 200, 200).
    fn solid_in_range_frame() -> Image<u8, 3> {
        let mut data = Vec::with_capacity(SIZE.width * SIZE.height * 3);
        for _ in 0..SIZE.width * SIZE.height {
            data.extend_from_slice(&[43, 85, 200]);
        }
        Image::new(SIZE, data).unwrap()
    }

    #[test]
    fn default_bounds_select_solid_frame() {
        let rgb = solid_in_range_frame();
        let (mut hsv, mut mask, mut masked) = buffers();

        mask_frame(&rgb, &ThresholdState::default(), &mut hsv, &mut mask, &mut masked).unwrap();

        assert!(mask.as_slice().iter().all(|&m| m == 255));
        assert_eq!(masked.as_slice(), rgb.as_slice());
    }

    #[test]
    fn inverted_bounds_select_nothing() {
        let rgb = solid_in_range_frame();
        let (mut hsv, mut mask, mut masked) = buffers();

        let bounds = ThresholdState {
            lower: [130, 100, 100],
            upper: [100, 255, 255],
        };
        mask_frame(&rgb, &bounds, &mut hsv, &mut mask, &mut masked).unwrap();

        assert!(mask.as_slice().iter().all(|&m| m == 0));
        assert!(masked.as_slice().iter().all(|&p| p == 0));
    }

    #[test]
    fn mask_is_idempotent() {
        let rgb = solid_in_range_frame();
        let bounds = ThresholdState::default();

        let (mut hsv, mut mask, mut masked) = buffers();
        mask_frame(&rgb, &bounds, &mut hsv, &mut mask, &mut masked).unwrap();
        let first = mask.as_slice().to_vec();

        mask_frame(&rgb, &bounds, &mut hsv, &mut mask, &mut masked).unwrap();
        assert_eq!(mask.as_slice(), first.as_slice());
    }
}
